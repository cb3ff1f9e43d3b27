use geojson::{Feature, GeoJson, Geometry, Position, Value};
use shpsys_types::geojson::GeoJsonPoint;

use crate::error::ShpsysError;
use crate::import::PathImporter;

/// Imports every feature of a GeoJSON document. A bare geometry is imported as a feature without properties.
pub fn import_geojson(importer: &mut PathImporter<'_>, geojson: &GeoJson) -> Result<(), ShpsysError> {
    match geojson {
        GeoJson::Geometry(geometry) => {
            importer.start_shape(None);
            import_geojson_geometry(importer, geometry)
        }
        GeoJson::Feature(feature) => import_geojson_feature(importer, feature),
        GeoJson::FeatureCollection(collection) => {
            for feature in &collection.features {
                import_geojson_feature(importer, feature)?;
            }
            Ok(())
        }
    }
}

/// Starts a feature with the feature's properties and imports its geometry.
pub fn import_geojson_feature(
    importer: &mut PathImporter<'_>,
    feature: &Feature,
) -> Result<(), ShpsysError> {
    importer.start_shape(feature.properties.clone());
    match &feature.geometry {
        Some(geometry) => import_geojson_geometry(importer, geometry),
        None => Ok(()),
    }
}

/// Imports a GeoJSON geometry into the current feature of the importer.
///
/// The first ring of a polygon is the outer ring, the rest are holes. Positions with fewer than two coordinates are
/// rejected.
pub fn import_geojson_geometry(
    importer: &mut PathImporter<'_>,
    geometry: &Geometry,
) -> Result<(), ShpsysError> {
    match &geometry.value {
        Value::Point(p) => importer.import_points(&to_points(std::slice::from_ref(p))?),
        Value::MultiPoint(points) => importer.import_points(&to_points(points)?),
        Value::LineString(line) => importer.import_line(&to_points(line)?),
        Value::MultiLineString(lines) => {
            for line in lines {
                importer.import_line(&to_points(line)?)?;
            }
            Ok(())
        }
        Value::Polygon(rings) => import_polygon(importer, rings),
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                import_polygon(importer, rings)?;
            }
            Ok(())
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                import_geojson_geometry(importer, geometry)?;
            }
            Ok(())
        }
    }
}

fn import_polygon(
    importer: &mut PathImporter<'_>,
    rings: &[Vec<Position>],
) -> Result<(), ShpsysError> {
    for (i, ring) in rings.iter().enumerate() {
        if ring.is_empty() {
            continue;
        }
        importer.import_ring(&to_points(ring)?, i > 0)?;
    }
    Ok(())
}

fn to_points(positions: &[Position]) -> Result<Vec<GeoJsonPoint>, ShpsysError> {
    positions
        .iter()
        .map(|p| GeoJsonPoint::try_from(p.clone()).map_err(ShpsysError::from))
        .collect()
}
