use geo_types::{Coord, Geometry, LineString, Polygon};

use crate::error::ShpsysError;
use crate::import::{PathImporter, Record};

/// Starts a feature and imports the geometry into it.
pub fn import_geo_feature(
    importer: &mut PathImporter<'_>,
    geometry: Option<&Geometry<f64>>,
    properties: Option<Record>,
) -> Result<(), ShpsysError> {
    importer.start_shape(properties);
    match geometry {
        Some(geometry) => import_geo_geometry(importer, geometry),
        None => Ok(()),
    }
}

/// Imports a `geo-types` geometry into the current feature of the importer.
pub fn import_geo_geometry(
    importer: &mut PathImporter<'_>,
    geometry: &Geometry<f64>,
) -> Result<(), ShpsysError> {
    match geometry {
        Geometry::Point(p) => importer.import_points(&[p.0]),
        Geometry::MultiPoint(points) => {
            let coords: Vec<Coord<f64>> = points.iter().map(|p| p.0).collect();
            importer.import_points(&coords)
        }
        Geometry::Line(line) => importer.import_line(&[line.start, line.end]),
        Geometry::LineString(line) => importer.import_line(&line.0),
        Geometry::MultiLineString(lines) => {
            for line in lines {
                importer.import_line(&line.0)?;
            }
            Ok(())
        }
        Geometry::Polygon(polygon) => import_polygon(importer, polygon),
        Geometry::MultiPolygon(polygons) => {
            for polygon in polygons {
                import_polygon(importer, polygon)?;
            }
            Ok(())
        }
        Geometry::Rect(rect) => import_polygon(importer, &rect.to_polygon()),
        Geometry::Triangle(triangle) => import_polygon(importer, &triangle.to_polygon()),
        Geometry::GeometryCollection(collection) => {
            for geometry in collection {
                import_geo_geometry(importer, geometry)?;
            }
            Ok(())
        }
    }
}

fn import_polygon(
    importer: &mut PathImporter<'_>,
    polygon: &Polygon<f64>,
) -> Result<(), ShpsysError> {
    import_ring(importer, polygon.exterior(), false)?;
    for hole in polygon.interiors() {
        import_ring(importer, hole, true)?;
    }
    Ok(())
}

fn import_ring(
    importer: &mut PathImporter<'_>,
    ring: &LineString<f64>,
    is_hole: bool,
) -> Result<(), ShpsysError> {
    if ring.0.is_empty() {
        return Ok(());
    }
    importer.import_ring(&ring.0, is_hole)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc_id::ArcId;
    use crate::diagnostics::QuietDiagnostics;
    use crate::import::ImportOptions;
    use crate::shape::{GeometryType, Shape};
    use geo_types::{line_string, point, polygon};

    #[test]
    fn geo_geometries() {
        let mut importer =
            PathImporter::new(ImportOptions::default(), &QuietDiagnostics).expect("valid options");

        let square = polygon![
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 1.0, y: 2.0), (x: 2.0, y: 2.0), (x: 2.0, y: 1.0)]],
        ];
        import_geo_feature(&mut importer, Some(&Geometry::Polygon(square)), None)
            .expect("single type");
        import_geo_feature(&mut importer, None, None).expect("no geometry");
        import_geo_feature(
            &mut importer,
            Some(&Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)])),
            None,
        )
        .expect("single type");
        import_geo_feature(&mut importer, Some(&Geometry::Point(point!(x: 3.0, y: 3.0))), None)
            .expect("single type");

        let dataset = importer.done().expect("valid dataset");
        let arcs = dataset.arcs.expect("arcs are built");
        assert_eq!(arcs.size(), 3);
        assert_eq!(arcs.get_arc_length(ArcId::new(0)), Ok(5));
        assert_eq!(dataset.layers.len(), 4);
        assert_eq!(dataset.layers[0].geometry_type, Some(GeometryType::Polygon));
        assert_eq!(
            dataset.layers[0].shapes,
            vec![Some(Shape::Paths(vec![vec![ArcId::new(0)], vec![ArcId::new(1)]]))]
        );
        assert_eq!(dataset.layers[1].geometry_type, None);
        assert_eq!(dataset.layers[2].geometry_type, Some(GeometryType::Polyline));
        assert_eq!(dataset.layers[3].geometry_type, Some(GeometryType::Point));
    }
}
