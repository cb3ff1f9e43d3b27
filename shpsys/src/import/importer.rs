use nalgebra::Point2;
use shpsys_types::geom::planar_path_area2;
use shpsys_types::CartesianPoint2d;

use crate::arc_id::ArcId;
use crate::arcs::ArcCollection;
use crate::clean::clean_shapes;
use crate::diagnostics::{counted, Diagnostics};
use crate::error::ShpsysError;
use crate::import::{
    divide_features_by_type, fix_inconsistent_fields, layer_has_paths, DataTable, Dataset,
    ImportOptions, Layer, Record, Rounding,
};
use crate::shape::{GeometryType, Shape};
use crate::snap::snap_coords;

const STREAM_CAPACITY: usize = 10000;

/// Accumulates the points of one path until [`PathImportStream::end_path`] is called.
#[derive(Debug, Clone, Default)]
pub struct PathImportStream {
    xx: Vec<f64>,
    yy: Vec<f64>,
}

impl PathImportStream {
    /// Creates an empty stream.
    pub fn new() -> Self {
        Self {
            xx: Vec::with_capacity(STREAM_CAPACITY),
            yy: Vec::with_capacity(STREAM_CAPACITY),
        }
    }

    /// Appends a point to the current path.
    pub fn add_point(&mut self, x: f64, y: f64) {
        self.xx.push(x);
        self.yy.push(y);
    }

    /// Number of points in the current path.
    pub fn len(&self) -> usize {
        self.xx.len()
    }

    /// Returns true if no point was added since the last call to `end_path`.
    pub fn is_empty(&self) -> bool {
        self.xx.is_empty()
    }

    /// Hands the coordinates of the current path to `drain` and starts a new path.
    pub fn end_path<T>(&mut self, drain: impl FnOnce(&[f64], &[f64]) -> T) -> T {
        let result = drain(&self.xx, &self.yy);
        self.xx.clear();
        self.yy.clear();
        result
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CollectionType {
    Empty,
    Single(GeometryType),
    Mixed,
}

/// Collects features from a non-topological source.
///
/// Every path becomes a separate arc. Consecutive duplicate points are dropped and open polygon rings are closed;
/// both repairs are counted and reported by [`PathImporter::done`]. Rings with the wrong winding are reversed.
pub struct PathImporter<'a> {
    options: ImportOptions,
    diagnostics: &'a dyn Diagnostics,
    round: Option<Rounding>,
    stream: PathImportStream,
    xx: Vec<f64>,
    yy: Vec<f64>,
    nn: Vec<usize>,
    shapes: Vec<Option<Shape>>,
    properties: Vec<Option<Record>>,
    types: Vec<Option<GeometryType>>,
    collection_type: CollectionType,
    dupe_count: usize,
    open_ring_count: usize,
}

impl std::fmt::Debug for PathImporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathImporter")
            .field("options", &self.options)
            .field("round", &self.round)
            .field("stream", &self.stream)
            .field("xx", &self.xx)
            .field("yy", &self.yy)
            .field("nn", &self.nn)
            .field("shapes", &self.shapes)
            .field("properties", &self.properties)
            .field("types", &self.types)
            .field("collection_type", &self.collection_type)
            .field("dupe_count", &self.dupe_count)
            .field("open_ring_count", &self.open_ring_count)
            .finish_non_exhaustive()
    }
}

impl<'a> PathImporter<'a> {
    /// Creates an importer. Fails if the rounding precision is invalid.
    pub fn new(options: ImportOptions, diagnostics: &'a dyn Diagnostics) -> Result<Self, ShpsysError> {
        let round = options.precision.map(Rounding::new).transpose()?;
        let buf_size = options.buffer_size();
        let collection_type = match options.geometry_type {
            Some(t) => CollectionType::Single(t),
            None => CollectionType::Empty,
        };

        Ok(Self {
            options,
            diagnostics,
            round,
            stream: PathImportStream::new(),
            xx: Vec::with_capacity(buf_size),
            yy: Vec::with_capacity(buf_size),
            nn: vec![],
            shapes: vec![],
            properties: vec![],
            types: vec![],
            collection_type,
            dupe_count: 0,
            open_ring_count: 0,
        })
    }

    /// Starts a new feature. Geometry imported after this call belongs to it.
    pub fn start_shape(&mut self, properties: Option<Record>) {
        self.shapes.push(None);
        self.properties.push(properties);
        self.types.push(None);
    }

    /// Number of features started so far.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Imports an open line.
    pub fn import_line<P>(&mut self, points: &[P]) -> Result<(), ShpsysError>
    where
        P: CartesianPoint2d<Num = f64>,
    {
        self.set_shape_type(GeometryType::Polyline)?;
        self.import_path(points)
    }

    /// Imports points of a point feature.
    pub fn import_points<P>(&mut self, points: &[P]) -> Result<(), ShpsysError>
    where
        P: CartesianPoint2d<Num = f64>,
    {
        self.set_shape_type(GeometryType::Point)?;
        for p in points {
            let (x, y) = self.round_xy(p.x(), p.y());
            self.append_point(Point2::new(x, y))?;
        }
        Ok(())
    }

    /// Imports a polygon ring. Outer rings are stored clockwise and holes counterclockwise; rings wound the other
    /// way are reversed.
    pub fn import_ring<P>(&mut self, points: &[P], is_hole: bool) -> Result<(), ShpsysError>
    where
        P: CartesianPoint2d<Num = f64>,
    {
        let area = planar_path_area2(points);
        self.set_shape_type(GeometryType::Polygon)?;
        if (is_hole && area > 0.0) || (!is_hole && area < 0.0) {
            self.diagnostics.verbose(if is_hole {
                "Warning: reversing a CW hole"
            } else {
                "Warning: reversing a CCW ring"
            });
            for p in points.iter().rev() {
                self.add_point(p.x(), p.y());
            }
            self.end_path()
        } else {
            self.import_path(points)
        }
    }

    /// Imports a path of the current feature's type.
    pub fn import_path<P>(&mut self, points: &[P]) -> Result<(), ShpsysError>
    where
        P: CartesianPoint2d<Num = f64>,
    {
        for p in points {
            self.add_point(p.x(), p.y());
        }
        self.end_path()
    }

    /// Adds a point to the path being streamed.
    pub fn add_point(&mut self, x: f64, y: f64) {
        self.stream.add_point(x, y);
    }

    /// Finishes the path being streamed and adds it to the current feature. A feature that has no geometry type
    /// yet becomes a polyline.
    pub fn end_path(&mut self) -> Result<(), ShpsysError> {
        let mut stream = std::mem::take(&mut self.stream);
        let result = stream.end_path(|xx, yy| self.import_path_coords(xx, yy));
        self.stream = stream;
        result
    }

    /// Builds the dataset.
    ///
    /// Arcs are snapped if requested, polygon and polyline shapes are cleaned, and features of different geometry
    /// types are split into separate layers.
    pub fn done(self) -> Result<Dataset, ShpsysError> {
        let diagnostics = self.diagnostics;
        if self.dupe_count > 0 {
            diagnostics.verbose(&format!(
                "Removed {}",
                counted(self.dupe_count, "duplicate point")
            ));
        }
        if self.open_ring_count > 0 {
            diagnostics.message(&format!(
                "Closed {}",
                counted(self.open_ring_count, "open polygon ring")
            ));
        }

        let arcs = if self.nn.is_empty() {
            None
        } else {
            let mut arcs = ArcCollection::new(self.nn, self.xx, self.yy)?;
            if self.options.should_snap() {
                snap_coords(&mut arcs, self.options.snap_interval, diagnostics)?;
            }
            Some(arcs)
        };

        let mut layers = match self.collection_type {
            CollectionType::Mixed => {
                divide_features_by_type(self.shapes, self.properties, &self.types)
            }
            CollectionType::Single(t) => vec![single_layer(Some(t), self.shapes, self.properties)],
            CollectionType::Empty => vec![single_layer(None, self.shapes, self.properties)],
        };

        for layer in &mut layers {
            if let (Some(geometry_type), Some(arcs)) = (layer.geometry_type, &arcs) {
                if layer_has_paths(layer) {
                    clean_shapes(&mut layer.shapes, arcs, geometry_type)?;
                }
            }
            if let Some(data) = &mut layer.data {
                fix_inconsistent_fields(data.records_mut());
            }
        }

        log::debug!(
            "Imported {} in {}",
            counted(arcs.as_ref().map_or(0, ArcCollection::get_point_count), "path point"),
            counted(layers.len(), "layer")
        );

        Ok(Dataset { arcs, layers })
    }

    fn current_shape(&mut self) -> usize {
        if self.shapes.is_empty() {
            self.start_shape(None);
        }
        self.shapes.len() - 1
    }

    fn set_shape_type(&mut self, t: GeometryType) -> Result<(), ShpsysError> {
        let index = self.current_shape();
        match self.types[index] {
            None => {
                self.types[index] = Some(t);
                self.collection_type = match self.collection_type {
                    CollectionType::Empty => CollectionType::Single(t),
                    CollectionType::Single(curr) if curr == t => CollectionType::Single(t),
                    _ => CollectionType::Mixed,
                };
                Ok(())
            }
            Some(curr) if curr != t => Err(ShpsysError::MixedGeometry),
            Some(_) => Ok(()),
        }
    }

    fn round_xy(&self, x: f64, y: f64) -> (f64, f64) {
        match &self.round {
            Some(r) => (r.round(x), r.round(y)),
            None => (x, y),
        }
    }

    fn import_path_coords(&mut self, xsrc: &[f64], ysrc: &[f64]) -> Result<(), ShpsysError> {
        let start = self.xx.len();
        let mut prev = None;
        for (&x, &y) in xsrc.iter().zip(ysrc) {
            let (x, y) = self.round_xy(x, y);
            if prev == Some((x, y)) {
                self.dupe_count += 1;
            } else {
                self.xx.push(x);
                self.yy.push(y);
            }
            prev = Some((x, y));
        }

        let mut count = self.xx.len() - start;
        let index = self.current_shape();
        if count > 0 && self.types[index] == Some(GeometryType::Polygon) {
            let (x0, y0) = (self.xx[start], self.yy[start]);
            let last = self.xx.len() - 1;
            if x0 != self.xx[last] || y0 != self.yy[last] {
                self.xx.push(x0);
                self.yy.push(y0);
                self.open_ring_count += 1;
                count += 1;
            }
        }

        self.append_path(count)
    }

    fn append_path(&mut self, count: usize) -> Result<(), ShpsysError> {
        let id = ArcId::try_new(self.nn.len())?;
        let index = self.current_shape();
        // Paths streamed without a type are open lines.
        if self.types[index].is_none() {
            self.set_shape_type(GeometryType::Polyline)?;
        }
        self.nn.push(count);
        match &mut self.shapes[index] {
            shape @ None => *shape = Some(Shape::Paths(vec![vec![id]])),
            Some(Shape::Paths(paths)) => paths.push(vec![id]),
            Some(Shape::Points(_)) => return Err(ShpsysError::MixedGeometry),
        }
        Ok(())
    }

    fn append_point(&mut self, p: Point2<f64>) -> Result<(), ShpsysError> {
        let index = self.current_shape();
        match &mut self.shapes[index] {
            shape @ None => *shape = Some(Shape::Points(vec![p])),
            Some(Shape::Points(points)) => points.push(p),
            Some(Shape::Paths(_)) => return Err(ShpsysError::MixedGeometry),
        }
        Ok(())
    }
}

fn single_layer(
    geometry_type: Option<GeometryType>,
    shapes: Vec<Option<Shape>>,
    properties: Vec<Option<Record>>,
) -> Layer {
    let data = properties
        .iter()
        .any(Option::is_some)
        .then(|| DataTable::new(properties));
    Layer {
        geometry_type,
        shapes,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectedDiagnostics, Level, QuietDiagnostics};
    use assert_matches::assert_matches;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Option<Record> {
        value.as_object().cloned()
    }

    #[test]
    fn stream() {
        let mut stream = PathImportStream::new();
        stream.add_point(1.0, 2.0);
        stream.add_point(3.0, 4.0);
        assert_eq!(stream.len(), 2);
        let sum = stream.end_path(|xx, yy| xx.iter().chain(yy).sum::<f64>());
        assert_eq!(sum, 10.0);
        assert!(stream.is_empty());
    }

    #[test]
    fn polygon_rings() {
        let diagnostics = CollectedDiagnostics::new();
        let mut importer =
            PathImporter::new(ImportOptions::default(), &diagnostics).expect("valid options");
        importer.start_shape(record(json!({"name": "square"})));
        importer
            .import_ring(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]], false)
            .expect("single type");
        importer
            .import_ring(
                &[[0.2, 0.2], [0.2, 0.4], [0.4, 0.4], [0.4, 0.2], [0.2, 0.2]],
                true,
            )
            .expect("single type");
        let dataset = importer.done().expect("valid dataset");

        let arcs = dataset.arcs.expect("arcs are built");
        assert_eq!(
            arcs.to_array(),
            vec![
                vec![[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0], [0.0, 1.0]],
                vec![[0.2, 0.2], [0.4, 0.2], [0.4, 0.4], [0.2, 0.4], [0.2, 0.2]],
            ]
        );
        assert_eq!(dataset.layers.len(), 1);
        let layer = &dataset.layers[0];
        assert_eq!(layer.geometry_type, Some(GeometryType::Polygon));
        assert_eq!(
            layer.shapes,
            vec![Some(Shape::Paths(vec![
                vec![ArcId::new(0)],
                vec![ArcId::new(1)]
            ]))]
        );
        assert_eq!(
            layer.data.as_ref().map(|d| d.records().to_vec()),
            Some(vec![json!({"name": "square"}).as_object().cloned().unwrap_or_default()])
        );

        assert_eq!(
            diagnostics.texts(Level::Verbose),
            vec![
                "Warning: reversing a CCW ring".to_string(),
                "Warning: reversing a CW hole".to_string()
            ]
        );
        assert_eq!(
            diagnostics.texts(Level::Message),
            vec!["Closed 1 open polygon ring".to_string()]
        );
    }

    #[test]
    fn duplicates_and_rounding() {
        let diagnostics = CollectedDiagnostics::new();
        let options = ImportOptions::default().with_precision(0.1);
        let mut importer = PathImporter::new(options, &diagnostics).expect("valid options");
        importer.start_shape(None);
        importer
            .import_line(&[[0.0, 0.0], [0.01, 0.02], [1.04, 1.0], [1.0, 0.96]])
            .expect("single type");
        let dataset = importer.done().expect("valid dataset");
        assert_eq!(
            dataset.arcs.map(|arcs| arcs.to_array()),
            Some(vec![vec![[0.0, 0.0], [1.0, 1.0]]])
        );
        assert_eq!(dataset.layers[0].data, None);
        assert_eq!(
            diagnostics.texts(Level::Verbose),
            vec!["Removed 2 duplicate points".to_string()]
        );
    }

    #[test]
    fn mixed_collection() {
        let mut importer =
            PathImporter::new(ImportOptions::default(), &QuietDiagnostics).expect("valid options");
        importer.start_shape(record(json!({"id": 1})));
        importer
            .import_line(&[[0.0, 0.0], [1.0, 1.0]])
            .expect("single type");
        importer.start_shape(record(json!({"id": 2, "kind": "poi"})));
        importer.import_points(&[[5.0, 5.0]]).expect("single type");
        importer.start_shape(None);
        importer
            .import_line(&[[1.0, 1.0], [2.0, 0.0]])
            .expect("single type");

        let dataset = importer.done().expect("valid dataset");
        assert_eq!(dataset.layers.len(), 2);
        let lines = &dataset.layers[0];
        assert_eq!(lines.geometry_type, Some(GeometryType::Polyline));
        assert_eq!(lines.shapes.len(), 2);
        let records = lines.data.as_ref().map(DataTable::records).unwrap_or_default();
        assert_eq!(records.len(), 2);
        assert_eq!(Some(records[1].clone()), record(json!({"id": null})));

        let points = &dataset.layers[1];
        assert_eq!(points.geometry_type, Some(GeometryType::Point));
        assert_eq!(
            points.shapes,
            vec![Some(Shape::Points(vec![Point2::new(5.0, 5.0)]))]
        );
        assert_eq!(dataset.arcs.map(|a| a.size()), Some(2));
    }

    #[test]
    fn mixed_feature() {
        let mut importer =
            PathImporter::new(ImportOptions::default(), &QuietDiagnostics).expect("valid options");
        importer.start_shape(None);
        importer
            .import_line(&[[0.0, 0.0], [1.0, 1.0]])
            .expect("single type");
        assert_matches!(
            importer.import_points(&[[5.0, 5.0]]),
            Err(ShpsysError::MixedGeometry)
        );
        assert_matches!(
            importer.import_ring(&[[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]], false),
            Err(ShpsysError::MixedGeometry)
        );
    }

    #[test]
    fn degenerate_rings_are_removed() {
        let mut importer = PathImporter::new(
            ImportOptions::default().with_geometry_type(GeometryType::Polygon),
            &QuietDiagnostics,
        )
        .expect("valid options");
        importer.start_shape(None);
        importer
            .import_ring(&[[2.0, 2.0], [2.0, 2.0], [2.0, 2.0]], false)
            .expect("single type");
        importer.start_shape(None);
        importer
            .import_ring(&[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.0, 0.0]], false)
            .expect("single type");

        let dataset = importer.done().expect("valid dataset");
        assert_eq!(dataset.layers[0].shapes[0], None);
        assert_eq!(
            dataset.layers[0].shapes[1],
            Some(Shape::Paths(vec![vec![ArcId::new(1)]]))
        );
    }

    #[test]
    fn empty_import() {
        let importer =
            PathImporter::new(ImportOptions::default(), &QuietDiagnostics).expect("valid options");
        let dataset = importer.done().expect("valid dataset");
        assert_eq!(dataset.arcs, None);
        assert_eq!(dataset.layers, vec![Layer::default()]);

        assert_matches!(
            PathImporter::new(ImportOptions::default().with_precision(0.0), &QuietDiagnostics),
            Err(ShpsysError::InvalidRoundingIncrement(_))
        );
    }

    #[test]
    fn streamed_paths() {
        let mut importer = PathImporter::new(
            ImportOptions::default().with_snap_interval(0.01),
            &QuietDiagnostics,
        )
        .expect("valid options");
        importer.start_shape(None);
        importer.add_point(0.0, 0.0);
        importer.add_point(1.0, 0.0);
        importer.add_point(1.005, 0.0);
        importer.add_point(2.0, 0.0);
        importer.end_path().expect("shape without points");

        importer.start_shape(None);
        importer.add_point(5.0, 5.0);
        importer.add_point(5.0, 5.0);
        importer.end_path().expect("shape without points");

        let dataset = importer.done().expect("valid dataset");
        // Snapping dedups the one-point arc down to nothing.
        assert_eq!(dataset.arcs.map(|a| a.get_point_count()), Some(3));
        assert_eq!(dataset.layers.len(), 1);
        assert_eq!(dataset.layers[0].geometry_type, Some(GeometryType::Polyline));
        assert_eq!(
            dataset.layers[0].shapes,
            vec![Some(Shape::Paths(vec![vec![ArcId::new(0)]])), None]
        );
    }

    #[test]
    fn streamed_path_after_points_is_mixed() {
        let mut importer =
            PathImporter::new(ImportOptions::default(), &QuietDiagnostics).expect("valid options");
        importer.start_shape(None);
        importer.import_points(&[[1.0, 1.0]]).expect("single type");
        importer.add_point(0.0, 0.0);
        importer.add_point(1.0, 0.0);
        assert_matches!(importer.end_path(), Err(ShpsysError::MixedGeometry));
    }
}
