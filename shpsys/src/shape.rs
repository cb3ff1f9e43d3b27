//! Feature geometries referencing arcs by id.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::arc_id::ArcId;

/// Ordered chain of arcs forming one ring or line.
pub type Path = Vec<ArcId>;

/// Geometry of one feature.
///
/// Polygon and polyline shapes never own coordinates, they reference arcs of the layer's arc collection. A missing
/// geometry is represented as `None` in the layer's shape list.
///
/// Serialized with the kind as the key: `{"paths": [[0, -2]]}` or `{"points": [[1.0, 2.0]]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Rings or lines made of arcs.
    Paths(Vec<Path>),
    /// Points stored inline.
    Points(Vec<Point2<f64>>),
}

impl Shape {
    /// Paths of the shape. Empty for point shapes.
    pub fn paths(&self) -> &[Path] {
        match self {
            Shape::Paths(paths) => paths,
            Shape::Points(_) => &[],
        }
    }

    /// Number of parts (paths or points).
    pub fn part_count(&self) -> usize {
        match self {
            Shape::Paths(paths) => paths.len(),
            Shape::Points(points) => points.len(),
        }
    }
}

/// Kind of geometry stored in a layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryType {
    /// Closed rings, holes wound counterclockwise.
    Polygon,
    /// Open lines.
    Polyline,
    /// Points.
    Point,
}

impl GeometryType {
    /// Returns true for types whose shapes are made of arcs.
    pub fn has_paths(self) -> bool {
        matches!(self, GeometryType::Polygon | GeometryType::Polyline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_parts() {
        let shape = Shape::Paths(vec![vec![ArcId::new(0), ArcId::reversed(1)], vec![ArcId::new(2)]]);
        assert_eq!(shape.part_count(), 2);
        assert_eq!(shape.paths()[0][1].to_signed(), -2);

        let points = Shape::Points(vec![Point2::new(1.0, 2.0)]);
        assert_eq!(points.part_count(), 1);
        assert!(points.paths().is_empty());
    }

    #[test]
    fn shape_json() {
        let shape = Shape::Paths(vec![vec![ArcId::new(0), ArcId::reversed(0)]]);
        assert_eq!(
            serde_json::to_string(&shape).expect("serialize"),
            r#"{"paths":[[0,-1]]}"#
        );
        assert_eq!(
            serde_json::to_string(&GeometryType::Polyline).expect("serialize"),
            "\"polyline\""
        );
    }

    #[test]
    fn integer_points_stay_points() {
        let shape: Shape =
            serde_json::from_value(serde_json::json!({"points": [[1, 2]]})).expect("deserialize");
        assert_eq!(shape, Shape::Points(vec![Point2::new(1.0, 2.0)]));

        let shape: Shape =
            serde_json::from_value(serde_json::json!({"paths": [[1, -2]]})).expect("deserialize");
        assert_eq!(shape, Shape::Paths(vec![vec![ArcId::new(1), ArcId::reversed(1)]]));
    }
}
