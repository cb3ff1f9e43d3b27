use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Orientation of a triplet of points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Clockwise
    Clockwise,
    /// Counterclockwise
    Counterclockwise,
    /// Collinear
    Collinear,
}

impl Orientation {
    /// Determines orientation of a triplet of points.
    ///
    /// Returns `None` if any of the coordinates is `NaN`.
    pub fn triplet(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Option<Self> {
        match orient_2d(a, b, c) {
            v if v == 0.0 => Some(Self::Collinear),
            v if v > 0.0 => Some(Self::Counterclockwise),
            v if v < 0.0 => Some(Self::Clockwise),
            _ => None,
        }
    }
}

/// Determinant of the 2x2 matrix `[[a, b], [c, d]]`.
pub fn determinant_2d(a: f64, b: f64, c: f64, d: f64) -> f64 {
    a * d - b * c
}

/// Positive if `a`, `b` and `c` are arranged counterclockwise, negative if clockwise and zero if they are collinear.
///
/// Coordinates are taken relative to `c` before computing the determinant (Shewchuk), which keeps the magnitudes of
/// the products small.
pub fn orient_2d(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    determinant_2d(a.x - c.x, a.y - c.y, b.x - c.x, b.y - c.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triplet() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);

        assert_eq!(
            Orientation::triplet(a, b, Point2::new(1.0, 1.0)),
            Some(Orientation::Counterclockwise)
        );
        assert_eq!(
            Orientation::triplet(a, b, Point2::new(1.0, -1.0)),
            Some(Orientation::Clockwise)
        );
        assert_eq!(
            Orientation::triplet(a, b, Point2::new(5.0, 0.0)),
            Some(Orientation::Collinear)
        );
        assert_eq!(Orientation::triplet(a, b, Point2::new(f64::NAN, 0.0)), None);
    }
}
