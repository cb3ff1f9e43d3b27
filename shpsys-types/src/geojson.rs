//! Adapters for `geojson` positions.

use geojson::Position;

use crate::error::ShpsysTypesError;
use crate::point::{CartesianPoint2d, GeoPoint};

/// A GeoJSON position with at least two coordinates. Coordinates after the second one are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonPoint(Position);

impl TryFrom<Position> for GeoJsonPoint {
    type Error = ShpsysTypesError;

    fn try_from(value: Position) -> Result<Self, Self::Error> {
        if value.len() < 2 {
            Err(ShpsysTypesError::Conversion(
                "point must contain at least 2 dimensions".to_string(),
            ))
        } else {
            Ok(GeoJsonPoint(value))
        }
    }
}

impl CartesianPoint2d for GeoJsonPoint {
    type Num = f64;

    fn x(&self) -> f64 {
        self.0[0]
    }

    fn y(&self) -> f64 {
        self.0[1]
    }
}

impl GeoPoint for GeoJsonPoint {
    type Num = f64;

    fn lat(&self) -> Self::Num {
        self.0[1]
    }

    fn lon(&self) -> Self::Num {
        self.0[0]
    }
}
