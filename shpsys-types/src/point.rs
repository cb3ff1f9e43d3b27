//! Coordinate traits.
//!
//! The arc storage keeps coordinates in flat buffers, but importers accept points of any type implementing
//! [`CartesianPoint2d`]. Points on the sphere (longitude/latitude in degrees) are described by [`GeoPoint`].

use nalgebra::{Point2, Scalar, Vector2};
use num_traits::{Bounded, Float, FromPrimitive, Num};
use serde::{Deserialize, Serialize};

use crate::geom::great_circle_distance;

/// A point in 2-dimensional cartesian space.
pub trait CartesianPoint2d {
    /// Numeric type of the coordinates.
    type Num: Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive;

    /// X coordinate.
    fn x(&self) -> Self::Num;
    /// Y coordinate.
    fn y(&self) -> Self::Num;

    /// Returns true if both coordinates of the points are exactly equal.
    fn equal(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> bool {
        self.x() == other.x() && self.y() == other.y()
    }

    /// Vector from `other` to `self`.
    fn sub(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Vector2<Self::Num> {
        Vector2::new(self.x() - other.x(), self.y() - other.y())
    }

    /// Squared euclidean distance between the points.
    fn distance_sq(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Self::Num {
        let v = self.sub(other);
        v.x * v.x + v.y * v.y
    }

    /// Converts the point into `nalgebra` point.
    fn to_point2(&self) -> Point2<Self::Num> {
        Point2::new(self.x(), self.y())
    }
}

/// Cartesian point that can be constructed from its coordinates.
pub trait NewCartesianPoint2d<Num = f64>: CartesianPoint2d<Num = Num> {
    /// Creates a new point.
    fn new(x: Num, y: Num) -> Self;
}

/// Distance helpers for floating point coordinates.
pub trait CartesianPoint2dFloat<N: Float = f64>: CartesianPoint2d<Num = N> {
    /// Euclidean distance between the points.
    fn distance(&self, other: &impl CartesianPoint2d<Num = N>) -> N {
        self.distance_sq(other).sqrt()
    }

    /// Returns true if any of the coordinates is `NaN`.
    fn is_nan(&self) -> bool {
        self.x().is_nan() || self.y().is_nan()
    }
}

impl<N: Float, T: CartesianPoint2d<Num = N>> CartesianPoint2dFloat<N> for T {}

impl<N> CartesianPoint2d for Point2<N>
where
    N: Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive,
{
    type Num = N;

    fn x(&self) -> N {
        self.x
    }

    fn y(&self) -> N {
        self.y
    }
}

impl<N> NewCartesianPoint2d<N> for Point2<N>
where
    N: Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive,
{
    fn new(x: N, y: N) -> Self {
        Point2::new(x, y)
    }
}

impl<N> CartesianPoint2d for [N; 2]
where
    N: Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive,
{
    type Num = N;

    fn x(&self) -> N {
        self[0]
    }

    fn y(&self) -> N {
        self[1]
    }
}

impl<N> NewCartesianPoint2d<N> for [N; 2]
where
    N: Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive,
{
    fn new(x: N, y: N) -> Self {
        [x, y]
    }
}

impl<N> CartesianPoint2d for (N, N)
where
    N: Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive,
{
    type Num = N;

    fn x(&self) -> N {
        self.0
    }

    fn y(&self) -> N {
        self.1
    }
}

/// A point on the surface of the sphere, coordinates in degrees.
pub trait GeoPoint {
    /// Numeric type of the coordinates.
    type Num: Float;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;
    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;

    /// Latitude in radians.
    fn lat_rad(&self) -> Self::Num {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> Self::Num {
        self.lon().to_radians()
    }
}

impl<T: GeoPoint<Num = f64>> GeoPointDistance for T {}

/// Great circle distance between geographic points.
pub trait GeoPointDistance: GeoPoint<Num = f64> {
    /// Distance in meters on the spherical Earth model (`R = 6378137`).
    fn distance(&self, other: &impl GeoPoint<Num = f64>) -> f64 {
        great_circle_distance(self, other)
    }
}

/// 2d point on the surface of the Earth.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct GeoPoint2d {
    lat: f64,
    lon: f64,
}

impl GeoPoint2d {
    /// Creates a new point from latitude and longitude in degrees.
    pub fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Creates a new point from longitude and latitude in degrees.
    pub fn lonlat(lon: f64, lat: f64) -> Self {
        Self { lat, lon }
    }
}

impl GeoPoint for GeoPoint2d {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn point_types_agree() {
        let a = Point2::new(1.0, 2.0);
        let b = [4.0, 6.0];
        let c = (4.0, 6.0);

        assert_eq!(a.distance_sq(&b), 25.0);
        assert_eq!(a.distance(&c), 5.0);
        assert!(b.equal(&c));
        assert!(!a.equal(&b));
    }

    #[test]
    fn nan_detection() {
        assert!([f64::NAN, 0.0].is_nan());
        assert!(!(0.0, 0.0).is_nan());
    }

    #[test]
    fn geo_point_distance() {
        let a = GeoPoint2d::lonlat(0.0, 0.0);
        let b = GeoPoint2d::lonlat(1.0, 0.0);
        assert_abs_diff_eq!(a.distance(&b), 111_319.49, epsilon = 0.01);
        assert_abs_diff_eq!(b.lon_rad(), 1f64.to_radians());
    }
}
