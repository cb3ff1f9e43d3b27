//! Stateless numeric functions on planar and spherical coordinates.
//!
//! Every function here is total: degenerate input (zero-length rays, coincident points, collinear segments that only
//! touch) is reported with `NaN` or `None`, never with a panic or an error.

mod intersection;
mod planar;
mod sphere;

pub use intersection::*;
pub use planar::*;
pub use sphere::*;

/// Radius of the spherical Earth model, in meters.
pub const R: f64 = 6378137.0;

/// Degrees to radians multiplier.
pub const D2R: f64 = std::f64::consts::PI / 180.0;
