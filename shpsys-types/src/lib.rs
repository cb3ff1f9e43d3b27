//! Value types and computational geometry primitives used by the `shpsys` arc storage.
//!
//! The crate has no knowledge of arcs or shapes. It provides:
//!
//! * coordinate traits ([`CartesianPoint2d`], [`GeoPoint`]) that let foreign point types be fed into the importers,
//! * the axis-aligned [`Bounds`] rectangle and the affine [`Transform`] between two rectangles,
//! * stateless numeric functions in [`geom`]: distances, angles, areas, spherical measures and segment
//!   intersection.
//!
//! All functions in [`geom`] are total. Degenerate input produces a sentinel (`None` or `NaN`) instead of an error,
//! so they can be used in tight loops without any error handling overhead.

pub mod bounds;
pub mod error;
pub mod geom;
pub mod orient;
pub mod point;
pub mod segment;

#[cfg(feature = "geo-types")]
mod geo_types;
#[cfg(feature = "geojson")]
pub mod geojson;

pub use bounds::{Bounds, Transform};
pub use orient::Orientation;
pub use point::{CartesianPoint2d, GeoPoint, GeoPoint2d, NewCartesianPoint2d};
pub use segment::Segment;
