//! Topological arc storage for vector geodata.
//!
//! `shpsys` keeps all vertices of a dataset in flat coordinate buffers, split into *arcs*. Shapes do not own
//! coordinates, they reference arcs by [`ArcId`], so neighbouring polygons can share their common boundary and every
//! edit of an arc is seen by all shapes using it.
//!
//! The main parts are:
//!
//! * [`ArcCollection`] - the arc storage with iteration, bounding box queries, simplification bookkeeping and
//!   in-place compaction,
//! * [`PathImporter`] - turns features of a non-topological source into an arc collection and layers of shapes,
//! * [`clean`] and [`snap`] - repair of degenerate arcs, spikes and nearly coincident vertices.
//!
//! Geometry primitives and [`Bounds`] come from the `shpsys-types` crate and are re-exported here.
//!
//! ```
//! use shpsys::{ArcCollection, ArcId};
//!
//! let arcs = ArcCollection::from_arcs(vec![vec![[0.0, 0.0], [1.0, 1.0], [2.0, 0.0]]]);
//! let reversed: Vec<_> = arcs.get_arc_iter(ArcId::reversed(0)).unwrap().collect();
//! assert_eq!(reversed[0].x, 2.0);
//! ```

pub mod arc_id;
pub mod arcs;
pub mod clean;
pub mod diagnostics;
pub mod error;
pub mod import;
pub mod rank;
pub mod shape;
pub mod snap;

pub use arc_id::ArcId;
pub use arcs::{ArcCollection, ArcIndexMap, Thresholds};
pub use diagnostics::{Diagnostics, LogDiagnostics, QuietDiagnostics};
pub use error::ShpsysError;
pub use import::{Dataset, ImportOptions, Layer, PathImporter};
pub use shape::{GeometryType, Path, Shape};
pub use shpsys_types::{geom, Bounds};
