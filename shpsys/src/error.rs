//! Error types used by the crate.

use shpsys_types::error::ShpsysTypesError;
use thiserror::Error;

/// Shpsys error type.
///
/// Every variant marks a broken invariant of the arc storage or invalid caller input. Degenerate geometry is never
/// reported through this type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShpsysError {
    /// Sum of arc lengths does not match the number of coordinates, or coordinate buffers differ in length.
    #[error("counting error: arc lengths sum to {lengths}, found {xx} x and {yy} y coordinates")]
    CountingError {
        /// Sum of arc lengths.
        lengths: usize,
        /// Length of the x buffer.
        xx: usize,
        /// Length of the y buffer.
        yy: usize,
    },
    /// Threshold buffer length does not match the number of vertices.
    #[error("mismatched thresholds: expected {expected} values, found {found}")]
    MismatchedThresholds {
        /// Number of vertices in the collection.
        expected: usize,
        /// Number of threshold values given.
        found: usize,
    },
    /// Threshold data is aligned neither with vertices nor with arcs.
    #[error("invalid threshold data")]
    InvalidThresholds,
    /// Operation requires simplification thresholds but none are set.
    #[error("missing simplification data")]
    MissingThresholds,
    /// Arc id does not refer to an arc of the collection.
    #[error("out-of-range arc id: {0}")]
    ArcOutOfRange(i32),
    /// Arc index is too large for the signed arc id representation.
    #[error("arc index {0} exceeds the largest signed arc id")]
    ArcIndexOverflow(usize),
    /// Vertex index is outside of the arc.
    #[error("out-of-range vertex id {nth} for arc {arc}")]
    VertexOutOfRange {
        /// Signed arc id.
        arc: i32,
        /// Requested vertex position.
        nth: isize,
    },
    /// In-place copy would move data backwards over unread elements.
    #[error("buffer copy error: cannot copy from {src} to {dest}")]
    BufferCopy {
        /// Source offset.
        src: usize,
        /// Destination offset.
        dest: usize,
    },
    /// Arc would have less than two vertices left after applying the simplification threshold.
    #[error("collapsed arc: {0}")]
    CollapsedArc(usize),
    /// Rank is outside of the `1..=len` range.
    #[error("invalid rank {rank} for {len} values")]
    InvalidRank {
        /// Requested rank.
        rank: usize,
        /// Number of values.
        len: usize,
    },
    /// Rounding increment is zero or not a finite number.
    #[error("rounding increment must be a non-zero number, got {0}")]
    InvalidRoundingIncrement(f64),
    /// A single feature was given geometries of different kinds.
    #[error("unable to import mixed-geometry features")]
    MixedGeometry,
    /// Error from the geometry types crate.
    #[error(transparent)]
    Types(#[from] ShpsysTypesError),
}
