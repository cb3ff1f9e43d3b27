use serde::{Deserialize, Serialize};

use crate::error::ShpsysError;
use crate::shape::GeometryType;

/// Number of points the importer buffers are sized for when no estimate is given.
pub const DEFAULT_RESERVED_POINTS: usize = 20000;

/// Settings of a [`PathImporter`](super::PathImporter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Estimate of the number of points in the dataset, used to pre-allocate buffers.
    pub reserved_points: usize,
    /// If set, every coordinate is rounded to a multiple of this increment.
    pub precision: Option<f64>,
    /// Snap nearly coincident vertices after import, with an automatic snap distance.
    pub auto_snap: bool,
    /// Snap vertices closer than this distance after import.
    pub snap_interval: Option<f64>,
    /// Geometry type of the collection, if known in advance.
    pub geometry_type: Option<GeometryType>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            reserved_points: DEFAULT_RESERVED_POINTS,
            precision: None,
            auto_snap: false,
            snap_interval: None,
            geometry_type: None,
        }
    }
}

impl ImportOptions {
    /// Sets the buffer size estimate.
    pub fn with_reserved_points(mut self, reserved_points: usize) -> Self {
        self.reserved_points = reserved_points;
        self
    }

    /// Sets the rounding increment.
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Enables or disables automatic snapping.
    pub fn with_auto_snap(mut self, auto_snap: bool) -> Self {
        self.auto_snap = auto_snap;
        self
    }

    /// Sets an explicit snap distance.
    pub fn with_snap_interval(mut self, snap_interval: f64) -> Self {
        self.snap_interval = Some(snap_interval);
        self
    }

    /// Sets the geometry type of the collection.
    pub fn with_geometry_type(mut self, geometry_type: GeometryType) -> Self {
        self.geometry_type = Some(geometry_type);
        self
    }

    pub(crate) fn buffer_size(&self) -> usize {
        if self.reserved_points > 0 {
            self.reserved_points
        } else {
            DEFAULT_RESERVED_POINTS
        }
    }

    pub(crate) fn should_snap(&self) -> bool {
        self.auto_snap || self.snap_interval.is_some()
    }
}

/// Rounds coordinates to a multiple of a fixed increment.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rounding {
    inv: f64,
}

impl Rounding {
    /// Fails with [`ShpsysError::InvalidRoundingIncrement`] if `increment` is 0 or not finite.
    pub fn new(increment: f64) -> Result<Self, ShpsysError> {
        if increment == 0.0 || !increment.is_finite() {
            return Err(ShpsysError::InvalidRoundingIncrement(increment));
        }

        let mut inv = 1.0 / increment;
        if inv > 1.0 {
            inv = js_round(inv);
        }
        Ok(Self { inv })
    }

    /// Rounds the value, halves towards positive infinity.
    pub fn round(&self, x: f64) -> f64 {
        js_round(x * self.inv) / self.inv
    }
}

fn js_round(v: f64) -> f64 {
    let floor = v.floor();
    if v - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}
