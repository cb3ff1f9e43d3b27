//! Axis-aligned bounding box and the affine transform between two boxes.

use std::fmt::{Display, Formatter};

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::point::CartesianPoint2d;

/// Mutable axis-aligned rectangle.
///
/// An empty box has `x_min > x_max` (infinite extrema pointing the wrong way), so merging anything into it
/// yields the merged value unchanged. Use [`Bounds::has_bounds`] to check for emptiness.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum x.
    pub x_min: f64,
    /// Minimum y.
    pub y_min: f64,
    /// Maximum x.
    pub x_max: f64,
    /// Maximum y.
    pub y_max: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds {
    /// Creates a box from its extrema. Swapped minimum and maximum values are put in order.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        let mut bounds = Self {
            x_min,
            y_min,
            x_max,
            y_max,
        };
        bounds.update();
        bounds
    }

    /// Box containing nothing.
    pub const fn empty() -> Self {
        Self {
            x_min: f64::INFINITY,
            y_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_max: f64::NEG_INFINITY,
        }
    }

    /// Creates a box from `[x_min, y_min, x_max, y_max]`.
    pub fn from_array(arr: [f64; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Zero-size box at the point.
    pub fn from_point(p: &impl CartesianPoint2d<Num = f64>) -> Self {
        Self {
            x_min: p.x(),
            x_max: p.x(),
            y_min: p.y(),
            y_max: p.y(),
        }
    }

    /// Smallest box containing all the points, or `None` if the iterator is empty.
    pub fn from_points<'a, P: CartesianPoint2d<Num = f64> + 'a>(
        mut points: impl Iterator<Item = &'a P>,
    ) -> Option<Self> {
        let first = points.next()?;
        let mut bounds = Self::from_point(first);
        for p in points {
            bounds.merge_point(p.x(), p.y());
        }

        Some(bounds)
    }

    /// Bounds of the lon/lat coordinate space, shrunk by `e` degrees on every side (1e-10 by default).
    pub fn world(e: Option<f64>) -> Self {
        let e = e.filter(|v| v.is_finite()).unwrap_or(1e-10);
        Self::new(-180.0 + e, -90.0 + e, 180.0 - e, 90.0 - e)
    }

    /// Returns true if the box fits into the lon/lat coordinate range (with one degree of excess).
    pub fn probably_decimal_degrees(&self) -> bool {
        Self::world(Some(-1.0)).contains(self)
    }

    /// Returns false for an empty box.
    pub fn has_bounds(&self) -> bool {
        self.x_min <= self.x_max && self.y_min <= self.y_max
    }

    /// `[x_min, y_min, x_max, y_max]`, or `None` for an empty box.
    pub fn to_array(&self) -> Option<[f64; 4]> {
        self.has_bounds()
            .then_some([self.x_min, self.y_min, self.x_max, self.y_max])
    }

    /// Width of the box, 0 for an empty one.
    pub fn width(&self) -> f64 {
        if self.has_bounds() {
            self.x_max - self.x_min
        } else {
            0.0
        }
    }

    /// Height of the box, 0 for an empty one.
    pub fn height(&self) -> f64 {
        if self.has_bounds() {
            self.y_max - self.y_min
        } else {
            0.0
        }
    }

    /// Area of the box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f64 {
        (self.x_min + self.x_max) * 0.5
    }

    /// Vertical center.
    pub fn center_y(&self) -> f64 {
        (self.y_min + self.y_max) * 0.5
    }

    /// Center point.
    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.center_x(), self.center_y())
    }

    /// Returns true if the point lies inside the box or on its border.
    pub fn contains_point(&self, point: &impl CartesianPoint2d<Num = f64>) -> bool {
        self.x_min <= point.x()
            && self.x_max >= point.x()
            && self.y_min <= point.y()
            && self.y_max >= point.y()
    }

    /// Approximate test for a circle touching the box. Circles just outside a corner test true.
    pub fn contains_circle(&self, center: &impl CartesianPoint2d<Num = f64>, radius: f64) -> bool {
        center.x() + radius > self.x_min
            && center.x() - radius < self.x_max
            && center.y() - radius < self.y_max
            && center.y() + radius > self.y_min
    }

    /// Returns true if the boxes share at least one point.
    pub fn intersects(&self, other: &Bounds) -> bool {
        other.x_min <= self.x_max
            && other.x_max >= self.x_min
            && other.y_max >= self.y_min
            && other.y_min <= self.y_max
    }

    /// Returns true if `other` lies completely inside this box.
    pub fn contains(&self, other: &Bounds) -> bool {
        other.x_min >= self.x_min
            && other.y_max <= self.y_max
            && other.x_max <= self.x_max
            && other.y_min >= self.y_min
    }

    /// Moves the box.
    pub fn shift(&mut self, dx: f64, dy: f64) {
        self.x_min += dx;
        self.x_max += dx;
        self.y_min += dy;
        self.y_max += dy;
    }

    /// Grows the box by the given amount on each side (left, bottom, right, top).
    pub fn pad(&mut self, left: f64, bottom: f64, right: f64, top: f64) {
        self.x_min -= left;
        self.y_min -= bottom;
        self.x_max += right;
        self.y_max += top;
    }

    /// Rescales the box around its center. `pct` is the fraction of the original width; `pct_y` the fraction of the
    /// original height, same as `pct` if not given.
    pub fn scale(&mut self, pct: f64, pct_y: Option<f64>) {
        let half_width = (self.x_max - self.x_min) * 0.5;
        let half_height = (self.y_max - self.y_min) * 0.5;
        let kx = pct - 1.0;
        let ky = pct_y.map(|v| v - 1.0).unwrap_or(kx);
        self.x_min -= half_width * kx;
        self.y_min -= half_height * ky;
        self.x_max += half_width * kx;
        self.y_max += half_height * ky;
    }

    /// Extends the box to include the point.
    pub fn merge_point(&mut self, x: f64, y: f64) {
        if !self.has_bounds() {
            *self = Self {
                x_min: x,
                y_min: y,
                x_max: x,
                y_max: y,
            };
            return;
        }

        if x < self.x_min {
            self.x_min = x;
        }
        if x > self.x_max {
            self.x_max = x;
        }
        if y < self.y_min {
            self.y_min = y;
        }
        if y > self.y_max {
            self.y_max = y;
        }
    }

    /// Extends the box to include another box.
    pub fn merge_bounds(&mut self, other: &Bounds) -> &mut Self {
        if other.x_min < self.x_min {
            self.x_min = other.x_min;
        }
        if other.y_min < self.y_min {
            self.y_min = other.y_min;
        }
        if other.x_max > self.x_max {
            self.x_max = other.x_max;
        }
        if other.y_max > self.y_max {
            self.y_max = other.y_max;
        }
        self
    }

    /// Returns a new box containing both.
    pub fn merge(&self, other: Self) -> Self {
        let mut merged = *self;
        merged.merge_bounds(&other);
        merged
    }

    /// Extends the box to include a circle.
    pub fn merge_circle(&mut self, x: f64, y: f64, r: f64) {
        let r = r.abs();
        self.merge_bounds(&Bounds::new(x - r, y - r, x + r, y + r));
    }

    /// Expands either width or height so that `width / height == aspect`.
    ///
    /// `focus` gives the fraction of the padding applied to the right and top sides, `(0.5, 0.5)` by default.
    pub fn fill_out(&mut self, aspect: f64, focus: Option<(f64, f64)>) -> &mut Self {
        let (focus_x, focus_y) = focus.unwrap_or((0.5, 0.5));
        let w = self.width();
        let h = self.height();
        if aspect.is_nan() || aspect <= 0.0 {
            return self;
        }

        if w / h < aspect {
            let pad = h * aspect - w;
            self.x_min -= (1.0 - focus_x) * pad;
            self.x_max += focus_x * pad;
        } else {
            let pad = w / aspect - h;
            self.y_min -= (1.0 - focus_y) * pad;
            self.y_max += focus_y * pad;
        }
        self
    }

    /// Puts swapped minimum and maximum values in order.
    pub fn update(&mut self) {
        if self.x_min > self.x_max {
            std::mem::swap(&mut self.x_min, &mut self.x_max);
        }
        if self.y_min > self.y_max {
            std::mem::swap(&mut self.y_min, &mut self.y_max);
        }
    }

    /// Applies the transform to the box corners.
    pub fn transform(&mut self, t: &Transform) -> &mut Self {
        self.x_min = self.x_min * t.mx + t.bx;
        self.x_max = self.x_max * t.mx + t.bx;
        self.y_min = self.y_min * t.my + t.by;
        self.y_max = self.y_max * t.my + t.by;
        self.update();
        self
    }

    /// Transform mapping this box onto `other`. With `flip_y` the y axis is inverted (pixel coordinates).
    ///
    /// Zero-size dimensions get a scale of 1.
    pub fn get_transform(&self, other: &Bounds, flip_y: bool) -> Transform {
        fn ratio(a: f64, b: f64) -> f64 {
            let v = a / b;
            if v.is_nan() || v == 0.0 || v.is_infinite() {
                1.0
            } else {
                v
            }
        }

        let mx = ratio(other.width(), self.width());
        let bx = other.x_min - mx * self.x_min;
        let (my, by) = if flip_y {
            let my = ratio(-other.height(), self.height());
            (my, other.y_max - my * self.y_min)
        } else {
            let my = ratio(other.height(), self.height());
            (my, other.y_min - my * self.y_min)
        };

        Transform { mx, my, bx, by }
    }
}

impl FromIterator<Bounds> for Bounds {
    fn from_iter<T: IntoIterator<Item = Bounds>>(iter: T) -> Self {
        let mut curr = Bounds::empty();
        for rect in iter {
            curr.merge_bounds(&rect);
        }

        curr
    }
}

impl Display for Bounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{\"xmin\":{},\"xmax\":{},\"ymin\":{},\"ymax\":{}}}",
            self.x_min, self.x_max, self.y_min, self.y_max
        )
    }
}

/// Scale and offset applied independently to x and y.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// X scale.
    pub mx: f64,
    /// Y scale.
    pub my: f64,
    /// X offset.
    pub bx: f64,
    /// Y offset.
    pub by: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            mx: 1.0,
            my: 1.0,
            bx: 0.0,
            by: 0.0,
        }
    }
}

impl Transform {
    /// Transforms a pair of coordinates.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.mx + self.bx, y * self.my + self.by)
    }
}
