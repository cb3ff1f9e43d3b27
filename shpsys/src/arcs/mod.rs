//! Topological arc storage.
//!
//! All vertices of a dataset are kept in flat coordinate buffers. Arcs are contiguous ranges of these buffers
//! described by a length table (`nn`) and a derived offset table (`ii`). Shapes refer to arcs by [`ArcId`], so
//! several shapes can share one arc, and an arc can be traversed in either direction.
//!
//! Optional per-vertex simplification thresholds (`zz`) and the active cutoff (`zlimit`) live in a
//! [`SimplificationState`]. Vertices with a threshold below the cutoff are hidden from every iterator without being
//! removed from the buffers.

use std::fmt::{Display, Formatter};

use nalgebra::Point2;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shpsys_types::{Bounds, CartesianPoint2d};

use crate::arc_id::ArcId;
use crate::error::ShpsysError;
use crate::shape::Path;

mod edit;
mod iter;
mod simplify;

pub use edit::*;
pub use iter::*;
pub use simplify::*;

/// Collections with fewer points than this are printed as JSON by the `Display` implementation.
const DISPLAY_POINTS_LIMIT: usize = 50;

/// Simplification data of an [`ArcCollection`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimplificationState {
    /// Removal threshold of every vertex. Arc endpoints are `Infinity`.
    zz: Option<Vec<f64>>,
    /// Active cutoff. Vertices with `z < zlimit` are skipped; 0 disables filtering.
    zlimit: f64,
}

impl SimplificationState {
    /// Per-vertex thresholds, if set.
    pub fn thresholds(&self) -> Option<&[f64]> {
        self.zz.as_deref()
    }

    /// Active cutoff.
    pub fn zlimit(&self) -> f64 {
        self.zlimit
    }

    /// Thresholds to filter by, if filtering is active.
    pub(crate) fn active(&self) -> Option<(&[f64], f64)> {
        match &self.zz {
            Some(zz) if self.zlimit > 0.0 => Some((zz, self.zlimit)),
            _ => None,
        }
    }
}

/// Borrowed view of the raw buffers of an [`ArcCollection`].
#[derive(Debug, Copy, Clone)]
pub struct VertexData<'a> {
    /// X coordinates of all vertices.
    pub xx: &'a [f64],
    /// Y coordinates of all vertices.
    pub yy: &'a [f64],
    /// Simplification thresholds.
    pub zz: Option<&'a [f64]>,
    /// Bounding boxes of arcs, 4 values per arc.
    pub bb: &'a [f64],
    /// Arc lengths.
    pub nn: &'a [usize],
    /// Arc offsets.
    pub ii: &'a [usize],
}

/// Shared-vertex storage of polylines.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcCollection {
    xx: Vec<f64>,
    yy: Vec<f64>,
    nn: Vec<usize>,
    ii: Vec<usize>,
    bb: Vec<f64>,
    bounds: Bounds,
    simplification: SimplificationState,
}

impl ArcCollection {
    /// Creates a collection from arc lengths and concatenated coordinates.
    ///
    /// Fails with [`ShpsysError::CountingError`] if the lengths do not add up to the number of coordinates.
    pub fn new(nn: Vec<usize>, xx: Vec<f64>, yy: Vec<f64>) -> Result<Self, ShpsysError> {
        let mut arcs = Self {
            xx: Vec::new(),
            yy: Vec::new(),
            nn: Vec::new(),
            ii: Vec::new(),
            bb: Vec::new(),
            bounds: Bounds::empty(),
            simplification: SimplificationState::default(),
        };
        arcs.init_xy_data(nn, xx, yy)?;
        Ok(arcs)
    }

    /// Creates a collection from a list of polylines.
    pub fn from_arcs<A, P>(arcs: impl IntoIterator<Item = A>) -> Self
    where
        A: AsRef<[P]>,
        P: CartesianPoint2d<Num = f64>,
    {
        let mut nn = vec![];
        let mut xx = vec![];
        let mut yy = vec![];
        for arc in arcs {
            let points = arc.as_ref();
            nn.push(points.len());
            for p in points {
                xx.push(p.x());
                yy.push(p.y());
            }
        }

        let ii = offsets(&nn);
        let (bb, bounds) = calc_bounds_table(&xx, &yy, &nn, &ii);
        Self {
            xx,
            yy,
            nn,
            ii,
            bb,
            bounds,
            simplification: SimplificationState::default(),
        }
    }

    /// Replaces all vertex data and re-derives the offsets and bounding boxes. The simplification cutoff is reset.
    pub fn update_vertex_data(
        &mut self,
        nn: Vec<usize>,
        xx: Vec<f64>,
        yy: Vec<f64>,
        zz: Option<Vec<f64>>,
    ) -> Result<(), ShpsysError> {
        self.init_xy_data(nn, xx, yy)?;
        self.init_z_data(zz)
    }

    fn init_xy_data(
        &mut self,
        nn: Vec<usize>,
        xx: Vec<f64>,
        yy: Vec<f64>,
    ) -> Result<(), ShpsysError> {
        let ii = offsets(&nn);
        let lengths = nn.iter().sum();
        if lengths != xx.len() || xx.len() != yy.len() {
            return Err(ShpsysError::CountingError {
                lengths,
                xx: xx.len(),
                yy: yy.len(),
            });
        }

        self.xx = xx;
        self.yy = yy;
        self.nn = nn;
        self.ii = ii;
        self.simplification = SimplificationState::default();
        self.init_bounds();
        Ok(())
    }

    pub(crate) fn init_z_data(&mut self, zz: Option<Vec<f64>>) -> Result<(), ShpsysError> {
        match zz {
            None => {
                self.simplification = SimplificationState::default();
            }
            Some(zz) => {
                if zz.len() != self.xx.len() {
                    return Err(ShpsysError::MismatchedThresholds {
                        expected: self.xx.len(),
                        found: zz.len(),
                    });
                }
                self.simplification.zz = Some(zz);
            }
        }
        Ok(())
    }

    pub(crate) fn init_bounds(&mut self) {
        let (bb, bounds) = calc_bounds_table(&self.xx, &self.yy, &self.nn, &self.ii);
        self.bb = bb;
        self.bounds = bounds;
    }

    /// Coordinate buffers for in-place editing. Callers must call [`ArcCollection::init_bounds`] afterwards.
    pub(crate) fn coords_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.xx, &mut self.yy)
    }

    /// Raw buffers.
    pub fn get_vertex_data(&self) -> VertexData<'_> {
        VertexData {
            xx: &self.xx,
            yy: &self.yy,
            zz: self.simplification.thresholds(),
            bb: &self.bb,
            nn: &self.nn,
            ii: &self.ii,
        }
    }

    /// Simplification thresholds and the active cutoff.
    pub fn simplification(&self) -> &SimplificationState {
        &self.simplification
    }

    /// Deep copy, including simplification data.
    pub fn get_copy(&self) -> Self {
        self.clone()
    }

    /// Number of arcs.
    pub fn size(&self) -> usize {
        self.nn.len()
    }

    /// Number of vertices, including the hidden ones.
    pub fn get_point_count(&self) -> usize {
        self.xx.len()
    }

    /// Bounds of all vertices.
    pub fn get_bounds(&self) -> Bounds {
        self.bounds
    }

    /// Returns false if the coordinates look like longitude and latitude.
    pub fn is_planar(&self) -> bool {
        !(self.bounds.has_bounds() && self.bounds.probably_decimal_degrees())
    }

    /// Index of the arc, if it exists in the collection.
    pub(crate) fn check_arc(&self, id: ArcId) -> Result<usize, ShpsysError> {
        let index = id.abs_index();
        if index < self.nn.len() {
            Ok(index)
        } else {
            Err(ShpsysError::ArcOutOfRange(id.to_signed()))
        }
    }

    /// Number of vertices of the arc, including the hidden ones.
    pub fn get_arc_length(&self, id: ArcId) -> Result<usize, ShpsysError> {
        Ok(self.nn[self.check_arc(id)?])
    }

    /// Buffer index of the `nth` vertex of the arc, counted in the direction of `id`. Negative `nth` counts from the
    /// end: `-1` is the last vertex.
    pub fn index_of_vertex(&self, id: ArcId, nth: isize) -> Result<usize, ShpsysError> {
        let index = self.check_arc(id)?;
        let len = self.nn[index] as isize;
        let mut pos = if nth < 0 { len + nth } else { nth };
        if id.is_reversed() {
            pos = len - pos - 1;
        }
        if pos < 0 || pos >= len {
            return Err(ShpsysError::VertexOutOfRange {
                arc: id.to_signed(),
                nth,
            });
        }

        Ok(self.ii[index] + pos as usize)
    }

    /// Coordinates of the `nth` vertex of the arc. See [`ArcCollection::index_of_vertex`].
    pub fn get_vertex(&self, id: ArcId, nth: isize) -> Result<Point2<f64>, ShpsysError> {
        let i = self.index_of_vertex(id, nth)?;
        Ok(Point2::new(self.xx[i], self.yy[i]))
    }

    /// Returns true if the vertex at buffer index `idx` is the first or the last vertex of some arc.
    pub fn point_is_endpoint(&self, idx: usize) -> bool {
        self.ii
            .iter()
            .zip(&self.nn)
            .any(|(&start, &len)| len > 0 && (idx == start || idx == start + len - 1))
    }

    /// Returns true if the first and the last vertices of the arc are distinct vertices with the same coordinates.
    /// Closed arcs may still be collapsed.
    pub fn arc_is_closed(&self, id: ArcId) -> Result<bool, ShpsysError> {
        let i = self.index_of_vertex(id, 0)?;
        let j = self.index_of_vertex(id, -1)?;
        Ok(i != j && self.xx[i] == self.xx[j] && self.yy[i] == self.yy[j])
    }

    /// Returns true if the arc is closed and its first and last segments mirror each other.
    pub fn arc_is_lollipop(&self, id: ArcId) -> Result<bool, ShpsysError> {
        if self.get_arc_length(id)? <= 2 || !self.arc_is_closed(id)? {
            return Ok(false);
        }
        let i = self.index_of_vertex(id, 1)?;
        let j = self.index_of_vertex(id, -2)?;
        Ok(self.xx[i] == self.xx[j] && self.yy[i] == self.yy[j])
    }

    /// Returns true if all visible vertices of the arc have the same coordinates. Empty arcs are degenerate.
    pub fn arc_is_degenerate(&self, id: ArcId) -> Result<bool, ShpsysError> {
        let mut iter = self.get_arc_iter(id)?;
        let Some(first) = iter.next() else {
            return Ok(true);
        };
        Ok(iter.all(|p| p == first))
    }

    /// Visible vertices of every arc, in arc order.
    pub fn to_array(&self) -> Vec<Vec<[f64; 2]>> {
        (0..self.size())
            .map(|i| self.arc_vertices(i, false).map(|p| [p.x, p.y]).collect())
            .collect()
    }

    /// Calls `f` with a vertex iterator and the index of every arc.
    pub fn for_each(&self, mut f: impl FnMut(ArcVertices<'_>, usize)) {
        for i in 0..self.size() {
            f(self.arc_vertices(i, false), i);
        }
    }

    /// Calls `f` with the offset, length, raw buffers and index of every arc.
    pub fn for_each2(
        &self,
        mut f: impl FnMut(usize, usize, &[f64], &[f64], Option<&[f64]>, usize),
    ) {
        let zz = self.simplification.thresholds();
        for i in 0..self.size() {
            f(self.ii[i], self.nn[i], &self.xx, &self.yy, zz, i);
        }
    }

    /// Calls `f` with the coordinate and threshold slices of every arc.
    pub fn for_each3(&self, mut f: impl FnMut(&[f64], &[f64], Option<&[f64]>, usize)) {
        let zz = self.simplification.thresholds();
        for i in 0..self.size() {
            let range = self.ii[i]..self.ii[i] + self.nn[i];
            f(
                &self.xx[range.clone()],
                &self.yy[range.clone()],
                zz.map(|zz| &zz[range]),
                i,
            );
        }
    }

    /// Calls `f(i, j, xx, yy)` with buffer indices of both ends of every visible segment of the arc, in the direction
    /// of `id`. Returns the number of segments.
    pub fn for_each_arc_segment(
        &self,
        id: ArcId,
        mut f: impl FnMut(usize, usize, &[f64], &[f64]),
    ) -> Result<usize, ShpsysError> {
        let index = self.check_arc(id)?;
        let n = self.nn[index];
        if n < 2 {
            return Ok(0);
        }

        let active = self.simplification.active();
        let start = self.ii[index];
        let mut v1 = if id.is_reversed() { start + n - 1 } else { start };
        let mut count = 0;
        for step in 1..n {
            let v2 = if id.is_reversed() {
                start + n - 1 - step
            } else {
                start + step
            };
            let visible = match active {
                Some((zz, zlimit)) => zz[v2] >= zlimit,
                None => true,
            };
            if visible {
                f(v1, v2, &self.xx, &self.yy);
                v1 = v2;
                count += 1;
            }
        }

        Ok(count)
    }

    /// Calls `f(i, j, xx, yy)` for every visible segment of every arc. Returns the number of segments.
    pub fn for_each_segment(&self, mut f: impl FnMut(usize, usize, &[f64], &[f64])) -> usize {
        let mut count = 0;
        for i in 0..self.size() {
            count += ArcId::try_new(i)
                .and_then(|id| self.for_each_arc_segment(id, &mut f))
                .unwrap_or(0);
        }
        count
    }

    fn arc_bbox(&self, i: usize) -> Option<&[f64]> {
        self.bb.get(i * 4..i * 4 + 4)
    }

    /// Returns true if the bounding box of arc `i` intersects `bounds`.
    pub fn arc_intersects_bbox(&self, i: usize, bounds: &Bounds) -> bool {
        self.arc_bbox(i).is_some_and(|b| {
            b[0] <= bounds.x_max && b[2] >= bounds.x_min && b[3] >= bounds.y_min && b[1] <= bounds.y_max
        })
    }

    /// Returns true if the bounding box of arc `i` lies inside `bounds`.
    pub fn arc_is_contained(&self, i: usize, bounds: &Bounds) -> bool {
        self.arc_bbox(i).is_some_and(|b| {
            b[0] >= bounds.x_min && b[2] <= bounds.x_max && b[1] >= bounds.y_min && b[3] <= bounds.y_max
        })
    }

    /// Returns true if both sides of the bounding box of arc `i` are shorter than `units`.
    pub fn arc_is_smaller(&self, i: usize, units: f64) -> bool {
        self.arc_bbox(i)
            .is_some_and(|b| b[2] - b[0] < units && b[3] - b[1] < units)
    }

    /// Extends `bounds` with the bounding box of the arc.
    pub fn merge_arc_bounds(&self, id: ArcId, bounds: &mut Bounds) -> Result<(), ShpsysError> {
        let index = self.check_arc(id)?;
        if let Some(b) = self.arc_bbox(index) {
            bounds.merge_bounds(&Bounds {
                x_min: b[0],
                y_min: b[1],
                x_max: b[2],
                y_max: b[3],
            });
        }
        Ok(())
    }

    /// Bounds of the arcs of a path.
    pub fn get_simple_shape_bounds(&self, ids: &[ArcId]) -> Result<Bounds, ShpsysError> {
        let mut bounds = Bounds::empty();
        for &id in ids {
            self.merge_arc_bounds(id, &mut bounds)?;
        }
        Ok(bounds)
    }

    /// Bounds of the arcs of a path as `[x_min, y_min, x_max, y_max]`, or `None` for an empty path.
    pub fn get_simple_shape_bounds2(&self, ids: &[ArcId]) -> Result<Option<[f64; 4]>, ShpsysError> {
        let Some((&first, rest)) = ids.split_first() else {
            return Ok(None);
        };

        let mut bbox = [0.0; 4];
        let index = self.check_arc(first)?;
        bbox.copy_from_slice(&self.bb[index * 4..index * 4 + 4]);
        for &id in rest {
            let j = self.check_arc(id)? * 4;
            let b = &self.bb[j..j + 4];
            if b[0] < bbox[0] {
                bbox[0] = b[0];
            }
            if b[1] < bbox[1] {
                bbox[1] = b[1];
            }
            if b[2] > bbox[2] {
                bbox[2] = b[2];
            }
            if b[3] > bbox[3] {
                bbox[3] = b[3];
            }
        }
        Ok(Some(bbox))
    }

    /// Bounds of all paths of a shape. A missing shape has empty bounds.
    pub fn get_multi_shape_bounds(&self, paths: Option<&[Path]>) -> Result<Bounds, ShpsysError> {
        let mut bounds = Bounds::empty();
        for path in paths.unwrap_or_default() {
            for &id in path {
                self.merge_arc_bounds(id, &mut bounds)?;
            }
        }
        Ok(bounds)
    }
}

fn offsets(nn: &[usize]) -> Vec<usize> {
    let mut idx = 0;
    nn.iter()
        .map(|&n| {
            let start = idx;
            idx += n;
            start
        })
        .collect()
}

fn calc_bounds_table(xx: &[f64], yy: &[f64], nn: &[usize], ii: &[usize]) -> (Vec<f64>, Bounds) {
    let mut bb = Vec::with_capacity(nn.len() * 4);
    let mut bounds = Bounds::empty();
    for (&start, &len) in ii.iter().zip(nn) {
        match calc_arc_bounds(&xx[start..start + len], &yy[start..start + len]) {
            Some(b) => {
                bb.extend_from_slice(&b);
                bounds.merge_bounds(&Bounds {
                    x_min: b[0],
                    y_min: b[1],
                    x_max: b[2],
                    y_max: b[3],
                });
            }
            None => bb.extend_from_slice(&[
                f64::INFINITY,
                f64::INFINITY,
                f64::NEG_INFINITY,
                f64::NEG_INFINITY,
            ]),
        }
    }
    (bb, bounds)
}

/// `[x_min, y_min, x_max, y_max]` of the coordinates, or `None` if there are none.
pub fn calc_arc_bounds(xx: &[f64], yy: &[f64]) -> Option<[f64; 4]> {
    let (&x0, &y0) = (xx.first()?, yy.first()?);
    let mut b = [x0, y0, x0, y0];
    for (&x, &y) in xx.iter().zip(yy).skip(1) {
        if x < b[0] {
            b[0] = x;
        }
        if x > b[2] {
            b[2] = x;
        }
        if y < b[1] {
            b[1] = y;
        }
        if y > b[3] {
            b[3] = y;
        }
    }
    Some(b)
}

/// Reverses `len` elements of the buffer starting at `start`.
pub fn reverse_path_coords(arr: &mut [f64], start: usize, len: usize) {
    arr[start..start + len].reverse();
}

impl Display for ArcCollection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.get_point_count() < DISPLAY_POINTS_LIMIT {
            let json = serde_json::to_string(&self.to_array()).map_err(|_| std::fmt::Error)?;
            write!(f, "{json}")
        } else {
            write!(f, "[ArcCollection ({})]", self.size())
        }
    }
}

impl Serialize for ArcCollection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ArcCollection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let arcs = Vec::<Vec<[f64; 2]>>::deserialize(deserializer)?;
        Ok(Self::from_arcs(arcs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    fn sample() -> ArcCollection {
        ArcCollection::from_arcs(vec![
            vec![[0.0, 0.0], [1.0, 1.0], [2.0, 0.0]],
            vec![[2.0, 0.0], [2.0, 2.0]],
            vec![[5.0, 5.0], [6.0, 6.0], [7.0, 5.0], [8.0, 6.0]],
        ])
    }

    #[test]
    fn construction_invariants() {
        let arcs = sample();
        let data = arcs.get_vertex_data();
        assert_eq!(data.nn, &[3, 2, 4]);
        assert_eq!(data.ii, &[0, 3, 5]);
        assert_eq!(data.xx.len(), 9);
        assert_eq!(data.yy.len(), 9);
        assert_eq!(data.nn.iter().sum::<usize>(), data.xx.len());
        assert_eq!(arcs.size(), 3);
        assert_eq!(arcs.get_point_count(), 9);
    }

    #[test]
    fn counting_error() {
        assert_matches!(
            ArcCollection::new(vec![2, 2], vec![0.0; 3], vec![0.0; 3]),
            Err(ShpsysError::CountingError { lengths: 4, .. })
        );
        assert_matches!(
            ArcCollection::new(vec![2], vec![0.0; 2], vec![0.0; 3]),
            Err(ShpsysError::CountingError { .. })
        );
        assert!(ArcCollection::new(vec![], vec![], vec![]).is_ok());
    }

    #[test]
    fn bounds() {
        let arcs = sample();
        assert_eq!(arcs.get_bounds(), Bounds::new(0.0, 0.0, 8.0, 6.0));
        assert_eq!(&arcs.get_vertex_data().bb[0..4], &[0.0, 0.0, 2.0, 1.0]);

        let path = [ArcId::new(0), ArcId::reversed(1)];
        assert_eq!(
            arcs.get_simple_shape_bounds(&path).expect("valid ids"),
            Bounds::new(0.0, 0.0, 2.0, 2.0)
        );
        assert_eq!(
            arcs.get_simple_shape_bounds2(&path).expect("valid ids"),
            Some([0.0, 0.0, 2.0, 2.0])
        );
        assert_eq!(arcs.get_simple_shape_bounds2(&[]).expect("valid ids"), None);

        let paths = vec![vec![ArcId::new(1)], vec![ArcId::new(2)]];
        assert_eq!(
            arcs.get_multi_shape_bounds(Some(&paths)).expect("valid ids"),
            Bounds::new(2.0, 0.0, 8.0, 6.0)
        );
        assert!(!arcs
            .get_multi_shape_bounds(None)
            .expect("valid ids")
            .has_bounds());
        assert_matches!(
            arcs.get_simple_shape_bounds(&[ArcId::new(3)]),
            Err(ShpsysError::ArcOutOfRange(3))
        );
    }

    #[test]
    fn bbox_tests() {
        let arcs = sample();
        let window = Bounds::new(1.5, -1.0, 3.0, 3.0);
        assert!(arcs.arc_intersects_bbox(0, &window));
        assert!(arcs.arc_is_contained(1, &window));
        assert!(!arcs.arc_is_contained(0, &window));
        assert!(!arcs.arc_intersects_bbox(2, &window));
        assert!(!arcs.arc_intersects_bbox(10, &window));
        assert!(arcs.arc_is_smaller(1, 2.1));
        assert!(!arcs.arc_is_smaller(2, 2.1));
    }

    #[test]
    fn vertices() {
        let arcs = sample();
        assert_eq!(arcs.index_of_vertex(ArcId::new(2), 0), Ok(5));
        assert_eq!(arcs.index_of_vertex(ArcId::new(2), -1), Ok(8));
        assert_eq!(arcs.index_of_vertex(ArcId::reversed(2), 0), Ok(8));
        assert_eq!(arcs.index_of_vertex(ArcId::reversed(2), -1), Ok(5));
        assert_eq!(
            arcs.get_vertex(ArcId::reversed(0), 1),
            Ok(Point2::new(1.0, 1.0))
        );
        assert_matches!(
            arcs.index_of_vertex(ArcId::new(1), 2),
            Err(ShpsysError::VertexOutOfRange { arc: 1, nth: 2 })
        );
        assert_matches!(
            arcs.get_vertex(ArcId::reversed(7), 0),
            Err(ShpsysError::ArcOutOfRange(-8))
        );

        assert!(arcs.point_is_endpoint(0));
        assert!(arcs.point_is_endpoint(4));
        assert!(!arcs.point_is_endpoint(1));
        assert!(!arcs.point_is_endpoint(7));
    }

    #[test]
    fn closed_and_lollipop_arcs() {
        let arcs = ArcCollection::from_arcs(vec![
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]],
            vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]],
            vec![[3.0, 3.0]],
            vec![[3.0, 3.0], [3.0, 3.0]],
        ]);
        assert_eq!(arcs.arc_is_closed(ArcId::new(0)), Ok(true));
        assert_eq!(arcs.arc_is_lollipop(ArcId::new(0)), Ok(false));
        assert_eq!(arcs.arc_is_lollipop(ArcId::reversed(1)), Ok(true));
        assert_eq!(arcs.arc_is_closed(ArcId::new(2)), Ok(false));
        assert_eq!(arcs.arc_is_degenerate(ArcId::new(3)), Ok(true));
        assert_eq!(arcs.arc_is_degenerate(ArcId::new(1)), Ok(false));
    }

    #[test]
    fn segments() {
        let arcs = sample();
        let mut visited = vec![];
        let count = arcs
            .for_each_arc_segment(ArcId::reversed(0), |i, j, _, _| visited.push((i, j)))
            .expect("valid id");
        assert_eq!(count, 2);
        assert_eq!(visited, vec![(2, 1), (1, 0)]);

        let mut total = 0.0;
        let count = arcs.for_each_segment(|i, j, xx, yy| {
            total += ((xx[i] - xx[j]).powi(2) + (yy[i] - yy[j]).powi(2)).sqrt();
        });
        assert_eq!(count, 6);
        assert_abs_diff_eq!(total, 2.0 * 2f64.sqrt() + 2.0 + 3.0 * 2f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn raw_access() {
        let arcs = sample();
        let mut lengths = vec![];
        arcs.for_each2(|start, len, xx, _, zz, i| {
            assert!(zz.is_none());
            assert_eq!(xx.len(), 9);
            lengths.push((i, start, len));
        });
        assert_eq!(lengths, vec![(0, 0, 3), (1, 3, 2), (2, 5, 4)]);

        let mut firsts = vec![];
        arcs.for_each3(|xx, yy, _, _| firsts.push((xx[0], yy[0])));
        assert_eq!(firsts, vec![(0.0, 0.0), (2.0, 0.0), (5.0, 5.0)]);

        let mut counts = vec![];
        arcs.for_each(|iter, _| counts.push(iter.count()));
        assert_eq!(counts, vec![3, 2, 4]);
    }

    #[test]
    fn array_round_trip() {
        let arcs = sample();
        let arr = arcs.to_array();
        assert_eq!(ArcCollection::from_arcs(arr.clone()).to_array(), arr);
    }

    #[test]
    fn json() {
        let arcs = ArcCollection::from_arcs(vec![vec![[0.0, 0.0], [1.5, 2.0]]]);
        let json = serde_json::to_string(&arcs).expect("serialize");
        assert_eq!(json, "[[[0.0,0.0],[1.5,2.0]]]");
        let back: ArcCollection = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, arcs);
        assert_eq!(arcs.to_string(), json);
        assert_eq!(
            ArcCollection::from_arcs(vec![vec![[0.0, 0.0]; 60]]).to_string(),
            "[ArcCollection (1)]"
        );
    }

    #[test]
    fn planar_detection() {
        assert!(!sample().is_planar());
        let projected = ArcCollection::from_arcs(vec![vec![[0.0, 0.0], [500_000.0, 4_000_000.0]]]);
        assert!(projected.is_planar());
        assert!(ArcCollection::from_arcs(Vec::<Vec<[f64; 2]>>::new()).is_planar());
    }

    #[test]
    fn reverse_coords() {
        let mut arr = [0.0, 1.0, 2.0, 3.0, 4.0];
        reverse_path_coords(&mut arr, 1, 3);
        assert_eq!(arr, [0.0, 3.0, 2.0, 1.0, 4.0]);
        assert_eq!(calc_arc_bounds(&[], &[]), None);
        assert_eq!(
            calc_arc_bounds(&[3.0, 1.0], &[0.0, 2.0]),
            Some([1.0, 0.0, 3.0, 2.0])
        );
    }
}
