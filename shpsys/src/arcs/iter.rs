use std::iter::FusedIterator;

use nalgebra::Point2;

use crate::arc_id::ArcId;
use crate::arcs::ArcCollection;
use crate::error::ShpsysError;

/// Iterates over all vertices of an arc, forward or backward.
#[derive(Debug, Clone)]
pub struct ArcIter<'a> {
    xx: &'a [f64],
    yy: &'a [f64],
    i: usize,
    n: usize,
    forward: bool,
}

impl<'a> ArcIter<'a> {
    /// Iterator over `len` vertices starting at buffer index `start`.
    pub fn new(xx: &'a [f64], yy: &'a [f64], start: usize, len: usize, forward: bool) -> Self {
        let i = if forward || len == 0 {
            start
        } else {
            start + len - 1
        };
        Self {
            xx,
            yy,
            i,
            n: len,
            forward,
        }
    }
}

impl Iterator for ArcIter<'_> {
    type Item = Point2<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.n == 0 {
            return None;
        }

        let i = self.i;
        self.n -= 1;
        if self.n > 0 {
            if self.forward {
                self.i += 1;
            } else {
                self.i -= 1;
            }
        }
        Some(Point2::new(self.xx[i], self.yy[i]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.n, Some(self.n))
    }
}

impl ExactSizeIterator for ArcIter<'_> {}
impl FusedIterator for ArcIter<'_> {}

/// Iterates over the vertices of an arc whose simplification threshold is not below the cutoff.
///
/// The first vertex in the direction of traversal is always returned.
#[derive(Debug, Clone)]
pub struct FilteredArcIter<'a> {
    xx: &'a [f64],
    yy: &'a [f64],
    zz: &'a [f64],
    zlimit: f64,
    i: isize,
    stop: isize,
    inc: isize,
}

impl<'a> FilteredArcIter<'a> {
    /// Iterator over `len` vertices starting at buffer index `start`, skipping vertices with `z < zlimit`.
    pub fn new(
        xx: &'a [f64],
        yy: &'a [f64],
        zz: &'a [f64],
        zlimit: f64,
        start: usize,
        len: usize,
        forward: bool,
    ) -> Self {
        let (start, len) = (start as isize, len as isize);
        let (i, stop, inc) = if forward {
            (start, start + len, 1)
        } else {
            (start + len - 1, start - 1, -1)
        };
        Self {
            xx,
            yy,
            zz,
            zlimit,
            i,
            stop,
            inc,
        }
    }
}

impl Iterator for FilteredArcIter<'_> {
    type Item = Point2<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.i == self.stop {
            return None;
        }

        let i = self.i;
        let mut j = i;
        loop {
            j += self.inc;
            if j == self.stop || self.zz[j as usize] >= self.zlimit {
                break;
            }
        }
        self.i = j;
        Some(Point2::new(self.xx[i as usize], self.yy[i as usize]))
    }
}

impl FusedIterator for FilteredArcIter<'_> {}

/// Vertices of one arc as seen through the current simplification state.
#[derive(Debug, Clone)]
pub enum ArcVertices<'a> {
    /// No simplification cutoff is active.
    All(ArcIter<'a>),
    /// Vertices below the cutoff are skipped.
    Filtered(FilteredArcIter<'a>),
}

impl Iterator for ArcVertices<'_> {
    type Item = Point2<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ArcVertices::All(iter) => iter.next(),
            ArcVertices::Filtered(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            ArcVertices::All(iter) => iter.size_hint(),
            ArcVertices::Filtered(_) => (0, None),
        }
    }
}

impl FusedIterator for ArcVertices<'_> {}

/// Iterates over the vertices of a path, skipping the first vertex of every arc after the first one.
#[derive(Debug, Clone)]
pub struct ShapeIter<'a> {
    arcs: &'a ArcCollection,
    ids: &'a [ArcId],
    next_arc: usize,
    current: Option<ArcVertices<'a>>,
}

impl Iterator for ShapeIter<'_> {
    type Item = Point2<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(p) = self.current.as_mut().and_then(Iterator::next) {
                return Some(p);
            }

            let &id = self.ids.get(self.next_arc)?;
            let mut iter = self.arcs.arc_vertices(id.abs_index(), id.is_reversed());
            if self.next_arc > 0 {
                iter.next();
            }
            self.current = Some(iter);
            self.next_arc += 1;
        }
    }
}

impl ArcCollection {
    /// Vertices of the arc in the direction of `id`, respecting the simplification cutoff.
    pub fn get_arc_iter(&self, id: ArcId) -> Result<ArcVertices<'_>, ShpsysError> {
        let index = self.check_arc(id)?;
        Ok(self.arc_vertices(index, id.is_reversed()))
    }

    /// Vertices of a path. All ids are validated before iteration starts.
    pub fn get_shape_iter<'a>(&'a self, ids: &'a [ArcId]) -> Result<ShapeIter<'a>, ShpsysError> {
        for &id in ids {
            self.check_arc(id)?;
        }

        Ok(ShapeIter {
            arcs: self,
            ids,
            next_arc: 0,
            current: None,
        })
    }

    pub(crate) fn arc_vertices(&self, index: usize, reversed: bool) -> ArcVertices<'_> {
        let start = self.ii[index];
        let len = self.nn[index];
        match self.simplification.active() {
            Some((zz, zlimit)) => ArcVertices::Filtered(FilteredArcIter::new(
                &self.xx, &self.yy, zz, zlimit, start, len, !reversed,
            )),
            None => ArcVertices::All(ArcIter::new(&self.xx, &self.yy, start, len, !reversed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arcs::Thresholds;
    use assert_matches::assert_matches;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    fn arcs() -> ArcCollection {
        ArcCollection::from_arcs(vec![
            vec![[0.0, 0.0], [1.0, 1.0], [2.0, 0.0], [3.0, 1.0]],
            vec![[3.0, 1.0], [3.0, 3.0]],
            vec![],
        ])
    }

    #[test]
    fn forward_and_reverse() {
        let arcs = arcs();
        let forward: Vec<_> = arcs.get_arc_iter(ArcId::new(0)).expect("valid id").collect();
        let mut backward: Vec<_> = arcs
            .get_arc_iter(ArcId::reversed(0))
            .expect("valid id")
            .collect();
        assert_eq!(forward.len(), 4);
        backward.reverse();
        assert_eq!(forward, backward);

        assert_eq!(arcs.get_arc_iter(ArcId::new(2)).expect("valid id").count(), 0);
        assert_eq!(
            arcs.get_arc_iter(ArcId::reversed(2)).expect("valid id").count(),
            0
        );
        assert_matches!(
            arcs.get_arc_iter(ArcId::new(3)),
            Err(ShpsysError::ArcOutOfRange(3))
        );
    }

    #[test]
    fn filtered() {
        let mut arcs = arcs();
        arcs.set_thresholds(Some(Thresholds::PerArc(vec![
            vec![f64::INFINITY, 1.0, 3.0, f64::INFINITY],
            vec![f64::INFINITY, f64::INFINITY],
            vec![],
        ])))
        .expect("valid thresholds");
        arcs.set_retained_interval(2.0);

        let forward: Vec<_> = arcs.get_arc_iter(ArcId::new(0)).expect("valid id").collect();
        assert_eq!(forward, vec![p(0.0, 0.0), p(2.0, 0.0), p(3.0, 1.0)]);
        let backward: Vec<_> = arcs
            .get_arc_iter(ArcId::reversed(0))
            .expect("valid id")
            .collect();
        assert_eq!(backward, vec![p(3.0, 1.0), p(2.0, 0.0), p(0.0, 0.0)]);
        assert_eq!(arcs.get_arc_iter(ArcId::new(2)).expect("valid id").count(), 0);
    }

    #[test]
    fn shape() {
        let arcs = arcs();
        let ids = [ArcId::new(0), ArcId::new(1)];
        let points: Vec<_> = arcs.get_shape_iter(&ids).expect("valid ids").collect();
        assert_eq!(points.len(), 5);
        assert_eq!(points[3], p(3.0, 1.0));
        assert_eq!(points[4], p(3.0, 3.0));

        let ids = [ArcId::reversed(1), ArcId::reversed(0)];
        let points: Vec<_> = arcs.get_shape_iter(&ids).expect("valid ids").collect();
        assert_eq!(
            points,
            vec![p(3.0, 3.0), p(3.0, 1.0), p(2.0, 0.0), p(1.0, 1.0), p(0.0, 0.0)]
        );

        assert_eq!(arcs.get_shape_iter(&[]).expect("valid ids").count(), 0);
        assert_matches!(
            arcs.get_shape_iter(&[ArcId::new(0), ArcId::reversed(5)]),
            Err(ShpsysError::ArcOutOfRange(-6))
        );
    }

    #[test]
    fn exact_size() {
        let iter = ArcIter::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0], 1, 2, false);
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.collect::<Vec<_>>(), vec![p(2.0, 2.0), p(1.0, 1.0)]);
    }
}
