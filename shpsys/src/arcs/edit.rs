use serde::{Deserialize, Serialize};

use crate::arc_id::ArcId;
use crate::arcs::{ArcCollection, ArcVertices};
use crate::error::ShpsysError;
use crate::shape::Path;

/// Mapping from old to new arc indices produced by [`ArcCollection::filter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcIndexMap {
    map: Vec<Option<u32>>,
}

impl ArcIndexMap {
    /// New index of the arc, or `None` if it was removed or never existed.
    pub fn get(&self, old: usize) -> Option<usize> {
        self.map.get(old).copied().flatten().map(|i| i as usize)
    }

    /// Number of arcs before filtering.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the map was produced from an empty collection.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of arcs that were removed.
    pub fn removed_count(&self) -> usize {
        self.map.iter().filter(|v| v.is_none()).count()
    }

    /// Same reference to the arc after reindexing, or `None` if the arc was removed.
    pub fn remap_arc_id(&self, id: ArcId) -> Option<ArcId> {
        let index = self.map.get(id.abs_index()).copied().flatten()?;
        Some(id.with_index(index))
    }

    /// Remaps every arc of the path. References to removed arcs are dropped.
    pub fn remap_path(&self, path: &[ArcId]) -> Path {
        path.iter().filter_map(|&id| self.remap_arc_id(id)).collect()
    }

    /// Signed representation: new index per old index, `-1` for removed arcs.
    pub fn to_signed_vec(&self) -> Vec<i32> {
        self.map
            .iter()
            .map(|v| v.map(|i| ArcId::new(i).to_signed()).unwrap_or(-1))
            .collect()
    }
}

/// Copies `n` elements of the buffer from offset `src` to offset `dest`, front to back.
///
/// Fails if `dest > src`, because a forward copy onto later positions would overwrite elements before they are read.
pub fn copy_elements(
    buf: &mut [f64],
    src: usize,
    dest: usize,
    n: usize,
) -> Result<(), ShpsysError> {
    if dest > src {
        return Err(ShpsysError::BufferCopy { src, dest });
    }
    if dest < src {
        buf.copy_within(src..src + n, dest);
    }
    Ok(())
}

/// Removes consecutive duplicates and `NaN` points from the `arc_len` vertices at offset `src`, writing the kept
/// vertices at offset `dest <= src`.
///
/// When a duplicate is dropped, the higher of the two thresholds is kept. Returns the new length of the arc, or 0 if
/// fewer than two vertices remain (the arc has collapsed).
pub fn dedup_arc_coords(
    src: usize,
    dest: usize,
    arc_len: usize,
    xx: &mut [f64],
    yy: &mut [f64],
    mut zz: Option<&mut [f64]>,
) -> usize {
    let mut n2 = 0;
    let mut i = dest;
    for n in 0..arc_len {
        let j = src + n;
        let (x, y) = (xx[j], yy[j]);
        let keep = !x.is_nan()
            && !y.is_nan()
            && (n2 == 0 || x != xx[dest + n2 - 1] || y != yy[dest + n2 - 1]);
        if keep {
            i = dest + n2;
            xx[i] = x;
            yy[i] = y;
            n2 += 1;
        }
        if let Some(zz) = zz.as_deref_mut() {
            if n2 > 0 && (keep || zz[j] > zz[i]) {
                zz[i] = zz[j];
            }
        }
    }

    if n2 > 1 {
        n2
    } else {
        0
    }
}

impl ArcCollection {
    /// Removes arcs for which `predicate` returns false and reindexes the remaining ones.
    ///
    /// The predicate receives the vertices of each arc (as seen through the simplification cutoff) and its index.
    /// Returns `None` if every arc was kept.
    pub fn filter(
        &mut self,
        mut predicate: impl FnMut(ArcVertices<'_>, usize) -> bool,
    ) -> Result<Option<ArcIndexMap>, ShpsysError> {
        let mut map = Vec::with_capacity(self.size());
        let mut good_arcs = 0u32;
        for i in 0..self.size() {
            if predicate(self.arc_vertices(i, false), i) {
                map.push(Some(good_arcs));
                good_arcs += 1;
            } else {
                map.push(None);
            }
        }

        if good_arcs as usize == self.size() {
            return Ok(None);
        }

        let map = ArcIndexMap { map };
        self.condense_arcs(&map)?;
        Ok(Some(map))
    }

    /// Compacts the buffers, keeping only arcs that have a new index in `map`.
    pub fn condense_arcs(&mut self, map: &ArcIndexMap) -> Result<(), ShpsysError> {
        let mut good_points = 0;
        let mut nn = Vec::with_capacity(self.size());
        for i in 0..self.size() {
            if map.get(i).is_none() {
                continue;
            }
            let (start, len) = (self.ii[i], self.nn[i]);
            copy_elements(&mut self.xx, start, good_points, len)?;
            copy_elements(&mut self.yy, start, good_points, len)?;
            if let Some(zz) = self.simplification.zz.as_deref_mut() {
                copy_elements(zz, start, good_points, len)?;
            }
            nn.push(len);
            good_points += len;
        }

        self.rebuild(nn, good_points)
    }

    /// Removes consecutive duplicate and `NaN` points from every arc. Arcs left with a single vertex become empty.
    /// Returns the number of removed points.
    pub fn dedup_coords(&mut self) -> Result<usize, ShpsysError> {
        let mut i = 0;
        let mut i2 = 0;
        let mut nn = Vec::with_capacity(self.size());
        for &len in &self.nn {
            let len2 = dedup_arc_coords(
                i,
                i2,
                len,
                &mut self.xx,
                &mut self.yy,
                self.simplification.zz.as_deref_mut(),
            );
            nn.push(len2);
            i += len;
            i2 += len2;
        }

        if i > i2 {
            self.rebuild(nn, i2)?;
        }
        Ok(i - i2)
    }

    /// Truncates the buffers to `len` points and re-derives indexes, keeping the simplification state.
    fn rebuild(&mut self, nn: Vec<usize>, len: usize) -> Result<(), ShpsysError> {
        let mut xx = std::mem::take(&mut self.xx);
        let mut yy = std::mem::take(&mut self.yy);
        xx.truncate(len);
        yy.truncate(len);
        let zlimit = self.simplification.zlimit;
        let zz = self.simplification.zz.take().map(|mut zz| {
            zz.truncate(len);
            zz
        });

        self.init_xy_data(nn, xx, yy)?;
        let has_zz = zz.is_some();
        self.init_z_data(zz)?;
        if has_zz {
            self.simplification.zlimit = zlimit;
        }
        Ok(())
    }

    /// Replaces every vertex with the result of `f(x, y, arc_index)`. Vertices for which `f` returns `None` are left
    /// unchanged. Bounds are recalculated.
    pub fn transform_points(&mut self, mut f: impl FnMut(f64, f64, usize) -> Option<(f64, f64)>) {
        for arc in 0..self.size() {
            let start = self.ii[arc];
            for i in start..start + self.nn[arc] {
                if let Some((x, y)) = f(self.xx[i], self.yy[i], arc) {
                    self.xx[i] = x;
                    self.yy[i] = y;
                }
            }
        }
        self.init_bounds();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arcs::Thresholds;
    use assert_matches::assert_matches;
    use shpsys_types::Bounds;

    const INF: f64 = f64::INFINITY;

    fn arcs() -> ArcCollection {
        ArcCollection::from_arcs(vec![
            vec![[0.0, 0.0], [1.0, 0.0]],
            vec![[1.0, 0.0], [1.0, 0.0]],
            vec![[1.0, 0.0], [2.0, 2.0], [3.0, 0.0]],
        ])
    }

    fn not_degenerate(mut iter: ArcVertices<'_>, _: usize) -> bool {
        match iter.next() {
            Some(first) => iter.any(|p| p != first),
            None => false,
        }
    }

    #[test]
    fn filter_arcs() {
        let mut arcs = arcs();
        let map = arcs
            .filter(not_degenerate)
            .expect("valid buffers")
            .expect("one arc is removed");
        assert_eq!(map.to_signed_vec(), vec![0, -1, 1]);
        assert_eq!(map.removed_count(), 1);
        assert_eq!(arcs.size(), 2);
        assert_eq!(arcs.get_vertex_data().nn, &[2, 3]);
        assert_eq!(arcs.get_vertex_data().ii, &[0, 2]);
        assert_eq!(
            arcs.to_array(),
            vec![
                vec![[0.0, 0.0], [1.0, 0.0]],
                vec![[1.0, 0.0], [2.0, 2.0], [3.0, 0.0]]
            ]
        );
        assert_eq!(arcs.get_bounds(), Bounds::new(0.0, 0.0, 3.0, 2.0));

        // Filtering again keeps everything.
        assert_eq!(arcs.filter(not_degenerate), Ok(None));
    }

    #[test]
    fn filter_everything() {
        let mut arcs = arcs();
        let map = arcs.filter(|_, _| false).expect("valid buffers");
        assert_eq!(map.map(|m| m.to_signed_vec()), Some(vec![-1, -1, -1]));
        assert_eq!(arcs.size(), 0);
        assert_eq!(arcs.get_point_count(), 0);
        assert!(!arcs.get_bounds().has_bounds());
    }

    #[test]
    fn filter_keeps_thresholds() {
        let mut arcs = arcs();
        arcs.set_thresholds(Some(Thresholds::Flat(vec![
            INF, INF, INF, INF, INF, 5.0, INF,
        ])))
        .expect("valid thresholds");
        arcs.set_retained_interval(1.0);
        arcs.filter(|_, i| i != 0).expect("valid buffers");
        assert_eq!(
            arcs.simplification().thresholds(),
            Some(&[INF, INF, INF, 5.0, INF][..])
        );
        assert_eq!(arcs.get_retained_interval(), 1.0);
    }

    #[test]
    fn index_map() {
        let map = ArcIndexMap {
            map: vec![Some(0), None, Some(1)],
        };
        assert_eq!(map.get(2), Some(1));
        assert_eq!(map.get(1), None);
        assert_eq!(map.get(7), None);
        assert_eq!(map.remap_arc_id(ArcId::reversed(2)), Some(ArcId::reversed(1)));
        assert_eq!(map.remap_arc_id(ArcId::new(1)), None);
        assert_eq!(
            map.remap_path(&[ArcId::new(0), ArcId::reversed(1), ArcId::reversed(2)]),
            vec![ArcId::new(0), ArcId::reversed(1)]
        );
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn copy_direction() {
        let mut buf = [0.0, 1.0, 2.0, 3.0];
        copy_elements(&mut buf, 2, 0, 2).expect("backward copy");
        assert_eq!(buf, [2.0, 3.0, 2.0, 3.0]);
        assert_matches!(
            copy_elements(&mut buf, 0, 1, 2),
            Err(ShpsysError::BufferCopy { src: 0, dest: 1 })
        );
    }

    #[test]
    fn dedup_arc() {
        let mut xx = [0.0, 0.0, 1.0, f64::NAN, 1.0, 2.0];
        let mut yy = [0.0, 0.0, 1.0, 5.0, 1.0, 2.0];
        let mut zz = [INF, 3.0, 1.0, 2.0, 4.0, INF];
        let n = dedup_arc_coords(0, 0, 6, &mut xx, &mut yy, Some(&mut zz));
        assert_eq!(n, 3);
        assert_eq!(&xx[..3], &[0.0, 1.0, 2.0]);
        assert_eq!(&zz[..3], &[INF, 4.0, INF]);

        let mut xx = [1.0, 1.0];
        let mut yy = [1.0, 1.0];
        assert_eq!(dedup_arc_coords(0, 0, 2, &mut xx, &mut yy, None), 0);
    }

    #[test]
    fn dedup_is_idempotent() {
        let mut arcs = ArcCollection::from_arcs(vec![
            vec![[0.0, 0.0], [0.0, 0.0], [1.0, 1.0]],
            vec![[1.0, 1.0], [1.0, 1.0]],
            vec![[1.0, 1.0], [2.0, 2.0], [2.0, 2.0], [3.0, 3.0]],
        ]);
        assert_eq!(arcs.dedup_coords(), Ok(4));
        assert_eq!(arcs.get_vertex_data().nn, &[2, 0, 3]);
        assert_eq!(arcs.get_point_count(), 5);
        assert_eq!(
            arcs.to_array(),
            vec![
                vec![[0.0, 0.0], [1.0, 1.0]],
                vec![],
                vec![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]]
            ]
        );
        assert_eq!(arcs.dedup_coords(), Ok(0));
    }

    #[test]
    fn transform() {
        let mut arcs = arcs();
        arcs.transform_points(|x, y, arc| (arc == 2).then_some((x * 2.0, y + 1.0)));
        assert_eq!(
            arcs.get_vertex(ArcId::new(2), -1),
            Ok(nalgebra::Point2::new(6.0, 1.0))
        );
        assert_eq!(arcs.get_vertex(ArcId::new(0), 0), Ok(nalgebra::Point2::new(0.0, 0.0)));
        assert_eq!(arcs.get_bounds(), Bounds::new(0.0, 0.0, 6.0, 3.0));
    }
}
