use crate::arc_id::ArcId;
use crate::arcs::ArcCollection;
use crate::error::ShpsysError;
use crate::rank::{clamp_interval_by_pct, find_rank_by_value, find_value_by_rank};

/// Simplification thresholds given to [`ArcCollection::set_thresholds`].
#[derive(Debug, Clone, PartialEq)]
pub enum Thresholds {
    /// One value per vertex, in buffer order.
    Flat(Vec<f64>),
    /// One list of values per arc.
    PerArc(Vec<Vec<f64>>),
}

/// Concatenates per-arc thresholds. Fails if the total length is not `n`.
pub fn flatten_thresholds(arr: &[Vec<f64>], n: usize) -> Result<Vec<f64>, ShpsysError> {
    let found = arr.iter().map(Vec::len).sum();
    if found != n {
        return Err(ShpsysError::MismatchedThresholds { expected: n, found });
    }

    Ok(arr.concat())
}

struct FilteredVertexData {
    nn: Vec<usize>,
    xx: Vec<f64>,
    yy: Vec<f64>,
    zz: Vec<f64>,
}

impl ArcCollection {
    /// Sets or clears the per-vertex removal thresholds.
    ///
    /// Thresholds must be aligned either with vertices or with arcs. Clearing the thresholds also resets the cutoff.
    pub fn set_thresholds(
        &mut self,
        thresholds: Option<Thresholds>,
    ) -> Result<&mut Self, ShpsysError> {
        let n = self.get_point_count();
        let zz = match thresholds {
            None => None,
            Some(Thresholds::Flat(zz)) if zz.len() == n => Some(zz),
            Some(Thresholds::PerArc(arr)) if arr.len() == self.size() => {
                Some(flatten_thresholds(&arr, n)?)
            }
            Some(_) => return Err(ShpsysError::InvalidThresholds),
        };

        self.init_z_data(zz)?;
        Ok(self)
    }

    /// Active simplification cutoff.
    pub fn get_retained_interval(&self) -> f64 {
        self.simplification.zlimit
    }

    /// Sets the simplification cutoff. 0 shows all vertices.
    pub fn set_retained_interval(&mut self, z: f64) -> &mut Self {
        self.simplification.zlimit = z;
        self
    }

    /// Fraction of removable vertices retained by the active cutoff.
    pub fn get_retained_pct(&self) -> Result<f64, ShpsysError> {
        self.get_pct_by_threshold(self.simplification.zlimit)
    }

    /// Sets the cutoff that retains the given fraction of removable vertices.
    ///
    /// At 1 or above every vertex is shown; at 0 or below only arc endpoints remain.
    pub fn set_retained_pct(&mut self, pct: f64) -> Result<&mut Self, ShpsysError> {
        self.simplification.zlimit = if pct >= 1.0 {
            0.0
        } else {
            clamp_interval_by_pct(self.get_threshold_by_pct(pct)?, pct)
        };
        Ok(self)
    }

    /// Fraction of removable vertices that have a threshold of at least `val`.
    pub fn get_pct_by_threshold(&self, val: f64) -> Result<f64, ShpsysError> {
        if !(val > 0.0) {
            return Ok(1.0);
        }

        let arr = self.get_removable_thresholds(1)?;
        if arr.is_empty() {
            return Ok(1.0);
        }
        let rank = find_rank_by_value(&arr, val);
        Ok(1.0 - (rank as f64 - 1.0) / arr.len() as f64)
    }

    /// Cutoff that retains the given fraction of removable vertices.
    ///
    /// The threshold of rank `floor((1 - pct) * (n + 2))` among the `n` removable values is used. Ranks below 1 map
    /// to 0 (keep everything) and ranks above `n` to `Infinity` (keep endpoints only).
    pub fn get_threshold_by_pct(&self, pct: f64) -> Result<f64, ShpsysError> {
        let mut tmp = self.get_removable_thresholds(1)?;
        let rank = if tmp.is_empty() {
            0.0
        } else {
            ((1.0 - pct) * (tmp.len() as f64 + 2.0)).floor()
        };

        if rank <= 0.0 {
            Ok(0.0)
        } else if rank > tmp.len() as f64 {
            Ok(f64::INFINITY)
        } else {
            find_value_by_rank(&mut tmp, rank as usize)
        }
    }

    /// Thresholds of every `nth` vertex (rounded up to an odd step) that are not `Infinity`.
    pub fn get_removable_thresholds(&self, nth: usize) -> Result<Vec<f64>, ShpsysError> {
        let zz = self
            .simplification
            .thresholds()
            .ok_or(ShpsysError::MissingThresholds)?;
        let skip = nth | 1;
        Ok(zz
            .iter()
            .step_by(skip)
            .copied()
            .filter(|&z| z != f64::INFINITY)
            .collect())
    }

    /// Thresholds of the vertices of arc `index`.
    pub fn get_arc_thresholds(&self, index: usize) -> Result<&[f64], ShpsysError> {
        let id = ArcId::try_new(index)?;
        if index >= self.size() {
            return Err(ShpsysError::ArcOutOfRange(id.to_signed()));
        }
        let zz = self
            .simplification
            .thresholds()
            .ok_or(ShpsysError::MissingThresholds)?;
        let start = self.ii[index];
        Ok(&zz[start..start + self.nn[index]])
    }

    /// Number of vertices visible with the active cutoff.
    pub fn get_filtered_point_count(&self) -> usize {
        match self.simplification.active() {
            Some((zz, zlimit)) => zz.iter().filter(|&&z| z >= zlimit).count(),
            None => self.get_point_count(),
        }
    }

    fn get_filtered_vertex_data(&self) -> Result<Option<FilteredVertexData>, ShpsysError> {
        let Some((zz, zlimit)) = self.simplification.active() else {
            return Ok(None);
        };

        let len2 = self.get_filtered_point_count();
        let mut data = FilteredVertexData {
            nn: Vec::with_capacity(self.size()),
            xx: Vec::with_capacity(len2),
            yy: Vec::with_capacity(len2),
            zz: Vec::with_capacity(len2),
        };
        for (arc, (&start, &n)) in self.ii.iter().zip(&self.nn).enumerate() {
            let mut n2 = 0;
            for i in start..start + n {
                if zz[i] >= zlimit {
                    data.xx.push(self.xx[i]);
                    data.yy.push(self.yy[i]);
                    data.zz.push(zz[i]);
                    n2 += 1;
                }
            }
            if n2 < 2 && n2 < n {
                return Err(ShpsysError::CollapsedArc(arc));
            }
            data.nn.push(n2);
        }

        Ok(Some(data))
    }

    /// Copy containing only the vertices visible with the active cutoff. The copy keeps the thresholds of retained
    /// vertices and has no active cutoff.
    pub fn get_filtered_copy(&self) -> Result<Self, ShpsysError> {
        let Some(data) = self.get_filtered_vertex_data()? else {
            return Ok(self.get_copy());
        };

        let mut copy = ArcCollection::new(data.nn, data.xx, data.yy)?;
        copy.set_thresholds(Some(Thresholds::Flat(data.zz)))?;
        Ok(copy)
    }

    /// Removes hidden vertices from the buffers. Thresholds are dropped.
    pub fn flatten(&mut self) -> Result<(), ShpsysError> {
        match self.get_filtered_vertex_data()? {
            Some(data) => self.update_vertex_data(data.nn, data.xx, data.yy, None),
            None => {
                self.simplification.zz = None;
                self.simplification.zlimit = 0.0;
                Ok(())
            }
        }
    }
}
