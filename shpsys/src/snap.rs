//! Merging of nearly coincident vertices.

use crate::arcs::ArcCollection;
use crate::diagnostics::{counted, Diagnostics};
use crate::error::ShpsysError;
use crate::rank::sort_coordinate_ids;

/// Snap distance used when no explicit threshold is given, as a fraction of the average segment length.
const AUTO_SNAP_FACTOR: f64 = 0.0025;

/// Average length of all visible segments, or 0 if there are none.
pub fn avg_segment_len(arcs: &ArcCollection) -> f64 {
    let mut sum = 0.0;
    let count = arcs.for_each_segment(|i, j, xx, yy| {
        let dx = xx[i] - xx[j];
        let dy = yy[i] - yy[j];
        sum += (dx * dx + dy * dy).sqrt();
    });

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Snaps together vertices that are closer than `threshold` and removes the resulting duplicates.
///
/// Without a threshold (or with a non-positive one) the snap distance is derived from the average segment length.
/// Returns the number of snapped vertices.
pub fn snap_coords(
    arcs: &mut ArcCollection,
    threshold: Option<f64>,
    diagnostics: &dyn Diagnostics,
) -> Result<usize, ShpsysError> {
    let avg_dist = avg_segment_len(arcs);
    let snap_dist = match threshold {
        Some(threshold) if threshold > 0.0 => {
            diagnostics.message(&format!(
                "Applying snapping threshold of {threshold} -- {:.6} times avg. segment length",
                threshold / avg_dist
            ));
            threshold
        }
        _ => avg_dist * AUTO_SNAP_FACTOR,
    };

    let snap_count = snap_coords_by_interval(arcs, snap_dist);
    if snap_count > 0 {
        arcs.dedup_coords()?;
    }
    diagnostics.message(&format!("Snapped {}", counted(snap_count, "point")));
    Ok(snap_count)
}

/// Moves every vertex lying within `snap_dist` of another vertex onto it. Returns the number of moved vertices.
///
/// Vertices are visited in order of increasing x. Each vertex pulls the following vertices within the distance onto
/// itself. This is a single pass: a chain of vertices that are each close to the next one is not guaranteed to
/// collapse into one point.
pub fn snap_coords_by_interval(arcs: &mut ArcCollection, snap_dist: f64) -> usize {
    let ids = sort_coordinate_ids(arcs.get_vertex_data().xx);
    let (xx, yy) = arcs.coords_mut();
    let limit_sq = snap_dist * snap_dist;
    let mut snap_count = 0;

    for i in 0..ids.len() {
        let x = xx[ids[i]];
        let y = yy[ids[i]];
        for &id in &ids[i + 1..] {
            let dx = xx[id] - x;
            if dx > snap_dist {
                break;
            }
            let dy = yy[id] - y;
            if (dx == 0.0 && dy == 0.0) || dx * dx + dy * dy > limit_sq {
                continue;
            }
            xx[id] = x;
            yy[id] = y;
            snap_count += 1;
        }
    }

    if snap_count > 0 {
        arcs.init_bounds();
    }
    snap_count
}
