//! Selection and sorting helpers working on flat coordinate and threshold buffers.

use crate::error::ShpsysError;

/// Partitions shorter than this are sorted by insertion.
const INSERTION_SORT_LIMIT: usize = 25;

/// 1-based rank `value` would have among `arr` in ascending order. `NaN` ranks last.
pub fn find_rank_by_value(arr: &[f64], value: f64) -> usize {
    if value.is_nan() {
        return arr.len();
    }

    1 + arr.iter().filter(|&&v| value > v).count()
}

/// Returns the value of the given 1-based rank using Hoare's selection algorithm.
///
/// The slice is partially reordered as a side effect.
pub fn find_value_by_rank(arr: &mut [f64], rank: usize) -> Result<f64, ShpsysError> {
    let len = arr.len();
    if len == 0 || rank < 1 || rank > len {
        return Err(ShpsysError::InvalidRank { rank, len });
    }

    let k = (rank - 1) as isize;
    let mut l = 0isize;
    let mut m = len as isize - 1;
    while l < m {
        let val = arr[k as usize];
        let mut i = l;
        let mut j = m;
        loop {
            while arr[i as usize] < val {
                i += 1;
            }
            while val < arr[j as usize] {
                j -= 1;
            }
            if i <= j {
                arr.swap(i as usize, j as usize);
                i += 1;
                j -= 1;
            }
            if i > j {
                break;
            }
        }
        if j < k {
            l = i;
        }
        if k < i {
            m = j;
        }
    }

    Ok(arr[k as usize])
}

/// Indices of `a` sorted by ascending value.
pub fn sort_coordinate_ids(a: &[f64]) -> Vec<usize> {
    let mut ids: Vec<usize> = (0..a.len()).collect();
    quicksort_ids(a, &mut ids);
    ids
}

/// Sorts `ids` by the values of `a` they point to. Switches to insertion sort for short partitions.
pub fn quicksort_ids(a: &[f64], ids: &mut [usize]) {
    let n = ids.len();
    if n <= INSERTION_SORT_LIMIT {
        insertion_sort_ids(a, ids);
        return;
    }

    let pivot = a[ids[(n - 1) >> 1]];
    let mut i = 0isize;
    let mut j = n as isize - 1;
    while i <= j {
        while a[ids[i as usize]] < pivot {
            i += 1;
        }
        while a[ids[j as usize]] > pivot {
            j -= 1;
        }
        if i <= j {
            ids.swap(i as usize, j as usize);
            i += 1;
            j -= 1;
        }
    }

    if j > 0 {
        quicksort_ids(a, &mut ids[..=j as usize]);
    }
    if (i as usize) < n - 1 {
        quicksort_ids(a, &mut ids[i as usize..]);
    }
}

/// Sorts `ids` by the values of `a` they point to. Stable.
pub fn insertion_sort_ids(a: &[f64], ids: &mut [usize]) {
    for j in 1..ids.len() {
        let id = ids[j];
        let mut i = j;
        while i > 0 && a[id] < a[ids[i - 1]] {
            ids[i] = ids[i - 1];
            i -= 1;
        }
        ids[i] = id;
    }
}

/// Overrides a simplification threshold at the ends of the percentage range: nothing is retained at 0 and
/// everything is retained at 1.
pub fn clamp_interval_by_pct(z: f64, pct: f64) -> f64 {
    if pct <= 0.0 {
        f64::INFINITY
    } else if pct >= 1.0 {
        0.0
    } else {
        z
    }
}
