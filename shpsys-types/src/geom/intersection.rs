use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::geom::{distance_sq, nearest_point};
use crate::orient::{determinant_2d, orient_2d};

/// Denominators closer to zero than this make the crossing point too imprecise to be used.
const MIN_DENOMINATOR: f64 = 1e-18;

/// Result of [`segment_intersection`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum SegmentIntersection {
    /// The segments cross at a single point.
    Point(Point2<f64>),
    /// The segments are collinear and share the part between the two points. Points are ordered by x, then by y.
    Overlap(Point2<f64>, Point2<f64>),
}

/// Returns true if segments `ab` and `cd` cross or touch.
///
/// Uses the signs of orientation determinants (Sedgewick). Not exact, but robust against the common failures of a
/// naive determinant test. Collinear segments hit only if their extents overlap.
pub fn segment_hit(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>, d: Point2<f64>) -> bool {
    let abc = orient_2d(a, b, c);
    let abd = orient_2d(a, b, d);
    let cda = orient_2d(c, d, a);
    let cdb = orient_2d(c, d, b);

    if abc == 0.0 && abd == 0.0 && cda == 0.0 && cdb == 0.0 {
        return ranges_overlap(a.x, b.x, c.x, d.x) && ranges_overlap(a.y, b.y, c.y, d.y);
    }

    abc * abd <= 0.0 && cda * cdb <= 0.0
}

/// Computes the intersection of segments `ab` and `cd`.
///
/// Returns `None` if the segments do not intersect, if they only touch at a shared endpoint, or if they are
/// collinear and meet at a single point.
pub fn segment_intersection(
    a: Point2<f64>,
    b: Point2<f64>,
    c: Point2<f64>,
    d: Point2<f64>,
) -> Option<SegmentIntersection> {
    if !segment_hit(a, b, c, d) {
        return None;
    }

    match cross_intersection(a, b, c, d) {
        Some(_) if endpoint_hit(a, b, c, d) => None,
        Some(p) => Some(SegmentIntersection::Point(p)),
        None => collinear_intersection(a, b, c, d),
    }
}

/// Crossing point of two non-parallel segments, re-solved relative to the endpoint nearest to the first estimate
/// and clamped into the coordinate ranges of both segments.
fn cross_intersection(
    a: Point2<f64>,
    b: Point2<f64>,
    c: Point2<f64>,
    d: Point2<f64>,
) -> Option<Point2<f64>> {
    let p = line_intersection(a, b, c, d)?;
    let p = match nearest_point(p, &[a, b, c, d]) {
        Some(1) => line_intersection(b, a, c, d),
        Some(2) => line_intersection(c, d, a, b),
        Some(3) => line_intersection(d, c, a, b),
        _ => Some(p),
    }?;

    Some(clamp_intersection_point(p, a, b, c, d))
}

/// Intersection of the lines through `ab` and `cd`, computed as an offset from `a`.
///
/// Returns `None` for parallel lines. For nearly parallel lines one of the segment endpoints lying within the
/// other segment's range is returned instead, if there is one.
pub fn line_intersection(
    a: Point2<f64>,
    b: Point2<f64>,
    c: Point2<f64>,
    d: Point2<f64>,
) -> Option<Point2<f64>> {
    let den = determinant_2d(b.x - a.x, b.y - a.y, d.x - c.x, d.y - c.y);
    if den == 0.0 {
        return None;
    }

    if (-MIN_DENOMINATOR..=MIN_DENOMINATOR).contains(&den) {
        return find_endpoint_in_range(a, b, c, d);
    }

    let m = orient_2d(c, d, a) / den;
    Some(Point2::new(a.x + m * (b.x - a.x), a.y + m * (b.y - a.y)))
}

/// Overlap of two collinear segments.
///
/// Collects the endpoints of each segment lying strictly inside the extent of the other one, along the axis with
/// the larger spread. One point is returned as is, two points make an overlap. Segments that only share endpoints
/// have no overlap.
pub fn collinear_intersection(
    a: Point2<f64>,
    b: Point2<f64>,
    c: Point2<f64>,
    d: Point2<f64>,
) -> Option<SegmentIntersection> {
    let points = [a, b, c, d];
    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    let use_y = max_y - min_y > max_x - min_x;

    let coord = |p: Point2<f64>| if use_y { p.y } else { p.x };
    let within = |p: Point2<f64>, s0: Point2<f64>, s1: Point2<f64>| {
        let (lo, hi) = min_max(coord(s0), coord(s1));
        inside(coord(p), lo, hi)
    };

    let hits: Vec<Point2<f64>> = [(a, c, d), (b, c, d), (c, a, b), (d, a, b)]
        .into_iter()
        .filter(|&(p, s0, s1)| within(p, s0, s1))
        .map(|(p, _, _)| p)
        .collect();

    match hits[..] {
        [] if endpoint_hit(a, b, c, d) => None,
        [p] => Some(SegmentIntersection::Point(p)),
        [p, q] if p == q => None,
        [p, q] => {
            if (q.x, q.y) < (p.x, p.y) {
                Some(SegmentIntersection::Overlap(q, p))
            } else {
                Some(SegmentIntersection::Overlap(p, q))
            }
        }
        _ => {
            log::debug!(
                "invalid collinear segment intersection: {} endpoints inside for {a:?} {b:?} {c:?} {d:?}",
                hits.len()
            );
            None
        }
    }
}

/// Returns true if the segments share an endpoint.
pub fn endpoint_hit(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>, d: Point2<f64>) -> bool {
    a == c || a == d || b == c || b == d
}

/// Snaps each coordinate of `p` that drifted outside the ranges of both segments to the nearest endpoint
/// coordinate, so the point lies exactly within both segments' extents.
fn clamp_intersection_point(
    p: Point2<f64>,
    a: Point2<f64>,
    b: Point2<f64>,
    c: Point2<f64>,
    d: Point2<f64>,
) -> Point2<f64> {
    let x = clamp_to_close_range(p.x, a.x, b.x);
    let x = clamp_to_close_range(x, c.x, d.x);
    let y = clamp_to_close_range(p.y, a.y, b.y);
    let y = clamp_to_close_range(y, c.y, d.y);
    Point2::new(x, y)
}

fn inside(x: f64, min_x: f64, max_x: f64) -> bool {
    x > min_x && x < max_x
}

fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn ranges_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> bool {
    let (a_min, a_max) = min_max(a0, a1);
    let (b_min, b_max) = min_max(b0, b1);
    a_min <= b_max && b_min <= a_max
}

/// First endpoint of either segment that lies within the coordinate range of the other one.
pub fn find_endpoint_in_range(
    a: Point2<f64>,
    b: Point2<f64>,
    c: Point2<f64>,
    d: Point2<f64>,
) -> Option<Point2<f64>> {
    let in_range = |p: Point2<f64>, s0: Point2<f64>, s1: Point2<f64>| {
        !outside_range(p.x, s0.x, s1.x) && !outside_range(p.y, s0.y, s1.y)
    };

    if in_range(a, c, d) {
        Some(a)
    } else if in_range(b, c, d) {
        Some(b)
    } else if in_range(c, a, b) {
        Some(c)
    } else if in_range(d, a, b) {
        Some(d)
    } else {
        None
    }
}

/// Returns `a` if it lies within the range between `b` and `c`, otherwise the nearer of `b` and `c`.
pub fn clamp_to_close_range(a: f64, b: f64, c: f64) -> f64 {
    if !outside_range(a, b, c) {
        return a;
    }

    if (a - b).abs() < (a - c).abs() {
        b
    } else {
        c
    }
}

/// Returns true if `a` is outside the closed range between `b` and `c` (in either order).
pub fn outside_range(a: f64, b: f64, c: f64) -> bool {
    if b < c {
        a < b || a > c
    } else if b > c {
        a > b || a < c
    } else {
        a != b
    }
}

impl SegmentIntersection {
    /// Squared length of the shared part. Zero for a point intersection.
    pub fn length_sq(&self) -> f64 {
        match self {
            SegmentIntersection::Point(_) => 0.0,
            SegmentIntersection::Overlap(p, q) => distance_sq(*p, *q),
        }
    }
}
