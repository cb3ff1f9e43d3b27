use std::f64::consts::PI;

use nalgebra::{Point2, Point3};

use crate::point::CartesianPoint2d;

/// Euclidean distance.
pub fn distance_2d(a: Point2<f64>, b: Point2<f64>) -> f64 {
    distance_sq(a, b).sqrt()
}

/// Squared euclidean distance.
pub fn distance_sq(a: Point2<f64>, b: Point2<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Euclidean distance in 3d.
pub fn distance_3d(a: Point3<f64>, b: Point3<f64>) -> f64 {
    distance_sq_3d(a, b).sqrt()
}

/// Squared euclidean distance in 3d.
pub fn distance_sq_3d(a: Point3<f64>, b: Point3<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    dx * dx + dy * dy + dz * dz
}

/// Index of the candidate nearest to `p`. The first one wins on ties; `None` if there are no candidates.
pub fn nearest_point(p: Point2<f64>, candidates: &[Point2<f64>]) -> Option<usize> {
    let mut min_idx = None;
    let mut min_dist = f64::INFINITY;
    for (i, c) in candidates.iter().enumerate() {
        let dist = distance_sq(p, *c);
        if dist < min_dist {
            min_dist = dist;
            min_idx = Some(i);
        }
    }
    min_idx
}

/// Angle `abc` in the range `[0, PI]`. Returns 0 if either ray has zero length.
pub fn inner_angle(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    let ab = distance_2d(a, b);
    let bc = distance_2d(b, c);
    if ab == 0.0 || bc == 0.0 {
        return 0.0;
    }

    let dotp = ((a.x - b.x) * (c.x - b.x) + (a.y - b.y) * (c.y - b.y)) / (ab * bc);
    if dotp >= 1.0 - 1e-14 {
        0.0
    } else if dotp <= -1.0 + 1e-14 {
        PI
    } else {
        dotp.acos()
    }
}

/// Same as [`inner_angle`], computed from two `atan2` calls. About twice as slow.
pub fn inner_angle2(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    let a1 = (a.y - b.y).atan2(a.x - b.x);
    let a2 = (c.y - b.y).atan2(c.x - b.x);
    let a3 = (a1 - a2).abs();
    if a3 > PI {
        2.0 * PI - a3
    } else {
        a3
    }
}

/// Angle `abc` in 3d, in the range `[0, PI]`. Returns 0 if either ray has zero length.
pub fn inner_angle_3d(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> f64 {
    let ab = distance_3d(a, b);
    let bc = distance_3d(b, c);
    if ab == 0.0 || bc == 0.0 {
        return 0.0;
    }

    let dotp = ((a.x - b.x) * (c.x - b.x) + (a.y - b.y) * (c.y - b.y) + (a.z - b.z) * (c.z - b.z))
        / (ab * bc);
    if dotp >= 1.0 {
        0.0
    } else if dotp <= -1.0 {
        PI
    } else {
        dotp.acos()
    }
}

/// Brings an angle into the range `[0, 2PI)`.
pub fn standard_angle(mut a: f64) -> f64 {
    let two_pi = PI * 2.0;
    if !a.is_finite() {
        return f64::NAN;
    }
    while a < 0.0 {
        a += two_pi;
    }
    while a >= two_pi {
        a -= two_pi;
    }
    a
}

/// Turn angle from ray `b -> a` to ray `b -> c`, in the range `[0, 2PI)`.
///
/// Returns `NaN` if `a == b` or `b == c`.
pub fn signed_angle(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    if a == b || b == c {
        return f64::NAN;
    }

    let abx = a.x - b.x;
    let aby = a.y - b.y;
    let cbx = c.x - b.x;
    let cby = c.y - b.y;
    let dotp = abx * cbx + aby * cby;
    let crossp = abx * cby - aby * cbx;
    standard_angle(crossp.atan2(dotp))
}

/// Area of the triangle.
pub fn triangle_area(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    (((a.y - c.y) * (b.x - c.x) + (b.y - c.y) * (c.x - a.x)) / 2.0).abs()
}

/// Squared determinant of the triangle (four times the squared area).
pub fn det_sq(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    let det = a.x * b.y - a.x * c.y + b.x * c.y - b.x * a.y + c.x * a.y - c.x * b.y;
    det * det
}

/// Area of the triangle in 3d.
///
/// Computed from the squared determinants of the three axis-plane projections, which equals half the length of
/// the cross product.
pub fn triangle_area_3d(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> f64 {
    let xy = det_sq(
        Point2::new(a.x, a.y),
        Point2::new(b.x, b.y),
        Point2::new(c.x, c.y),
    );
    let xz = det_sq(
        Point2::new(a.x, a.z),
        Point2::new(b.x, b.z),
        Point2::new(c.x, c.z),
    );
    let yz = det_sq(
        Point2::new(a.y, a.z),
        Point2::new(b.y, b.z),
        Point2::new(c.y, c.z),
    );
    0.5 * (xy + xz + yz).sqrt()
}

/// Cosine of the angle `abc`, clamped to `[-1, 1]`. Returns 0 if either ray has zero length.
pub fn cosine(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    let den = distance_2d(a, b) * distance_2d(b, c);
    if den > 0.0 {
        (((a.x - b.x) * (c.x - b.x) + (a.y - b.y) * (c.y - b.y)) / den).clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Cosine of the angle `abc` in 3d, clamped to `[-1, 1]`. Returns 0 if either ray has zero length.
pub fn cosine_3d(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> f64 {
    let den = distance_3d(a, b) * distance_3d(b, c);
    if den > 0.0 {
        (((a.x - b.x) * (c.x - b.x) + (a.y - b.y) * (c.y - b.y) + (a.z - b.z) * (c.z - b.z)) / den)
            .clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Squared distance from apex `B` to the nearest point of segment `AC`, given the squared lengths of `AB`, `BC` and
/// `AC`. Never negative.
pub fn apex_dist_sq(ab2: f64, bc2: f64, ac2: f64) -> f64 {
    let dist2 = if ac2 == 0.0 {
        ab2
    } else if ab2 >= bc2 + ac2 {
        bc2
    } else if bc2 >= ab2 + ac2 {
        ab2
    } else {
        let dval = ab2 + ac2 - bc2;
        ab2 - dval * dval / ac2 * 0.25
    };

    if dist2 < 0.0 {
        0.0
    } else {
        dist2
    }
}

/// Squared distance from `p` to the nearest point of segment `ab`.
pub fn point_seg_dist_sq(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    apex_dist_sq(distance_sq(a, p), distance_sq(p, b), distance_sq(a, b))
}

/// Squared distance from `p` to the nearest point of segment `ab` in 3d.
pub fn point_seg_dist_sq_3d(p: Point3<f64>, a: Point3<f64>, b: Point3<f64>) -> f64 {
    apex_dist_sq(
        distance_sq_3d(a, p),
        distance_sq_3d(p, b),
        distance_sq_3d(a, b),
    )
}

/// Signed planar area of a ring of points. Clockwise rings are positive.
///
/// Coordinates are taken relative to the first point to keep the products small.
pub fn planar_path_area2<P: CartesianPoint2d<Num = f64>>(points: &[P]) -> f64 {
    let Some(first) = points.first() else {
        return 0.0;
    };

    let dx = -first.x();
    let dy = -first.y();
    let mut sum = 0.0;
    let (mut bx, mut by) = (0.0, 0.0);
    for p in &points[1..] {
        let ax = p.x() + dx;
        let ay = p.y() + dy;
        sum += ax * by - bx * ay;
        bx = ax;
        by = ay;
    }
    sum / 2.0
}
