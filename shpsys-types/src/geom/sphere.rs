use nalgebra::Point3;

use crate::geom::{standard_angle, D2R, R};
use crate::point::{GeoPoint, GeoPoint2d};

/// Converts a distance in degrees of arc on the Earth sphere into meters.
pub fn degrees_to_meters(deg: f64) -> f64 {
    deg * D2R * R
}

/// Initial bearing from `a` to `b`, in radians.
pub fn bearing(a: &impl GeoPoint<Num = f64>, b: &impl GeoPoint<Num = f64>) -> f64 {
    let (lam1, phi1) = (a.lon_rad(), a.lat_rad());
    let (lam2, phi2) = (b.lon_rad(), b.lat_rad());
    let y = (lam2 - lam1).sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * (lam2 - lam1).cos();
    y.atan2(x)
}

/// Turn angle at `b` between the great circle arcs `b -> a` and `b -> c`, in the range `[0, 2PI)`.
///
/// Returns `NaN` if `a == b` or `b == c`.
pub fn signed_angle_sph(
    a: &impl GeoPoint<Num = f64>,
    b: &impl GeoPoint<Num = f64>,
    c: &impl GeoPoint<Num = f64>,
) -> f64 {
    if same_point(a, b) || same_point(b, c) {
        return f64::NAN;
    }

    let b1 = bearing(b, a);
    let b2 = bearing(b, c);
    standard_angle(std::f64::consts::PI * 2.0 + b1 - b2)
}

fn same_point(a: &impl GeoPoint<Num = f64>, b: &impl GeoPoint<Num = f64>) -> bool {
    a.lon() == b.lon() && a.lat() == b.lat()
}

/// Central angle between two points given in radians, computed with the haversine formula.
pub fn spherical_distance(lam1: f64, phi1: f64, lam2: f64, phi2: f64) -> f64 {
    let dlam = lam2 - lam1;
    let dphi = phi2 - phi1;
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlam / 2.0).sin().powi(2);
    2.0 * a.sqrt().asin()
}

/// Distance in meters along the surface of the Earth sphere.
pub fn great_circle_distance(a: &(impl GeoPoint<Num = f64> + ?Sized), b: &(impl GeoPoint<Num = f64> + ?Sized)) -> f64 {
    spherical_distance(a.lon_rad(), a.lat_rad(), b.lon_rad(), b.lat_rad()) * R
}

/// Converts a geographic point into geocentric cartesian coordinates on the Earth sphere.
pub fn lng_lat_to_xyz(p: &impl GeoPoint<Num = f64>) -> Point3<f64> {
    let lam = p.lon_rad();
    let phi = p.lat_rad();
    Point3::new(
        phi.cos() * lam.cos() * R,
        phi.cos() * lam.sin() * R,
        phi.sin() * R,
    )
}

/// Inverse of [`lng_lat_to_xyz`].
pub fn xyz_to_lng_lat(p: Point3<f64>) -> GeoPoint2d {
    let lat = (p.z / R).clamp(-1.0, 1.0).asin().to_degrees();
    let lon = p.y.atan2(p.x).to_degrees();
    GeoPoint2d::lonlat(lon, lat)
}

/// Converts longitude and latitude buffers into geocentric `x`, `y`, `z` buffers.
///
/// Output buffers are cleared first. Longitudes are read from `xsrc`, latitudes from `ysrc`; extra elements of the
/// longer source are ignored.
pub fn conv_lng_lat_to_sph(
    xsrc: &[f64],
    ysrc: &[f64],
    xbuf: &mut Vec<f64>,
    ybuf: &mut Vec<f64>,
    zbuf: &mut Vec<f64>,
) {
    xbuf.clear();
    ybuf.clear();
    zbuf.clear();
    for (&lon, &lat) in xsrc.iter().zip(ysrc) {
        let p = lng_lat_to_xyz(&GeoPoint2d::lonlat(lon, lat));
        xbuf.push(p.x);
        ybuf.push(p.y);
        zbuf.push(p.z);
    }
}
