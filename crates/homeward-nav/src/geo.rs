use homeward_proto::GeoPoint;

/// Spherical model, worst case ~0.55% off an ellipsoid (mean ~0.3%).
pub const EARTH_RADIUS_KM: f64 = 6378.0;

/// Point on the unit sphere: `phi` is the azimuthal angle (longitude), `theta`
/// the polar angle (colatitude), both in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalPoint {
    pub phi: f64,
    pub theta: f64,
}

pub fn to_spherical(p: &GeoPoint) -> SphericalPoint {
    SphericalPoint {
        phi: p.lon.to_radians(),
        theta: (90.0 - p.lat).to_radians(),
    }
}

/// Great-circle distance in km (haversine on colatitudes).
pub fn distance_km(target: &SphericalPoint, from: &GeoPoint) -> f64 {
    let f = to_spherical(from);
    let dtheta = target.theta - f.theta;
    let dphi = target.phi - f.phi;
    let a = (dtheta / 2.0).sin().powi(2)
        + f.theta.sin() * target.theta.sin() * (dphi / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Initial great-circle bearing from `from` towards `target`, degrees in [0, 360).
pub fn bearing_deg(target: &SphericalPoint, from: &GeoPoint) -> f64 {
    let f = to_spherical(from);
    let dphi = target.phi - f.phi;
    // sin/cos of latitude are cos/sin of colatitude
    let y = dphi.sin() * target.theta.sin();
    let x = f.theta.sin() * target.theta.cos() - f.theta.cos() * target.theta.sin() * dphi.cos();
    normalize_deg(y.atan2(x).to_degrees())
}

pub fn normalize_deg(d: f64) -> f64 {
    let n = d.rem_euclid(360.0);
    if n >= 360.0 { n - 360.0 } else { n }
}
