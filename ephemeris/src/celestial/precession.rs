//! IAU 1976 precession from J2000.0 to the equinox of date.

use nalgebra::{Rotation3, Vector3};

const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// Rotation taking J2000 equatorial unit vectors to the mean equator and
/// equinox of date, `t` Julian centuries after J2000.
///
/// Built from the Lieske (1977) angles ζ, z, θ (Meeus eq. 21.3). The
/// passive form `R3(-z) R2(θ) R3(-ζ)` is written here with active rotations.
pub fn precession_matrix(t: f64) -> Rotation3<f64> {
    let t2 = t * t;
    let t3 = t2 * t;
    let zeta = (2306.2181 * t + 0.30188 * t2 + 0.017998 * t3) * ARCSEC_TO_RAD;
    let z = (2306.2181 * t + 1.09468 * t2 + 0.018203 * t3) * ARCSEC_TO_RAD;
    let theta = (2004.3109 * t - 0.42665 * t2 - 0.041833 * t3) * ARCSEC_TO_RAD;

    Rotation3::from_axis_angle(&Vector3::z_axis(), z)
        * Rotation3::from_axis_angle(&Vector3::y_axis(), -theta)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), zeta)
}

/// Unit vector for right ascension / declination in radians.
pub fn unit_vector(ra: f64, dec: f64) -> Vector3<f64> {
    Vector3::new(dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin())
}

/// Right ascension in `[0, 2π)` and declination of a unit vector, radians.
pub fn ra_dec(v: &Vector3<f64>) -> (f64, f64) {
    let dec = v.z.clamp(-1.0, 1.0).asin();
    let ra = v.y.atan2(v.x).rem_euclid(std::f64::consts::TAU);
    (ra, dec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_at_epoch() {
        let v = unit_vector(1.0, 0.5);
        let p = precession_matrix(0.0) * v;
        assert_relative_eq!(p, v, epsilon = 1e-15);
    }

    #[test]
    fn test_meeus_theta_persei() {
        // Meeus example 21.b: θ Persei at J2000 with proper motion already
        // carried to 2028 Nov 13.19, precessed to 41.547214°, +49.348483°.
        let ra0 = 41.054063_f64.to_radians();
        let dec0 = 49.227750_f64.to_radians();
        let t = (2462088.69 - 2451545.0) / 36525.0;

        let (ra, dec) = ra_dec(&(precession_matrix(t) * unit_vector(ra0, dec0)));
        assert_relative_eq!(ra.to_degrees(), 41.547214, epsilon = 0.01);
        assert_relative_eq!(dec.to_degrees(), 49.348483, epsilon = 0.01);
    }
}
