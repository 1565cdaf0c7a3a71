//! Celestial body definitions and calculations

pub mod precession;

use std::f64::consts::TAU;

use log::debug;
use starfield::StarRecord;

use crate::error::{EphemerisError, Result};
use crate::observer::ObserverLocation;
use crate::time::ObservationInstant;
use precession::{precession_matrix, ra_dec, unit_vector};

/// Distance assigned to stars without a usable parallax: 1 Gpc.
pub const UNKNOWN_DISTANCE_PC: f64 = 1.0e9;

/// Apparent position of one star in the observer's horizontal frame.
///
/// Computed per request and never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizonPosition {
    pub star_id: u32,
    /// Degrees above the horizon; negative below it
    pub altitude_deg: f64,
    /// Degrees clockwise from geographic north, in `[0, 360)`
    pub azimuth_deg: f64,
    /// Distance in parsecs
    pub distance_pc: f64,
}

/// Source of horizontal coordinates for a batch of catalog stars.
///
/// Implementations return exactly one position per input star, in input order.
pub trait EphemerisProvider {
    fn horizon_positions(
        &self,
        stars: &[StarRecord],
        observer: &ObserverLocation,
        when: &ObservationInstant,
    ) -> Result<Vec<HorizonPosition>>;
}

/// Star positions from mean sidereal time and precession.
///
/// Converts J2000 catalog coordinates to the mean equinox of date, then to
/// altitude/azimuth using Greenwich mean sidereal time and the observer's
/// longitude. Nutation, aberration and atmospheric refraction are ignored;
/// together they move a star by well under a degree, which is invisible on a
/// whole-sky chart.
#[derive(Debug, Clone)]
pub struct SiderealEphemeris {
    apply_precession: bool,
}

impl SiderealEphemeris {
    /// Create a new ephemeris calculator
    pub fn new() -> Self {
        Self {
            apply_precession: true,
        }
    }

    /// Treat catalog coordinates as already referred to the date's equinox.
    pub fn without_precession() -> Self {
        Self {
            apply_precession: false,
        }
    }
}

impl Default for SiderealEphemeris {
    fn default() -> Self {
        Self::new()
    }
}

/// Altitude and azimuth (radians, azimuth clockwise from north in `[0, 2π)`)
/// for a hour angle, declination and latitude, all in radians.
pub fn horizontal_from_hour_angle(hour_angle: f64, dec: f64, lat: f64) -> (f64, f64) {
    let sin_alt = lat.sin() * dec.sin() + lat.cos() * dec.cos() * hour_angle.cos();
    let alt = sin_alt.clamp(-1.0, 1.0).asin();

    let az = (-dec.cos() * hour_angle.sin())
        .atan2(dec.sin() * lat.cos() - dec.cos() * hour_angle.cos() * lat.sin())
        .rem_euclid(TAU);

    (alt, az)
}

fn distance_pc(star: &StarRecord) -> f64 {
    match star.parallax_mas {
        Some(parallax) if parallax > 0.0 => 1000.0 / parallax,
        _ => UNKNOWN_DISTANCE_PC,
    }
}

impl EphemerisProvider for SiderealEphemeris {
    fn horizon_positions(
        &self,
        stars: &[StarRecord],
        observer: &ObserverLocation,
        when: &ObservationInstant,
    ) -> Result<Vec<HorizonPosition>> {
        observer.validate()?;

        let lst = (when.gmst_deg() + observer.longitude).to_radians();
        let lat = observer.latitude_rad();
        let precession = self
            .apply_precession
            .then(|| precession_matrix(when.centuries_since_j2000()));

        debug!(
            "Computing {} horizon positions for {} at {} (LST {:.4}°)",
            stars.len(),
            observer,
            when,
            lst.to_degrees().rem_euclid(360.0)
        );

        stars
            .iter()
            .map(|star| {
                if !(star.ra_deg.is_finite() && star.dec_deg.is_finite()) {
                    return Err(EphemerisError::InvalidCoordinates { star_id: star.id });
                }

                let (ra, dec) = match &precession {
                    Some(matrix) => ra_dec(
                        &(matrix * unit_vector(star.ra_deg.to_radians(), star.dec_deg.to_radians())),
                    ),
                    None => (star.ra_deg.to_radians(), star.dec_deg.to_radians()),
                };

                let (alt, az) = horizontal_from_hour_angle(lst - ra, dec, lat);

                Ok(HorizonPosition {
                    star_id: star.id,
                    altitude_deg: alt.to_degrees(),
                    azimuth_deg: az.to_degrees(),
                    distance_pc: distance_pc(star),
                })
            })
            .collect()
    }
}
