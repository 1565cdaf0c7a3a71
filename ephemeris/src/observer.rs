//! Observer position on the Earth's surface.

use serde::{Deserialize, Serialize};

use crate::error::{EphemerisError, Result};

/// Geodetic observer position in degrees (north and east positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl ObserverLocation {
    /// Create a location, rejecting coordinates off the globe.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let location = Self {
            latitude,
            longitude,
        };
        location.validate()?;
        Ok(location)
    }

    /// Check the coordinates are finite and within ±90° / ±180°.
    pub fn validate(&self) -> Result<()> {
        let valid = self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude);
        if valid {
            Ok(())
        } else {
            Err(EphemerisError::InvalidObserver {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    pub fn latitude_rad(&self) -> f64 {
        self.latitude.to_radians()
    }

    pub fn longitude_rad(&self) -> f64 {
        self.longitude.to_radians()
    }
}

impl std::fmt::Display for ObserverLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4}°{} {:.4}°{}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(90.5, 0.0)]
    #[case(-91.0, 0.0)]
    #[case(0.0, 180.1)]
    #[case(f64::NAN, 0.0)]
    fn test_rejects_off_globe(#[case] lat: f64, #[case] lon: f64) {
        assert!(ObserverLocation::new(lat, lon).is_err());
    }

    #[test]
    fn test_display() {
        let beijing = ObserverLocation::new(39.9042, 116.4074).unwrap();
        assert_eq!(beijing.to_string(), "39.9042°N 116.4074°E");
        let lima = ObserverLocation::new(-12.0464, -77.0428).unwrap();
        assert_eq!(lima.to_string(), "12.0464°S 77.0428°W");
    }
}
