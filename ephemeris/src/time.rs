//! Observation timestamps.
//!
//! An [`ObservationInstant`] always carries a UTC offset. Naive timestamps are
//! rejected at parse time, so the ephemeris never has to guess a zone; callers
//! holding local wall-clock time attach the zone with
//! [`ObservationInstant::from_local`].

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

use crate::error::{EphemerisError, Result};

/// Julian date of the J2000.0 epoch (2000-01-01 12:00 TT)
pub const J2000_JD: f64 = 2451545.0;

/// Julian date of 1970-01-01 00:00 UTC
const UNIX_EPOCH_JD: f64 = 2440587.5;

const SECONDS_PER_DAY: f64 = 86400.0;
const DAYS_PER_CENTURY: f64 = 36525.0;

/// Accepted layouts carrying an offset, tried after RFC 3339.
const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S %:z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M%:z",
];

/// Layouts recognised only so a missing zone can be reported precisely.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A timezone-aware moment of observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationInstant(DateTime<FixedOffset>);

impl ObservationInstant {
    pub fn new<Tz: TimeZone>(when: DateTime<Tz>) -> Self {
        Self(when.fixed_offset())
    }

    /// Attach a UTC offset to a wall-clock time.
    pub fn from_local(naive: NaiveDateTime, offset: FixedOffset) -> Result<Self> {
        offset
            .from_local_datetime(&naive)
            .single()
            .map(Self)
            .ok_or_else(|| EphemerisError::NonexistentLocalTime(naive.to_string()))
    }

    /// Parse a timestamp that includes its UTC offset.
    ///
    /// Accepts RFC 3339 (`2024-03-20T21:30:00+08:00`) and
    /// `YYYY-MM-DD HH:MM[:SS]±HH:MM`. A well-formed timestamp without an
    /// offset fails with [`EphemerisError::MissingTimezone`].
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();

        if let Ok(when) = DateTime::parse_from_rfc3339(text) {
            return Ok(Self(when));
        }
        for format in AWARE_FORMATS {
            if let Ok(when) = DateTime::parse_from_str(text, format) {
                return Ok(Self(when));
            }
        }

        let naive = NAIVE_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(text, format).is_ok());
        if naive {
            Err(EphemerisError::MissingTimezone(text.to_string()))
        } else {
            Err(EphemerisError::UnparseableTimestamp(text.to_string()))
        }
    }

    /// The instant as given, with its original offset.
    pub fn local(&self) -> DateTime<FixedOffset> {
        self.0
    }

    /// The instant normalized to UTC.
    pub fn utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }

    /// Julian date (UTC, used as an approximation of UT1).
    pub fn julian_date(&self) -> f64 {
        let utc = self.utc();
        let seconds = utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9;
        UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
    }

    /// Julian centuries elapsed since J2000.0.
    pub fn centuries_since_j2000(&self) -> f64 {
        (self.julian_date() - J2000_JD) / DAYS_PER_CENTURY
    }

    /// Greenwich mean sidereal time in degrees, in `[0, 360)`.
    ///
    /// IAU 1982 expression as given by Meeus, eq. 12.4.
    pub fn gmst_deg(&self) -> f64 {
        let d = self.julian_date() - J2000_JD;
        let t = d / DAYS_PER_CENTURY;
        let gmst = 280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0;
        gmst.rem_euclid(360.0)
    }
}

impl FromStr for ObservationInstant {
    type Err = EphemerisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for ObservationInstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
