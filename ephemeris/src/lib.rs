//! Ephemeris calculations for star charts.
//!
//! Given an observer on the ground and a timezone-aware instant, computes the
//! apparent altitude and azimuth of catalog stars. The [`EphemerisProvider`]
//! trait is the seam the chart pipeline consumes; [`SiderealEphemeris`] is the
//! built-in implementation.

pub mod celestial;
mod error;
pub mod observer;
pub mod time;

pub use celestial::{EphemerisProvider, HorizonPosition, SiderealEphemeris, UNKNOWN_DISTANCE_PC};
pub use error::{EphemerisError, Result};
pub use observer::ObserverLocation;
pub use time::ObservationInstant;
