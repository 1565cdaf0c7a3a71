use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("invalid observer location: latitude {latitude}, longitude {longitude}")]
    InvalidObserver { latitude: f64, longitude: f64 },

    #[error("star {star_id} has non-finite coordinates")]
    InvalidCoordinates { star_id: u32 },

    /// A timestamp without a UTC offset; one must be attached before use.
    #[error("timestamp '{0}' has no timezone information")]
    MissingTimezone(String),

    #[error("cannot parse timestamp '{0}'")]
    UnparseableTimestamp(String),

    #[error("local time {0} does not exist in the given offset")]
    NonexistentLocalTime(String),
}

pub type Result<T> = std::result::Result<T, EphemerisError>;
