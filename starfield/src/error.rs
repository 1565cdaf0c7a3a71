use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No configured star source could be read. Each attempt is listed.
    #[error("star catalog unavailable (tried: {})", .attempts.join("; "))]
    Unavailable { attempts: Vec<String> },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("failed to decompress catalog data: {0}")]
    Decompress(#[source] std::io::Error),

    /// The source was readable but held no parsable star record.
    #[error("no usable star records in {0}")]
    Empty(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
