//! Data module for locating, downloading and caching catalog data
//!
//! Star sources are tried in order: typically a local `hip_main.dat` first
//! and the CDS copy of the Hipparcos catalog as the fallback.

mod downloader;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use downloader::{
    cached_path_for, decode_catalog_bytes, ensure_cache_dir, get_cache_dir, read_source,
    HIPPARCOS_URL,
};

/// Where star catalog data can be read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogSource {
    /// File on disk, optionally gzip compressed
    File { path: PathBuf },
    /// HTTP(S) download, cached on disk after the first fetch
    Url { url: String },
}

impl CatalogSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        CatalogSource::File { path: path.into() }
    }

    pub fn url(url: impl Into<String>) -> Self {
        CatalogSource::Url { url: url.into() }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::File { path } => write!(f, "{}", path.display()),
            CatalogSource::Url { url } => write!(f, "{url}"),
        }
    }
}

/// Everything the catalog store needs to know to load its data.
#[derive(Debug, Clone)]
pub struct CatalogSources {
    /// Star catalog sources, tried in order until one yields stars
    pub star_sources: Vec<CatalogSource>,
    /// Constellation line file; absent or unreadable means no stick figures
    pub constellation_file: Option<PathBuf>,
    /// Load-time magnitude cut; fainter stars never enter the catalog
    pub magnitude_ceiling: Option<f64>,
    /// Directory downloaded catalogs are cached in
    pub cache_dir: PathBuf,
    /// Upper bound on a single catalog download
    pub download_timeout: Duration,
}

impl Default for CatalogSources {
    fn default() -> Self {
        Self {
            star_sources: vec![
                CatalogSource::file("hip_main.dat"),
                CatalogSource::url(HIPPARCOS_URL),
            ],
            constellation_file: Some(PathBuf::from("constellationship.fab")),
            magnitude_ceiling: Some(6.5),
            cache_dir: get_cache_dir(),
            download_timeout: Duration::from_secs(60),
        }
    }
}
