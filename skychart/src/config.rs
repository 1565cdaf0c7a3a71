//! Configuration for chart rendering.
//!
//! Stored as JSON. Every field has a default, so a partial file (or none at
//! all) is valid. [`ConfigStorage`] keeps the user's file in `~/.skychart/`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ephemeris::ObserverLocation;
use serde::{Deserialize, Serialize};
use starfield::data::{get_cache_dir, HIPPARCOS_URL};
use starfield::{CatalogSource, CatalogSources};

use crate::horizon::DEFAULT_LIMITING_MAGNITUDE;
pub use crate::render::RenderConfig;

/// Observer used when a place name cannot be resolved: Beijing.
pub const BEIJING: ObserverLocation = ObserverLocation {
    latitude: 39.9042,
    longitude: 116.4074,
};

/// Where the star catalog and constellation lines come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub star_sources: Vec<CatalogSource>,
    pub constellation_file: Option<PathBuf>,
    /// Load-time magnitude cut
    pub magnitude_ceiling: Option<f64>,
    /// `None` uses `~/.skychart/cache`
    pub cache_dir: Option<PathBuf>,
    pub download_timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            star_sources: vec![
                CatalogSource::file("hip_main.dat"),
                CatalogSource::url(HIPPARCOS_URL),
            ],
            constellation_file: Some(PathBuf::from("constellationship.fab")),
            magnitude_ceiling: Some(DEFAULT_LIMITING_MAGNITUDE),
            cache_dir: None,
            download_timeout_secs: 60,
        }
    }
}

impl CatalogConfig {
    pub fn to_sources(&self) -> CatalogSources {
        CatalogSources {
            star_sources: self.star_sources.clone(),
            constellation_file: self.constellation_file.clone(),
            magnitude_ceiling: self.magnitude_ceiling,
            cache_dir: self.cache_dir.clone().unwrap_or_else(get_cache_dir),
            download_timeout: Duration::from_secs(self.download_timeout_secs),
        }
    }
}

/// Nominatim place-name lookup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Search endpoint, queried with `q`, `format` and `limit`
    pub endpoint: String,
    /// Nominatim's usage policy requires an identifying user agent
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: concat!("skychart/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Complete sky chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyChartConfig {
    pub catalog: CatalogConfig,
    pub geocoder: GeocoderConfig,
    pub render: RenderConfig,
    /// Faintest magnitude drawn
    pub limiting_magnitude: f64,
    /// Observer used when geocoding fails
    pub fallback_location: ObserverLocation,
}

impl Default for SkyChartConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            geocoder: GeocoderConfig::default(),
            render: RenderConfig::default(),
            limiting_magnitude: DEFAULT_LIMITING_MAGNITUDE,
            fallback_location: BEIJING,
        }
    }
}

impl SkyChartConfig {
    /// Save to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Load from JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// The load-time ceiling when the limiting magnitude asks for fainter stars
    /// than the catalog keeps.
    pub fn ceiling_below_limit(&self) -> Option<f64> {
        self.catalog
            .magnitude_ceiling
            .filter(|&ceiling| self.limiting_magnitude > ceiling)
    }
}

/// Configuration storage rooted at `~/.skychart/`.
#[derive(Debug, Clone)]
pub struct ConfigStorage {
    root_path: PathBuf,
}

impl ConfigStorage {
    /// Create a new config storage with default path (~/.skychart)
    pub fn new() -> std::io::Result<Self> {
        let home = std::env::var("HOME")
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::NotFound, "HOME not set"))?;
        Ok(Self {
            root_path: PathBuf::from(home).join(".skychart"),
        })
    }

    pub fn with_path(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn config_path(&self) -> PathBuf {
        self.root_path.join("config.json")
    }

    /// Get the stored configuration.
    ///
    /// Returns None if no configuration file exists.
    /// Returns Some(Err) if the file exists but cannot be loaded.
    pub fn get_config(&self) -> Option<Result<SkyChartConfig, std::io::Error>> {
        let path = self.config_path();

        if !path.exists() {
            return None;
        }

        Some(SkyChartConfig::load_from_file(&path))
    }

    /// Save the configuration, creating the directory if needed.
    ///
    /// Returns the path where the configuration was saved.
    pub fn save_config(&self, config: &SkyChartConfig) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.root_path)?;

        let path = self.config_path();
        config.save_to_file(&path)?;
        Ok(path)
    }

    /// Delete the stored configuration.
    ///
    /// Returns Ok(true) if the file was deleted, Ok(false) if it didn't exist.
    pub fn delete_config(&self) -> std::io::Result<bool> {
        let path = self.config_path();

        if !path.exists() {
            return Ok(false);
        }

        std::fs::remove_file(path)?;
        Ok(true)
    }
}
