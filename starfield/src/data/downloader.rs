use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use flate2::read::GzDecoder;
use log::{info, warn};

use super::CatalogSource;
use crate::error::{CatalogError, Result};

/// CDS copy of the Hipparcos main catalog.
pub const HIPPARCOS_URL: &str = "https://cdsarc.cds.unistra.fr/ftp/cats/I/239/hip_main.dat";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Default cache directory, `~/.skychart/cache`, or a temp directory when
/// `HOME` is unset.
pub fn get_cache_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".skychart").join("cache"),
        Err(_) => std::env::temp_dir().join("skychart_cache"),
    }
}

pub fn ensure_cache_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

/// Cache location for a downloaded URL: the last path segment inside `cache_dir`.
pub fn cached_path_for(url: &str, cache_dir: &Path) -> PathBuf {
    let name = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("catalog.dat");
    cache_dir.join(name)
}

/// Turn raw catalog bytes into text, gunzipping when the gzip magic is present.
pub fn decode_catalog_bytes(bytes: Vec<u8>) -> Result<String> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut text = String::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_string(&mut text)
            .map_err(CatalogError::Decompress)?;
        return Ok(text);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn fetch_url(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    let network_error = |reason: String| CatalogError::Network {
        url: url.to_string(),
        reason,
    };

    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into();

    let response = agent
        .get(url)
        .call()
        .map_err(|e| network_error(e.to_string()))?;

    let mut bytes = Vec::new();
    response
        .into_body()
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| network_error(e.to_string()))?;
    Ok(bytes)
}

/// Read a catalog source and return its decoded text.
///
/// URL sources are served from `cache_dir` when a cached copy exists;
/// otherwise they are downloaded and the download is cached. A cache write
/// failure only costs a re-download next time, so it is logged and ignored.
pub fn read_source(source: &CatalogSource, cache_dir: &Path, timeout: Duration) -> Result<String> {
    let bytes = match source {
        CatalogSource::File { path } => read_file(path)?,
        CatalogSource::Url { url } => {
            let cached = cached_path_for(url, cache_dir);
            if cached.exists() {
                info!("Using cached catalog {}", cached.display());
                read_file(&cached)?
            } else {
                info!("Downloading catalog from {url}");
                let bytes = fetch_url(url, timeout)?;
                if let Err(e) = ensure_cache_dir(cache_dir).and_then(|_| std::fs::write(&cached, &bytes)) {
                    warn!("Could not cache catalog at {}: {}", cached.display(), e);
                }
                bytes
            }
        }
    };
    decode_catalog_bytes(bytes)
}
