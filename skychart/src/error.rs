use starfield::CatalogError;
use thiserror::Error;

use crate::horizon::TransformError;
use crate::render::RenderError;

/// Failures that abort a chart request. No image is produced for any of them.
#[derive(Debug, Error)]
pub enum SkyChartError {
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(#[from] CatalogError),

    #[error("transform failed: {0}")]
    TransformFailed(#[from] TransformError),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SkyChartError>;
