//! Polar star charts for any place and time.
//!
//! The pipeline computes where catalog stars sit in the observer's sky, keeps
//! those above the horizon and bright enough to see, selects the
//! constellation segments whose endpoints both survived, and draws the result
//! on an altitude-azimuth polar chart with north up and east to the right.
//!
//! ```no_run
//! use ephemeris::ObservationInstant;
//! use skychart::{ChartRequest, SkyChartConfig, StarChartPipeline};
//!
//! let pipeline = StarChartPipeline::from_config(SkyChartConfig::default());
//! let chart = pipeline.render(&ChartRequest {
//!     location: "Beijing".to_string(),
//!     when: ObservationInstant::parse("2024-03-20T21:30:00+08:00")?,
//!     transparent: false,
//! })?;
//! std::fs::write("chart.png", &chart.png)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod constellation;
mod error;
pub mod geocode;
pub mod horizon;
pub mod marker;
pub mod pipeline;
pub mod render;
pub mod shared_args;

pub use config::{ConfigStorage, SkyChartConfig, BEIJING};
pub use constellation::{resolve_edges, DrawableEdge};
pub use error::{Result, SkyChartError};
pub use geocode::{Geocoder, NominatimGeocoder, StaticGeocoder, Unresolved};
pub use horizon::{compute_visible_stars, filter_visible, TransformError, VisibleStar, VisibleStarSet};
pub use marker::marker_size;
pub use pipeline::{ChartOutput, ChartRequest, RenderWarning, StarChartPipeline};
pub use render::{ChartRenderer, ChartSurface, RenderConfig, RenderError, SkiaSurface};
