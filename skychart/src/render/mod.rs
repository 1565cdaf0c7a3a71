//! Chart rendering.
//!
//! [`ChartRenderer`] walks a fixed sequence over a [`ChartSurface`]: begin the
//! chart, draw constellation edges, draw star markers on top, pick the
//! background, encode. The projection from sky to chart coordinates happens
//! here; the surface only turns chart coordinates into pixels.

pub mod projection;
pub mod skia;
pub mod surface;

use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constellation::DrawableEdge;
use crate::horizon::VisibleStarSet;
use crate::marker::{scaled_marker_size, MAX_MARKER_SIZE};
use projection::{PolarProjection, SkyPoint};
pub use skia::SkiaSurface;
pub use surface::{Background, ChartSurface};

/// Largest canvas side accepted, in pixels.
pub const MAX_CANVAS_PX: u32 = 16_384;

/// Points per inch; marker sizes and line widths are given in points.
const POINTS_PER_INCH: f32 = 72.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid colour '{0}', expected #RRGGBB")]
    InvalidColor(String),

    #[error("invalid canvas: {0}")]
    InvalidCanvas(String),

    #[error("{operation} called out of order")]
    OutOfOrder { operation: &'static str },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// An opaque sRGB colour, written `#RRGGBB` in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Night-sky navy behind opaque charts.
pub const NIGHT_SKY: Rgb = Rgb {
    r: 0x04,
    g: 0x1A,
    b: 0x40,
};

impl FromStr for Rgb {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RenderError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel =
            |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl TryFrom<String> for Rgb {
    type Error = RenderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Chart appearance settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Side of the square figure in inches
    pub figure_size_in: f32,
    /// Output resolution
    pub dpi: u32,
    /// Fill behind opaque charts
    pub background: Rgb,
    /// Constellation line width in points
    pub edge_width_pt: f32,
    /// Constellation line opacity
    pub edge_alpha: f32,
    /// Marker area in points² of a magnitude 0 star
    pub max_marker_size: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            figure_size_in: 10.0,
            dpi: 400,
            background: NIGHT_SKY,
            edge_width_pt: 0.4,
            edge_alpha: 0.5,
            max_marker_size: MAX_MARKER_SIZE,
        }
    }
}

/// Pixel geometry of one chart, derived from a [`RenderConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub canvas_px: u32,
    pub dpi: f32,
    pub edge_width_pt: f32,
    pub edge_alpha: f32,
    pub projection: PolarProjection,
}

impl ChartLayout {
    pub fn from_config(config: &RenderConfig) -> Result<Self, RenderError> {
        let side = f64::from(config.figure_size_in) * f64::from(config.dpi);
        if !side.is_finite() || side < 1.0 || side > f64::from(MAX_CANVAS_PX) {
            return Err(RenderError::InvalidCanvas(format!(
                "{} in at {} dpi gives a {:.0} px canvas (allowed 1..={})",
                config.figure_size_in, config.dpi, side, MAX_CANVAS_PX
            )));
        }
        let canvas_px = side.round() as u32;

        Ok(Self {
            canvas_px,
            dpi: config.dpi as f32,
            edge_width_pt: config.edge_width_pt,
            edge_alpha: config.edge_alpha.clamp(0.0, 1.0),
            projection: PolarProjection::new(canvas_px),
        })
    }

    pub fn points_to_px(&self, points: f32) -> f32 {
        points * self.dpi / POINTS_PER_INCH
    }

    /// Pixel radius of a marker whose size is an area in points².
    pub fn marker_radius_px(&self, size: f64) -> f32 {
        self.points_to_px((size.max(0.0).sqrt() / 2.0) as f32)
    }
}

/// Draws visible stars and constellation edges as a polar chart.
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    config: RenderConfig,
}

impl ChartRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Run the chart sequence against any surface and return its encoding.
    pub fn draw<S: ChartSurface + ?Sized>(
        &self,
        surface: &mut S,
        stars: &VisibleStarSet,
        edges: &[DrawableEdge],
        transparent: bool,
    ) -> Result<Vec<u8>, RenderError> {
        let layout = ChartLayout::from_config(&self.config)?;
        surface.begin_chart(&layout)?;

        for edge in edges {
            surface.draw_edge(edge.from.to_polar(), edge.to.to_polar())?;
        }
        for star in stars.iter() {
            let size = scaled_marker_size(star.magnitude, self.config.max_marker_size);
            surface.draw_marker(SkyPoint::from(&star.position).to_polar(), size)?;
        }

        surface.set_background(if transparent {
            Background::Transparent
        } else {
            Background::Solid(self.config.background)
        })?;
        surface.encode()
    }

    /// Render to PNG bytes with the tiny-skia backend.
    pub fn render(
        &self,
        stars: &VisibleStarSet,
        edges: &[DrawableEdge],
        transparent: bool,
    ) -> Result<Vec<u8>, RenderError> {
        let png = self.draw(&mut SkiaSurface::new(), stars, edges, transparent)?;
        info!(
            "Rendered chart with {} stars and {} constellation segments ({} bytes)",
            stars.len(),
            edges.len(),
            png.len()
        );
        Ok(png)
    }
}
