use super::projection::PolarPoint;
use super::{ChartLayout, RenderError, Rgb};

/// What sits behind the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    /// No fill anywhere; uncovered pixels have zero alpha
    Transparent,
    /// The whole canvas filled with one colour
    Solid(Rgb),
}

/// A 2D drawing backend for polar charts.
///
/// Calls arrive in a fixed order: `begin_chart`, any number of `draw_edge`,
/// any number of `draw_marker`, `set_background`, then `encode`. Points are
/// chart coordinates; mapping them to pixels is up to the surface, using the
/// projection in the layout it was started with.
pub trait ChartSurface {
    fn begin_chart(&mut self, layout: &ChartLayout) -> Result<(), RenderError>;

    /// A constellation segment between two chart points.
    fn draw_edge(&mut self, from: PolarPoint, to: PolarPoint) -> Result<(), RenderError>;

    /// A star marker; `size` is its area in points².
    fn draw_marker(&mut self, at: PolarPoint, size: f64) -> Result<(), RenderError>;

    fn set_background(&mut self, background: Background) -> Result<(), RenderError>;

    /// Finish the chart and return the encoded image.
    fn encode(&mut self) -> Result<Vec<u8>, RenderError>;
}
