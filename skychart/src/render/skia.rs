//! [`ChartSurface`] backed by tiny-skia.
//!
//! Edges and markers are painted into a transparent layer clipped to the
//! horizon circle. `encode` composites that layer over the background and
//! writes a PNG.

use tiny_skia::{
    Color, FillRule, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

use super::projection::PolarPoint;
use super::surface::{Background, ChartSurface};
use super::{ChartLayout, RenderError};

struct Canvas {
    layout: ChartLayout,
    content: Pixmap,
    horizon: Mask,
    background: Option<Background>,
}

/// tiny-skia raster surface producing PNG bytes.
#[derive(Default)]
pub struct SkiaSurface {
    canvas: Option<Canvas>,
}

impl SkiaSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The canvas, if the chart has begun and is still accepting drawing.
    fn drawing(&mut self, operation: &'static str) -> Result<&mut Canvas, RenderError> {
        match self.canvas.as_mut() {
            Some(canvas) if canvas.background.is_none() => Ok(canvas),
            _ => Err(RenderError::OutOfOrder { operation }),
        }
    }
}

fn white(alpha: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8);
    paint.anti_alias = true;
    paint
}

impl ChartSurface for SkiaSurface {
    fn begin_chart(&mut self, layout: &ChartLayout) -> Result<(), RenderError> {
        if self.canvas.is_some() {
            return Err(RenderError::OutOfOrder {
                operation: "begin_chart",
            });
        }

        let side = layout.canvas_px;
        let unallocatable = || RenderError::InvalidCanvas(format!("cannot allocate {side}x{side} canvas"));
        let content = Pixmap::new(side, side).ok_or_else(unallocatable)?;
        let mut horizon = Mask::new(side, side).ok_or_else(unallocatable)?;

        let (cx, cy) = layout.projection.center();
        let circle = PathBuilder::from_circle(cx, cy, layout.projection.horizon_px())
            .ok_or_else(|| RenderError::InvalidCanvas("degenerate horizon circle".to_string()))?;
        horizon.fill_path(&circle, FillRule::Winding, true, Transform::identity());

        self.canvas = Some(Canvas {
            layout: *layout,
            content,
            horizon,
            background: None,
        });
        Ok(())
    }

    fn draw_edge(&mut self, from: PolarPoint, to: PolarPoint) -> Result<(), RenderError> {
        let canvas = self.drawing("draw_edge")?;
        let (x1, y1) = canvas.layout.projection.to_pixel(from);
        let (x2, y2) = canvas.layout.projection.to_pixel(to);

        let mut builder = PathBuilder::new();
        builder.move_to(x1, y1);
        builder.line_to(x2, y2);
        // Zero-length segments produce no path
        let Some(path) = builder.finish() else {
            return Ok(());
        };

        let stroke = Stroke {
            width: canvas.layout.points_to_px(canvas.layout.edge_width_pt),
            ..Stroke::default()
        };
        canvas.content.stroke_path(
            &path,
            &white(canvas.layout.edge_alpha),
            &stroke,
            Transform::identity(),
            Some(&canvas.horizon),
        );
        Ok(())
    }

    fn draw_marker(&mut self, at: PolarPoint, size: f64) -> Result<(), RenderError> {
        let canvas = self.drawing("draw_marker")?;
        let radius = canvas.layout.marker_radius_px(size);
        let (x, y) = canvas.layout.projection.to_pixel(at);

        if let Some(circle) = PathBuilder::from_circle(x, y, radius) {
            canvas.content.fill_path(
                &circle,
                &white(1.0),
                FillRule::Winding,
                Transform::identity(),
                Some(&canvas.horizon),
            );
        }
        Ok(())
    }

    fn set_background(&mut self, background: Background) -> Result<(), RenderError> {
        let canvas = self.drawing("set_background")?;
        canvas.background = Some(background);
        Ok(())
    }

    fn encode(&mut self) -> Result<Vec<u8>, RenderError> {
        let background = self
            .canvas
            .as_ref()
            .and_then(|canvas| canvas.background)
            .ok_or(RenderError::OutOfOrder {
                operation: "encode",
            })?;
        let Some(canvas) = self.canvas.take() else {
            return Err(RenderError::OutOfOrder {
                operation: "encode",
            });
        };

        let image = match background {
            Background::Transparent => canvas.content,
            Background::Solid(color) => {
                let side = canvas.layout.canvas_px;
                let mut image = Pixmap::new(side, side).ok_or_else(|| {
                    RenderError::InvalidCanvas(format!("cannot allocate {side}x{side} canvas"))
                })?;
                image.fill(Color::from_rgba8(color.r, color.g, color.b, 255));
                image.draw_pixmap(
                    0,
                    0,
                    canvas.content.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                );
                image
            }
        };

        image
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }
}
