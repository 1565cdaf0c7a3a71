//! Polar altitude-azimuth projection.
//!
//! Angle is the azimuth, zero at north and increasing clockwise like a compass
//! bearing. Radius is the zenith distance `90 - altitude`, so the zenith is
//! the chart centre and the horizon its rim.

use ephemeris::HorizonPosition;

/// Zenith distance of the horizon, the outer radius of the chart.
pub const HORIZON_RADIUS: f64 = 90.0;

/// A direction on the sky in the observer's horizontal frame, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyPoint {
    pub azimuth_deg: f64,
    pub altitude_deg: f64,
}

impl SkyPoint {
    pub fn new(azimuth_deg: f64, altitude_deg: f64) -> Self {
        Self {
            azimuth_deg,
            altitude_deg,
        }
    }

    pub fn to_polar(self) -> PolarPoint {
        PolarPoint {
            theta: self.azimuth_deg.to_radians(),
            radius: HORIZON_RADIUS - self.altitude_deg,
        }
    }
}

impl From<&HorizonPosition> for SkyPoint {
    fn from(position: &HorizonPosition) -> Self {
        Self::new(position.azimuth_deg, position.altitude_deg)
    }
}

/// Chart coordinates: `theta` in radians clockwise from north, `radius` in
/// degrees of zenith distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarPoint {
    pub theta: f64,
    pub radius: f64,
}

/// Maps polar chart coordinates onto a square pixel canvas.
///
/// The horizon circle is inscribed in the canvas; pixel `y` grows downwards,
/// so north is at the top and east to the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarProjection {
    center: f64,
    pixels_per_degree: f64,
}

impl PolarProjection {
    pub fn new(canvas_px: u32) -> Self {
        let center = f64::from(canvas_px) / 2.0;
        Self {
            center,
            pixels_per_degree: center / HORIZON_RADIUS,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.center as f32, self.center as f32)
    }

    /// Pixel radius of the horizon circle.
    pub fn horizon_px(&self) -> f32 {
        (HORIZON_RADIUS * self.pixels_per_degree) as f32
    }

    pub fn to_pixel(&self, point: PolarPoint) -> (f32, f32) {
        let r = point.radius * self.pixels_per_degree;
        let x = self.center + r * point.theta.sin();
        let y = self.center - r * point.theta.cos();
        (x as f32, y as f32)
    }
}
