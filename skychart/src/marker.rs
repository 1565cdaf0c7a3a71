//! Star marker sizing.

/// Marker size of a magnitude 0 star.
pub const MAX_MARKER_SIZE: f64 = 40.0;

/// Marker size for a magnitude, using [`MAX_MARKER_SIZE`].
pub fn marker_size(magnitude: f64) -> f64 {
    scaled_marker_size(magnitude, MAX_MARKER_SIZE)
}

/// Marker size in points² for a star of the given magnitude.
///
/// `max_size * sqrt(10^(m / -2.5)) * (1 - 0.15 m)`, floored at zero: the
/// linear correction goes negative past magnitude 6⅔.
pub fn scaled_marker_size(magnitude: f64, max_size: f64) -> f64 {
    let raw = 10f64.powf(magnitude / -2.5).sqrt();
    let correction = 1.0 - 0.15 * magnitude;
    (max_size * raw * correction).max(0.0)
}
