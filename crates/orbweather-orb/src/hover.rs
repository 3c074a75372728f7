//! Pointer position to hover target.

/// Share of the half-diagonal at which the hover effect fades to zero.
pub const DEFAULT_FALLOFF: f32 = 0.8;

/// Proximity of the pointer to the viewport centre: 1 at the centre,
/// falling linearly to 0 at `falloff` of the half-diagonal and beyond.
///
/// Non-finite input or an empty viewport yields 0.
pub fn hover_target(x: f32, y: f32, width: f32, height: f32, falloff: f32) -> f32 {
    if !(x.is_finite() && y.is_finite()) || width <= 0.0 || height <= 0.0 || falloff <= 0.0 {
        return 0.0;
    }

    let dist = (x - width / 2.0).hypot(y - height / 2.0);
    let max_dist = width.hypot(height) / 2.0;

    let norm = 1.0 - (dist / (max_dist * falloff)).min(1.0);
    norm.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centre_is_full_hover() {
        assert_eq!(hover_target(400.0, 300.0, 800.0, 600.0, DEFAULT_FALLOFF), 1.0);
    }

    #[test]
    fn test_corner_is_zero() {
        assert_eq!(hover_target(0.0, 0.0, 800.0, 600.0, DEFAULT_FALLOFF), 0.0);
    }

    #[test]
    fn test_linear_falloff() {
        // half-diagonal of 800x600 is 500; 0.8 of it is 400
        let v = hover_target(600.0, 300.0, 800.0, 600.0, DEFAULT_FALLOFF);
        assert!((v - 0.5).abs() < 1e-6, "got {v}");
    }

    #[test]
    fn test_always_in_unit_range() {
        let points = [
            (-1.0e6, 5.0),
            (1.0e9, -1.0e9),
            (123.4, 56.7),
            (0.0, 600.0),
            (400.0, 299.99),
        ];
        for (w, h) in [(800.0, 600.0), (1.0, 1.0), (3840.0, 2160.0)] {
            for (x, y) in points {
                let v = hover_target(x, y, w, h, DEFAULT_FALLOFF);
                assert!((0.0..=1.0).contains(&v), "{v} for ({x}, {y}) in {w}x{h}");
            }
        }
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(hover_target(f32::NAN, 0.0, 800.0, 600.0, DEFAULT_FALLOFF), 0.0);
        assert_eq!(hover_target(1.0, 1.0, 0.0, 600.0, DEFAULT_FALLOFF), 0.0);
    }
}
