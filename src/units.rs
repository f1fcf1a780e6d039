//! Physical length to print pixels.
//!
//! Every physical measurement (canvas, cell, margin, logo) goes through
//! [`cm_to_px`] so on-screen and exported geometry share one law.

/// Pixels per centimetre at 300 DPI (300 / 2.54, rounded as printed).
pub const PX_PER_CM: f64 = 118.11;

/// Print resolution all conversions assume.
pub const PRINT_DPI: u32 = 300;

#[inline]
pub fn cm_to_px(cm: f64) -> f64 {
    cm * PX_PER_CM
}

#[inline]
pub fn px_to_cm(px: f64) -> f64 {
    px / PX_PER_CM
}

/// Formats a centimetre value the way print labels show it (`8.0`, `3.35`).
pub fn format_cm(cm: f64) -> String {
    let two = format!("{cm:.2}");
    if two.ends_with('0') {
        format!("{cm:.1}")
    } else {
        two
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_representative_values() {
        for x in [1.0, 6.0, 14.0, 21.0, 118.11] {
            assert!((cm_to_px(x) / 118.11 - x).abs() < 1e-9);
            assert!((px_to_cm(cm_to_px(x)) - x).abs() < 1e-9);
        }
    }

    #[test]
    fn test_strip_canvas_in_pixels() {
        assert!((cm_to_px(8.0) - 944.88).abs() < 1e-9);
        assert!((cm_to_px(21.0) - 2480.31).abs() < 1e-9);
    }

    #[test]
    fn test_format_cm() {
        assert_eq!(format_cm(8.0), "8.0");
        assert_eq!(format_cm(3.35), "3.35");
        assert_eq!(format_cm(11.3), "11.3");
        assert_eq!(format_cm(7.78), "7.78");
    }
}
