//! 7-bit value conversions

use crate::status::DATA_MAX;

#[inline]
pub fn value_to_f32(value: u8) -> f32 {
    value.min(DATA_MAX) as f32 / 127.0
}

#[inline]
pub fn value_to_f64(value: u8) -> f64 {
    value.min(DATA_MAX) as f64 / 127.0
}

/// Normalized `0.0..=1.0` to a 7-bit value. Out-of-range input is clamped, NaN maps to 0.
///
/// Rounds to the nearest step rather than truncating, so `0.5` gives 64 and
/// every value survives a trip through [`value_to_f32`].
#[inline]
pub fn f32_to_value(normalized: f32) -> u8 {
    if normalized.is_nan() {
        return 0;
    }
    (normalized.clamp(0.0, 1.0) * 127.0).round() as u8
}

/// `f64` version of [`f32_to_value`], rounding the same way.
#[inline]
pub fn f64_to_value(normalized: f64) -> u8 {
    if normalized.is_nan() {
        return 0;
    }
    (normalized.clamp(0.0, 1.0) * 127.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_to_float() {
        assert_eq!(value_to_f32(0), 0.0);
        assert_eq!(value_to_f32(127), 1.0);
        assert_eq!(value_to_f64(127), 1.0);
        assert!((value_to_f64(64) - 0.503_937).abs() < 1e-5);
    }

    #[test]
    fn test_float_to_value_clips() {
        assert_eq!(f32_to_value(1.0), 127);
        assert_eq!(f32_to_value(3.5), 127);
        assert_eq!(f32_to_value(-0.2), 0);
        assert_eq!(f32_to_value(f32::NAN), 0);
        assert_eq!(f64_to_value(0.5), 64);
    }

    #[test]
    fn test_float_to_value_rounds_to_nearest() {
        assert_eq!(f32_to_value(0.5), 64);
        assert_eq!(f64_to_value(0.5), 64);
        assert_eq!(f32_to_value(0.4), 51);
        assert_eq!(f64_to_value(0.7 / 127.0), 1);
        assert_eq!(f64_to_value(0.3 / 127.0), 0);
    }

    #[test]
    fn test_roundtrip_all_values() {
        for value in 0..=127u8 {
            assert_eq!(f32_to_value(value_to_f32(value)), value);
            assert_eq!(f64_to_value(value_to_f64(value)), value);
        }
    }
}
