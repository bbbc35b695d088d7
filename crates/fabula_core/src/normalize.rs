//! Metric normalization.

/// Clamp a raw metric into `[0, 1]` for display.
///
/// Missing values and NaN map to 0. This is a display tolerance, not validation.
///
/// # Examples
///
/// ```
/// use fabula_core::normalize;
///
/// assert_eq!(normalize(Some(0.3)), 0.3);
/// assert_eq!(normalize(Some(1.4)), 1.0);
/// assert_eq!(normalize(Some(-0.2)), 0.0);
/// assert_eq!(normalize(Some(f64::NAN)), 0.0);
/// assert_eq!(normalize(None), 0.0);
/// ```
pub fn normalize(x: Option<f64>) -> f64 {
    match x {
        Some(v) if !v.is_nan() => v.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_inside_unit_interval() {
        for v in [0.0, 0.001, 0.25, 0.5, 0.999, 1.0] {
            assert_eq!(normalize(Some(v)), v);
        }
    }

    #[test]
    fn test_clamps_outside_unit_interval() {
        assert_eq!(normalize(Some(-3.0)), 0.0);
        assert_eq!(normalize(Some(42.0)), 1.0);
        assert_eq!(normalize(Some(f64::INFINITY)), 1.0);
        assert_eq!(normalize(Some(f64::NEG_INFINITY)), 0.0);
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(normalize(Some(-0.0)), 0.0);
    }
}
