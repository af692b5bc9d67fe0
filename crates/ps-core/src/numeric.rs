//! Numeric guards shared by every stage.
//!
//! All epsilon-guarded arithmetic goes through this module so the guard value
//! lives in one place and can be tested in isolation.

use crate::error::{Result, ScreeningError, Stage};

/// Additive guard applied to every denominator and to the log-shimmer argument.
pub const EPSILON: f64 = 1e-6;

/// Total spectral magnitude at or under which a frame counts as silent.
///
/// Spectral normalisation (centroid, bandwidth, rolloff) compares against this
/// threshold instead of calling [`safe_divide`]: a weighted mean over a silent
/// frame has no meaningful value, so its descriptors are reported as zero
/// rather than as a quotient skewed by [`EPSILON`].
pub const SILENCE_FLOOR: f64 = 1e-10;

/// `true` if `total_magnitude` is at or under [`SILENCE_FLOOR`].
///
/// # Example
/// ```
/// use ps_core::numeric::is_silent;
/// assert!(is_silent(0.0));
/// assert!(!is_silent(1e-3));
/// ```
#[inline]
#[must_use]
pub fn is_silent(total_magnitude: f64) -> bool {
    total_magnitude <= SILENCE_FLOOR
}

/// `numerator / (denominator + EPSILON)`.
///
/// The epsilon is added unconditionally, matching the relationships the
/// downstream classifier was trained against. A denominator of exactly
/// `-EPSILON` or any non-finite operand yields `0.0` instead of a non-finite
/// value.
///
/// # Example
/// ```
/// use ps_core::numeric::safe_divide;
/// assert_eq!(safe_divide(0.0, 0.0), 0.0);
/// assert!((safe_divide(1.0, 1.0) - 1.0).abs() < 1e-5);
/// ```
#[inline]
#[must_use]
pub fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    let q = numerator / (denominator + EPSILON);
    if q.is_finite() { q } else { 0.0 }
}

/// Base-10 logarithm of `value + EPSILON`, with the argument floored at
/// `EPSILON`.
///
/// Non-negative inputs never hit the floor. A negative input (which the
/// energy-based shimmer proxy cannot produce) is floored rather than
/// propagated as NaN; a non-finite input is rejected.
///
/// # Errors
/// Returns [`ScreeningError::NumericDegeneracy`] if `value` is NaN or infinite.
///
/// # Example
/// ```
/// use ps_core::error::Stage;
/// use ps_core::numeric::guarded_log10;
/// let v = guarded_log10(0.0, "shimmer", Stage::Assemble).unwrap();
/// assert!((v + 6.0).abs() < 1e-9);
/// ```
pub fn guarded_log10(value: f64, field: &str, stage: Stage) -> Result<f64> {
    if !value.is_finite() {
        return Err(ScreeningError::degenerate(field, stage));
    }
    let arg = (value + EPSILON).max(EPSILON);
    if value + EPSILON < EPSILON {
        log::warn!("{field}: argument négatif ({value}), plancher à {EPSILON}");
    }
    Ok(arg.log10())
}

/// Reject NaN and infinities with a descriptive error.
///
/// # Errors
/// Returns [`ScreeningError::NumericDegeneracy`] if `value` is not finite.
#[inline]
pub fn ensure_finite(value: f64, field: &str, stage: Stage) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScreeningError::degenerate(field, stage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_divide_adds_epsilon() {
        let q = safe_divide(1.0, 1.0);
        assert!((q - 1.0 / (1.0 + EPSILON)).abs() < f64::EPSILON);
    }

    #[test]
    fn safe_divide_never_returns_non_finite() {
        assert_eq!(safe_divide(1.0, -EPSILON), 0.0);
        assert_eq!(safe_divide(f64::NAN, 1.0), 0.0);
        assert_eq!(safe_divide(f64::INFINITY, 1.0), 0.0);
        assert!(safe_divide(5.0, 0.0).is_finite());
    }

    #[test]
    fn silence_floor_is_inclusive() {
        assert!(is_silent(SILENCE_FLOOR));
        assert!(is_silent(-1.0));
        assert!(!is_silent(SILENCE_FLOOR * 2.0));
    }

    #[test]
    fn guarded_log10_floors_negative_arguments() {
        let v = guarded_log10(-3.0, "x", Stage::Assemble).unwrap();
        assert!((v - EPSILON.log10()).abs() < 1e-12);
    }

    #[test]
    fn guarded_log10_rejects_nan() {
        let err = guarded_log10(f64::NAN, "x", Stage::Assemble).unwrap_err();
        assert!(matches!(err, ScreeningError::NumericDegeneracy { .. }));
    }

    #[test]
    fn ensure_finite_passes_through() {
        assert_eq!(ensure_finite(2.5, "x", Stage::Scale).unwrap(), 2.5);
        assert!(ensure_finite(f64::NEG_INFINITY, "x", Stage::Scale).is_err());
    }
}
