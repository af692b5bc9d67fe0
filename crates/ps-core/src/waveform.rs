use crate::error::{Result, ScreeningError, Stage};

/// Mono waveform at a fixed sample rate.
///
/// Created by the loader per request and dropped once features are extracted.
///
/// # Example
/// ```
/// use ps_core::waveform::Waveform;
/// let wave = Waveform::new(vec![0.0; 16_000], 16_000).unwrap();
/// assert_eq!(wave.len(), 16_000);
/// assert!((wave.duration_secs() - 1.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Build a waveform, enforcing `sample_rate > 0` and at least one sample.
    ///
    /// # Errors
    /// Returns [`ScreeningError::Decode`] if either invariant is violated, or
    /// [`ScreeningError::NumericDegeneracy`] if a sample is NaN or infinite.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(ScreeningError::Decode("fréquence d'échantillonnage nulle".into()));
        }
        if samples.is_empty() {
            return Err(ScreeningError::Decode("aucun échantillon après décodage".into()));
        }
        if samples.iter().any(|s| !s.is_finite()) {
            return Err(ScreeningError::degenerate("sample", Stage::Load));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Samples, mono, nominally in [-1, 1].
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_rate_and_empty() {
        assert!(matches!(
            Waveform::new(vec![0.0], 0),
            Err(ScreeningError::Decode(_))
        ));
        assert!(matches!(
            Waveform::new(vec![], 16_000),
            Err(ScreeningError::Decode(_))
        ));
    }

    #[test]
    fn rejects_nan_samples() {
        assert!(matches!(
            Waveform::new(vec![0.0, f32::NAN], 16_000),
            Err(ScreeningError::NumericDegeneracy { .. })
        ));
    }
}
