use ps_core::config::AnalysisConfig;
use ps_core::error::{Result, Stage};
use ps_core::numeric::{ensure_finite, safe_divide};
use ps_core::waveform::Waveform;

use crate::frames::{PadMode, frames, pad_centered};
use crate::hpss;
use crate::stats::{mean, mean_f32};

/// Perturbation measures of one waveform.
#[derive(Clone, Debug, Default)]
pub struct Perturbation {
    /// Zero-crossing rate per frame.
    pub zcr: Vec<f64>,
    /// Root-mean-square energy per frame.
    pub rms: Vec<f64>,
    /// Jitter proxy: mean zero-crossing rate.
    pub jitter: f64,
    /// Shimmer proxy: mean RMS energy.
    pub shimmer: f64,
    /// mean(harmonic) / (mean|y - harmonic| + ε).
    pub hnr: f64,
    /// mean(percussive) / (mean|y - percussive| + ε).
    pub nhr: f64,
}

/// Jitter/shimmer proxies and HPSS-based noise ratios.
///
/// # Example
/// ```
/// use ps_audio::perturbation::PerturbationEstimator;
/// use ps_core::config::AnalysisConfig;
/// use ps_core::waveform::Waveform;
///
/// let wave = Waveform::new(vec![0.0; 8000], 16_000).unwrap();
/// let p = PerturbationEstimator::new(AnalysisConfig::default()).estimate(&wave).unwrap();
/// assert_eq!(p.jitter, 0.0);
/// assert_eq!(p.hnr, 0.0);
/// ```
pub struct PerturbationEstimator {
    config: AnalysisConfig,
}

impl PerturbationEstimator {
    /// Estimator for the given frame configuration.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Compute every perturbation measure of `wave`.
    ///
    /// # Errors
    /// Returns [`ps_core::ScreeningError::NumericDegeneracy`] if a summary value
    /// is not finite. Guarded ratios cannot produce one; this catches
    /// non-finite input that slipped past the loader.
    pub fn estimate(&self, wave: &Waveform) -> Result<Perturbation> {
        let samples = wave.samples();
        let n_fft = self.config.n_fft;
        let hop = self.config.hop_length;

        let zcr = zero_crossing_rate(samples, n_fft, hop);
        let rms = rms_energy(samples, n_fft, hop);
        let jitter = ensure_finite(mean(&zcr), "jitter", Stage::Perturbation)?;
        let shimmer = ensure_finite(mean(&rms), "shimmer", Stage::Perturbation)?;

        let parts = hpss::separate(samples, n_fft, hop, self.config.hpss_kernel);
        let hnr = ensure_finite(
            noise_ratio(samples, &parts.harmonic),
            "hnr",
            Stage::Perturbation,
        )?;
        let nhr = ensure_finite(
            noise_ratio(samples, &parts.percussive),
            "nhr",
            Stage::Perturbation,
        )?;

        log::debug!(
            "Perturbation: jitter={jitter:.5} shimmer={shimmer:.5} hnr={hnr:.5} nhr={nhr:.5}"
        );

        Ok(Perturbation {
            zcr,
            rms,
            jitter,
            shimmer,
            hnr,
            nhr,
        })
    }
}

/// Fraction of sign changes per centred frame (edge-padded).
///
/// Zero counts as positive, so silence has no crossings.
#[must_use]
pub fn zero_crossing_rate(samples: &[f32], frame_len: usize, hop: usize) -> Vec<f64> {
    let padded = pad_centered(samples, frame_len, PadMode::Edge);
    frames(&padded, samples.len(), frame_len, hop)
        .map(|frame| {
            let crossings = frame
                .windows(2)
                .filter(|w| w[0].is_sign_negative() != w[1].is_sign_negative())
                .count();
            crossings as f64 / frame_len as f64
        })
        .collect()
}

/// Root-mean-square energy per centred frame (zero-padded).
#[must_use]
pub fn rms_energy(samples: &[f32], frame_len: usize, hop: usize) -> Vec<f64> {
    let padded = pad_centered(samples, frame_len, PadMode::Zero);
    frames(&padded, samples.len(), frame_len, hop)
        .map(|frame| {
            let sum_sq: f64 = frame.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
            (sum_sq / frame_len as f64).sqrt()
        })
        .collect()
}

/// mean(component) / (mean|original - component| + ε).
#[must_use]
pub fn noise_ratio(original: &[f32], component: &[f32]) -> f64 {
    let residual: Vec<f32> = original
        .iter()
        .zip(component)
        .map(|(&y, &c)| (y - c).abs())
        .collect();
    safe_divide(mean_f32(component), mean_f32(&residual))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_is_finite_and_zero() {
        let wave = Waveform::new(vec![0.0; 16_000], 16_000).unwrap();
        let p = PerturbationEstimator::new(AnalysisConfig::default())
            .estimate(&wave)
            .unwrap();
        for v in [p.jitter, p.shimmer, p.hnr, p.nhr] {
            assert!(v.is_finite());
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn alternating_signal_crosses_every_sample() {
        let samples: Vec<f32> = (0..4096)
            .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let zcr = zero_crossing_rate(&samples, 256, 128);
        let inner = zcr[zcr.len() / 2];
        assert!((inner - 255.0 / 256.0).abs() < 1e-9, "zcr {inner}");
    }

    #[test]
    fn constant_signal_rms_is_amplitude() {
        let samples = vec![0.5f32; 4096];
        let rms = rms_energy(&samples, 256, 128);
        assert!((rms[rms.len() / 2] - 0.5).abs() < 1e-6);
        // Centred first frame is half zero-padding.
        assert!(rms[0] < 0.5);
    }

    #[test]
    fn white_noise_stays_finite() {
        // xorshift, deterministic
        let mut state = 0x2545_f491_u32;
        let samples: Vec<f32> = (0..16_000)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect();
        let wave = Waveform::new(samples, 16_000).unwrap();
        let p = PerturbationEstimator::new(AnalysisConfig::default())
            .estimate(&wave)
            .unwrap();
        assert!(p.jitter > 0.3, "noise zcr {}", p.jitter);
        for v in [p.shimmer, p.hnr, p.nhr] {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn noise_ratio_of_identical_component_divides_by_epsilon() {
        let y = [0.5f32; 10];
        let r = noise_ratio(&y, &y);
        assert!((r - 0.5 / ps_core::numeric::EPSILON).abs() < 1.0);
    }
}
