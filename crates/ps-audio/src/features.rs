use ps_core::config::AnalysisConfig;
use ps_core::error::{Result, Stage};
use ps_core::features::{self as names, FeatureMapping};
use ps_core::numeric::guarded_log10;
use ps_core::waveform::Waveform;

use crate::perturbation::{Perturbation, PerturbationEstimator};
use crate::spectral::{SpectralAnalyzer, SpectralDescriptors};

// KNOWN APPROXIMATION: the three values below are fixed placeholder constants
// standing in for recurrence period density entropy (RPDE), detrended
// fluctuation analysis (DFA) and correlation dimension (D2). They are NOT
// computed from the signal. The classifier artifacts were trained with these
// exact literals, so replacing them with real estimators changes the model
// contract and requires retraining.

/// Placeholder for recurrence period density entropy. Not computed.
pub const RPDE_PLACEHOLDER: f64 = 0.5;
/// Placeholder for detrended fluctuation analysis. Not computed.
pub const DFA_PLACEHOLDER: f64 = 0.7;
/// Placeholder for correlation dimension. Not computed.
pub const D2_PLACEHOLDER: f64 = 2.0;

/// Build the 22-field mapping from the spectral and perturbation stages.
///
/// Derived jitter/shimmer fields are fixed ratios of the two proxies and must
/// stay exactly as written.
///
/// # Errors
/// Returns [`ps_core::ScreeningError::NumericDegeneracy`] naming the field if
/// any value is not finite.
///
/// # Example
/// ```
/// use ps_audio::features::assemble;
/// use ps_audio::perturbation::Perturbation;
/// use ps_audio::spectral::SpectralDescriptors;
///
/// let p = Perturbation { jitter: 0.2, shimmer: 0.3, ..Perturbation::default() };
/// let m = assemble(&SpectralDescriptors::default(), &p).unwrap();
/// assert_eq!(m.len(), 22);
/// assert_eq!(m.get("MDVP:RAP"), Some(0.1));
/// ```
pub fn assemble(
    spectral: &SpectralDescriptors,
    perturbation: &Perturbation,
) -> Result<FeatureMapping> {
    let centroid = spectral.centroid_summary();
    let bandwidth = spectral.bandwidth_summary();
    let rolloff = spectral.rolloff_summary();
    let jitter = perturbation.jitter;
    let shimmer = perturbation.shimmer;

    let shimmer_db = 20.0 * guarded_log10(shimmer, names::SHIMMER_DB, Stage::Assemble)?;

    let mut m = FeatureMapping::new();
    m.insert(names::FO, centroid.mean)?;
    m.insert(names::FHI, centroid.max)?;
    m.insert(names::FLO, centroid.min)?;

    m.insert(names::JITTER_PERCENT, jitter)?;
    m.insert(names::JITTER_ABS, jitter / 100.0)?;
    m.insert(names::RAP, jitter / 2.0)?;
    m.insert(names::PPQ, jitter / 4.0)?;
    m.insert(names::DDP, jitter * 3.0)?;

    m.insert(names::SHIMMER, shimmer)?;
    m.insert(names::SHIMMER_DB, shimmer_db)?;
    m.insert(names::APQ3, shimmer / 3.0)?;
    m.insert(names::APQ5, shimmer / 5.0)?;
    m.insert(names::APQ, shimmer / 2.0)?;
    m.insert(names::DDA, shimmer * 3.0)?;

    m.insert(names::NHR, perturbation.nhr)?;
    m.insert(names::HNR, perturbation.hnr)?;

    m.insert(names::RPDE, RPDE_PLACEHOLDER)?;
    m.insert(names::DFA, DFA_PLACEHOLDER)?;
    m.insert(names::SPREAD1, bandwidth.mean)?;
    m.insert(names::SPREAD2, bandwidth.std)?;
    m.insert(names::D2, D2_PLACEHOLDER)?;
    m.insert(names::PPE, rolloff.mean)?;

    Ok(m)
}

/// Runs the spectral analyzer and perturbation estimator, then assembles.
///
/// The two analyses only read the waveform and run concurrently.
///
/// # Example
/// ```
/// use ps_audio::features::FeatureExtractor;
/// use ps_core::config::AnalysisConfig;
/// use ps_core::waveform::Waveform;
///
/// let wave = Waveform::new(vec![0.0; 16_000], 16_000).unwrap();
/// let m = FeatureExtractor::new(AnalysisConfig::default()).extract(&wave).unwrap();
/// assert!(m.iter_known().all(|(_, v)| v.is_finite()));
/// ```
pub struct FeatureExtractor {
    spectral: SpectralAnalyzer,
    perturbation: PerturbationEstimator,
}

impl FeatureExtractor {
    /// Extractor for the given frame configuration.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            spectral: SpectralAnalyzer::new(config.clone()),
            perturbation: PerturbationEstimator::new(config),
        }
    }

    /// Extract the feature mapping of `wave`.
    ///
    /// # Errors
    /// Propagates [`ps_core::ScreeningError::NumericDegeneracy`] from either
    /// stage or from assembly.
    pub fn extract(&self, wave: &Waveform) -> Result<FeatureMapping> {
        let (spectral, perturbation) = rayon::join(
            || self.spectral.analyze(wave),
            || self.perturbation.estimate(wave),
        );
        let mapping = assemble(&spectral, &perturbation?)?;
        log::debug!(
            "Assembled {} features from {} frames",
            mapping.len(),
            spectral.n_frames()
        );
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_core::features::FEATURE_NAMES;
    use ps_core::numeric::EPSILON;

    fn perturbation(jitter: f64, shimmer: f64) -> Perturbation {
        Perturbation {
            jitter,
            shimmer,
            hnr: 1.5,
            nhr: 0.25,
            ..Perturbation::default()
        }
    }

    #[test]
    fn produces_full_vocabulary() {
        let m = assemble(&SpectralDescriptors::default(), &perturbation(0.1, 0.2)).unwrap();
        for name in FEATURE_NAMES {
            assert!(m.get(name).is_some(), "champ manquant {name}");
        }
        assert_eq!(m.len(), FEATURE_NAMES.len());
    }

    #[test]
    fn derived_ratios_are_exact() {
        for (jitter, shimmer) in [(0.0, 0.0), (0.123, 0.456), (7.5, 1e-9), (1e6, 3.0)] {
            let m =
                assemble(&SpectralDescriptors::default(), &perturbation(jitter, shimmer)).unwrap();
            assert_eq!(m.get(names::RAP), Some(jitter / 2.0));
            assert_eq!(m.get(names::PPQ), Some(jitter / 4.0));
            assert_eq!(m.get(names::DDP), Some(jitter * 3.0));
            assert_eq!(m.get(names::APQ), Some(shimmer / 2.0));
            assert_eq!(m.get(names::APQ3), Some(shimmer / 3.0));
            assert_eq!(m.get(names::APQ5), Some(shimmer / 5.0));
            assert_eq!(m.get(names::DDA), Some(shimmer * 3.0));
        }
    }

    #[test]
    fn placeholders_are_literal_constants() {
        let a = assemble(&SpectralDescriptors::default(), &perturbation(0.1, 0.2)).unwrap();
        let b = assemble(&SpectralDescriptors::default(), &perturbation(0.9, 0.01)).unwrap();
        for (name, value) in [
            (names::RPDE, RPDE_PLACEHOLDER),
            (names::DFA, DFA_PLACEHOLDER),
            (names::D2, D2_PLACEHOLDER),
        ] {
            assert_eq!(a.get(name), Some(value));
            assert_eq!(b.get(name), Some(value));
        }
    }

    #[test]
    fn zero_shimmer_gives_finite_decibels() {
        let m = assemble(&SpectralDescriptors::default(), &perturbation(0.0, 0.0)).unwrap();
        let db = m.get(names::SHIMMER_DB).unwrap();
        assert!((db - 20.0 * EPSILON.log10()).abs() < 1e-9);
    }

    #[test]
    fn spectral_summaries_feed_frequency_fields() {
        let spectral = SpectralDescriptors {
            centroid: vec![100.0, 300.0],
            bandwidth: vec![10.0, 30.0],
            rolloff: vec![500.0, 700.0],
        };
        let m = assemble(&spectral, &perturbation(0.1, 0.1)).unwrap();
        assert_eq!(m.get(names::FO), Some(200.0));
        assert_eq!(m.get(names::FHI), Some(300.0));
        assert_eq!(m.get(names::FLO), Some(100.0));
        assert_eq!(m.get(names::SPREAD1), Some(20.0));
        assert_eq!(m.get(names::SPREAD2), Some(10.0));
        assert_eq!(m.get(names::PPE), Some(600.0));
    }

    #[test]
    fn non_finite_shimmer_is_reported() {
        let err =
            assemble(&SpectralDescriptors::default(), &perturbation(0.1, f64::NAN)).unwrap_err();
        assert!(err.to_string().contains(names::SHIMMER_DB));
    }
}
