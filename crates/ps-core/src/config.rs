use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ScreeningError;

/// Short-time analysis parameters shared by every DSP stage.
///
/// # Example
/// ```
/// use ps_core::config::AnalysisConfig;
/// let a = AnalysisConfig::default();
/// assert_eq!(a.target_sample_rate, 16_000);
/// assert_eq!(a.n_fft, 2048);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct AnalysisConfig {
    /// Sample rate every waveform is resampled to (Hz).
    pub target_sample_rate: u32,
    /// Frame length / FFT size in samples.
    pub n_fft: usize,
    /// Hop between frames in samples.
    pub hop_length: usize,
    /// Fraction of spectral energy below the rolloff frequency (0, 1].
    pub rolloff_percent: f64,
    /// Median filter length for harmonic/percussive separation (odd).
    pub hpss_kernel: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16_000,
            n_fft: 2048,
            hop_length: 512,
            rolloff_percent: 0.85,
            hpss_kernel: 31,
        }
    }
}

/// Where the model artifacts live.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ModelConfig {
    /// Classifier artifact (JSON).
    pub classifier: Option<PathBuf>,
    /// Optional scaler artifact (JSON).
    pub scaler: Option<PathBuf>,
}

/// Configuration complète du pipeline de dépistage.
///
/// # Example
/// ```
/// use ps_core::config::ScreeningConfig;
/// let config = ScreeningConfig::default();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ScreeningConfig {
    /// DSP parameters.
    pub analysis: AnalysisConfig,
    /// Model artifacts.
    pub model: ModelConfig,
}

impl AnalysisConfig {
    /// Check value ranges.
    ///
    /// # Errors
    /// Returns [`ScreeningError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), ScreeningError> {
        if self.target_sample_rate == 0 {
            return Err(ScreeningError::Config("target_sample_rate doit être > 0".into()));
        }
        if self.n_fft < 2 || !self.n_fft.is_multiple_of(2) {
            return Err(ScreeningError::Config(format!(
                "n_fft doit être pair et >= 2 (reçu {})",
                self.n_fft
            )));
        }
        if self.hop_length == 0 || self.hop_length > self.n_fft {
            return Err(ScreeningError::Config(format!(
                "hop_length doit être dans [1, n_fft] (reçu {})",
                self.hop_length
            )));
        }
        if self.rolloff_percent.is_nan()
            || self.rolloff_percent <= 0.0
            || self.rolloff_percent > 1.0
        {
            return Err(ScreeningError::Config(format!(
                "rolloff_percent doit être dans (0, 1] (reçu {})",
                self.rolloff_percent
            )));
        }
        if self.hpss_kernel.is_multiple_of(2) {
            return Err(ScreeningError::Config(format!(
                "hpss_kernel doit être impair (reçu {})",
                self.hpss_kernel
            )));
        }
        Ok(())
    }
}

impl ScreeningConfig {
    /// Check value ranges.
    ///
    /// # Errors
    /// Returns [`ScreeningError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), ScreeningError> {
        self.analysis.validate()
    }
}

/// Partial on-disk layout; absent keys keep their defaults.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    analysis: AnalysisSection,
    model: ModelSection,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct AnalysisSection {
    target_sample_rate: Option<u32>,
    n_fft: Option<usize>,
    hop_length: Option<usize>,
    rolloff_percent: Option<f64>,
    hpss_kernel: Option<usize>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ModelSection {
    classifier: Option<PathBuf>,
    scaler: Option<PathBuf>,
}

/// Parse TOML text over the defaults, then validate.
///
/// Relative artifact paths are kept as written.
///
/// # Errors
/// Returns an error if the TOML is malformed or a value is out of range.
pub fn parse_config(content: &str) -> Result<ScreeningConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = ScreeningConfig::default();

    let a = file.analysis;
    if let Some(v) = a.target_sample_rate {
        config.analysis.target_sample_rate = v;
    }
    if let Some(v) = a.n_fft {
        config.analysis.n_fft = v;
    }
    if let Some(v) = a.hop_length {
        config.analysis.hop_length = v;
    }
    if let Some(v) = a.rolloff_percent {
        config.analysis.rolloff_percent = v;
    }
    if let Some(v) = a.hpss_kernel {
        config.analysis.hpss_kernel = v;
    }

    let m = file.model;
    if m.classifier.is_some() {
        config.model.classifier = m.classifier;
    }
    if m.scaler.is_some() {
        config.model.scaler = m.scaler;
    }

    config.validate()?;
    Ok(config)
}

/// Load and validate a TOML configuration file.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or fails validation.
pub fn load_config(path: &Path) -> Result<ScreeningConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Configuration invalide dans {}", path.display()))?;
    log::debug!("Configuration chargée depuis {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = parse_config("[analysis]\nhop_length = 256\n").unwrap();
        assert_eq!(config.analysis.hop_length, 256);
        assert_eq!(config.analysis.n_fft, 2048);
        assert_eq!(config.model.classifier, None);
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), ScreeningConfig::default());
    }

    #[test]
    fn rejects_even_kernel() {
        let err = parse_config("[analysis]\nhpss_kernel = 30\n").unwrap_err();
        assert!(format!("{err:#}").contains("hpss_kernel"));
    }

    #[test]
    fn rejects_hop_longer_than_frame() {
        assert!(parse_config("[analysis]\nn_fft = 512\nhop_length = 1024\n").is_err());
    }

    #[test]
    fn load_reads_model_paths() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[model]\nclassifier = \"models/clf.json\"").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(
            config.model.classifier.as_deref(),
            Some(Path::new("models/clf.json"))
        );
        assert!(config.model.scaler.is_none());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/phonoscreen.toml")).is_err());
    }
}
