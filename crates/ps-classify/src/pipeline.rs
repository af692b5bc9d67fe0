use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use ps_audio::decode::{decode_bytes, decode_file, decode_reader};
use ps_audio::features::FeatureExtractor;
use ps_core::config::{AnalysisConfig, ScreeningConfig};
use ps_core::decision::Decision;
use ps_core::error::{Result, ScreeningError, Stage};
use ps_core::features::FeatureMapping;
use ps_core::schema::{AlignedVector, CanonicalSchema};
use ps_core::traits::{Classifier, Scaler};
use ps_core::waveform::Waveform;
use serde::Serialize;

use crate::align::align;
use crate::classifier::{ClassifierAdapter, LinearClassifier};
use crate::scaler::{self, StandardScaler};

/// Everything one screening produced.
#[derive(Clone, Debug, Serialize)]
pub struct ScreeningReport {
    /// Human-readable outcome.
    pub decision: Decision,
    /// Raw classifier label.
    pub label: i64,
    /// Assembled features, before alignment.
    pub features: FeatureMapping,
    /// Row in schema order, before scaling.
    pub aligned: AlignedVector,
    /// Row handed to the classifier.
    pub scaled: AlignedVector,
}

/// Decode → analyse → assemble → align → scale → classify → decide.
///
/// Model state (classifier, optional scaler, schema) is loaded once and
/// shared read-only; the pipeline holds no per-request state and can be used
/// from several threads at once.
pub struct ScreeningPipeline {
    analysis: AnalysisConfig,
    extractor: FeatureExtractor,
    adapter: ClassifierAdapter,
    scaler: Option<Arc<dyn Scaler>>,
}

impl ScreeningPipeline {
    /// Build a pipeline around already loaded model objects.
    ///
    /// # Errors
    /// Returns [`ScreeningError::Config`] for invalid analysis parameters, or
    /// [`ScreeningError::ShapeMismatch`] if the scaler width differs from the
    /// classifier schema.
    pub fn new(
        analysis: AnalysisConfig,
        classifier: Arc<dyn Classifier>,
        scaler: Option<Arc<dyn Scaler>>,
    ) -> Result<Self> {
        analysis.validate()?;
        let adapter = ClassifierAdapter::new(classifier);
        if let Some(s) = &scaler
            && s.width() != adapter.schema().len()
        {
            return Err(ScreeningError::ShapeMismatch {
                stage: Stage::Scale,
                expected: adapter.schema().len(),
                actual: s.width(),
            });
        }
        log::info!(
            "Pipeline prêt : {} champs attendus, scaler {}",
            adapter.schema().len(),
            if scaler.is_some() { "actif" } else { "absent" }
        );
        Ok(Self {
            extractor: FeatureExtractor::new(analysis.clone()),
            analysis,
            adapter,
            scaler,
        })
    }

    /// Load the artifacts named in `config` and build the pipeline.
    ///
    /// # Errors
    /// Returns [`ScreeningError::Config`] if no classifier path is set, or
    /// any artifact/shape error from loading.
    pub fn from_config(config: &ScreeningConfig) -> Result<Self> {
        let clf_path = config
            .model
            .classifier
            .as_deref()
            .ok_or_else(|| ScreeningError::Config("model.classifier non renseigné".into()))?;
        let classifier: Arc<dyn Classifier> = Arc::new(LinearClassifier::load(clf_path)?);
        let scaler: Option<Arc<dyn Scaler>> = match config.model.scaler.as_deref() {
            Some(p) => Some(Arc::new(StandardScaler::load(p)?) as Arc<dyn Scaler>),
            None => None,
        };
        Self::new(config.analysis.clone(), classifier, scaler)
    }

    /// Expected field order of the classifier.
    #[must_use]
    pub fn schema(&self) -> &CanonicalSchema {
        self.adapter.schema()
    }

    /// Analysis parameters in use.
    #[must_use]
    pub fn analysis(&self) -> &AnalysisConfig {
        &self.analysis
    }

    /// Decode an audio file at the analysis sample rate.
    ///
    /// # Errors
    /// Returns [`ScreeningError::Decode`] on unreadable input.
    pub fn load(&self, path: &Path) -> Result<Waveform> {
        decode_file(path, self.analysis.target_sample_rate)
    }

    /// Feature mapping of `wave`, without classification.
    ///
    /// # Errors
    /// Returns [`ScreeningError::NumericDegeneracy`] if a feature is not finite.
    pub fn extract(&self, wave: &Waveform) -> Result<FeatureMapping> {
        self.extractor.extract(wave)
    }

    /// Screen an already decoded waveform.
    ///
    /// # Errors
    /// Returns the first error of any stage.
    pub fn screen_waveform(&self, wave: &Waveform) -> Result<ScreeningReport> {
        let features = self.extract(wave)?;
        let aligned = align(&features, self.schema())?;
        let scaled = scaler::apply(self.scaler.as_deref(), aligned.clone())?;
        let label = self.adapter.classify(&scaled)?;
        let decision = Decision::from_label(label);
        log::info!("Décision : {decision} (label {label})");
        Ok(ScreeningReport {
            decision,
            label,
            features,
            aligned,
            scaled,
        })
    }

    /// Screen an audio file.
    ///
    /// # Errors
    /// Returns the first error of any stage.
    pub fn screen_file(&self, path: &Path) -> Result<ScreeningReport> {
        let wave = self.load(path)?;
        self.screen_waveform(&wave)
    }

    /// Screen an in-memory encoded audio stream.
    ///
    /// # Errors
    /// Returns the first error of any stage.
    pub fn screen_bytes(&self, bytes: Vec<u8>, extension: Option<&str>) -> Result<ScreeningReport> {
        let wave = decode_bytes(bytes, extension, self.analysis.target_sample_rate)?;
        self.screen_waveform(&wave)
    }

    /// Screen audio read forward-only from `reader` (pipe, socket, stdin).
    ///
    /// # Errors
    /// Returns the first error of any stage.
    pub fn screen_reader<R>(&self, reader: R, extension: Option<&str>) -> Result<ScreeningReport>
    where
        R: Read + Send + Sync + 'static,
    {
        let wave = decode_reader(reader, extension, self.analysis.target_sample_rate)?;
        self.screen_waveform(&wave)
    }
}
