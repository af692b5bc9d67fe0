use std::path::Path;
use std::sync::Arc;

use ps_core::error::{Result, ScreeningError, Stage};
use ps_core::numeric::ensure_finite;
use ps_core::schema::{AlignedVector, CanonicalSchema};
use ps_core::traits::Classifier;
use serde::{Deserialize, Serialize};

use crate::artifact::load_json;

fn default_classes() -> [i64; 2] {
    [0, 1]
}

/// Linear binary decision rule: `classes[1]` if `w·x + b > 0`, else `classes[0]`.
///
/// # Example
/// ```
/// use ps_classify::classifier::LinearClassifier;
/// use ps_core::traits::Classifier;
///
/// let clf = LinearClassifier::new(vec!["NHR".into()], vec![2.0], -1.0).unwrap();
/// assert_eq!(clf.predict(&[1.0]), 1);
/// assert_eq!(clf.predict(&[0.0]), 0);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LinearClassifier {
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
    #[serde(default = "default_classes")]
    classes: [i64; 2],
}

impl LinearClassifier {
    /// Build with the default `[0, 1]` class labels.
    ///
    /// # Errors
    /// Returns [`ScreeningError::ShapeMismatch`] if names and coefficients
    /// differ in length, or [`ScreeningError::NumericDegeneracy`] for a
    /// non-finite weight.
    pub fn new(feature_names: Vec<String>, coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        let clf = Self {
            feature_names,
            coefficients,
            intercept,
            classes: default_classes(),
        };
        clf.check()?;
        Ok(clf)
    }

    /// Load from a JSON artifact
    /// `{"feature_names": [...], "coefficients": [...], "intercept": b, "classes": [0, 1]}`.
    ///
    /// # Errors
    /// Returns [`ScreeningError::Artifact`] if the file is unreadable, or the
    /// errors of [`LinearClassifier::new`].
    pub fn load(path: &Path) -> Result<Self> {
        let clf: Self = load_json(path)?;
        clf.check()?;
        Ok(clf)
    }

    fn check(&self) -> Result<()> {
        if self.feature_names.len() != self.coefficients.len() {
            return Err(ScreeningError::ShapeMismatch {
                stage: Stage::Classify,
                expected: self.feature_names.len(),
                actual: self.coefficients.len(),
            });
        }
        for (name, w) in self.feature_names.iter().zip(&self.coefficients) {
            ensure_finite(*w, name, Stage::Classify)?;
        }
        ensure_finite(self.intercept, "intercept", Stage::Classify)?;
        Ok(())
    }

    /// Raw decision score `w·x + b`.
    #[must_use]
    pub fn decision_function(&self, row: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(row)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

impl Classifier for LinearClassifier {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, row: &[f64]) -> i64 {
        if self.decision_function(row) > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        }
    }
}

/// Thin boundary around the externally owned classifier.
///
/// Holds the canonical schema read from the classifier once, and enforces
/// the row-width precondition before every call.
pub struct ClassifierAdapter {
    classifier: Arc<dyn Classifier>,
    schema: CanonicalSchema,
}

impl ClassifierAdapter {
    /// Wrap a shared classifier.
    #[must_use]
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        let schema = CanonicalSchema::new(classifier.feature_names().iter().cloned());
        Self { classifier, schema }
    }

    /// The classifier's expected field order.
    #[must_use]
    pub fn schema(&self) -> &CanonicalSchema {
        &self.schema
    }

    /// Run single-row inference and return the raw label.
    ///
    /// # Errors
    /// Returns [`ScreeningError::ShapeMismatch`] if `row` is not exactly as
    /// wide as the schema.
    pub fn classify(&self, row: &AlignedVector) -> Result<i64> {
        if row.len() != self.schema.len() {
            return Err(ScreeningError::ShapeMismatch {
                stage: Stage::Classify,
                expected: self.schema.len(),
                actual: row.len(),
            });
        }
        let label = self.classifier.predict(row.values());
        log::debug!("Classifier label: {label}");
        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn custom_classes_are_returned() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"feature_names": ["a", "b"], "coefficients": [1.0, -1.0], "intercept": 0.0, "classes": [7, 9]}}"#
        )
        .unwrap();
        let clf = LinearClassifier::load(file.path()).unwrap();
        assert_eq!(clf.predict(&[2.0, 1.0]), 9);
        assert_eq!(clf.predict(&[1.0, 2.0]), 7);
    }

    #[test]
    fn classes_default_to_zero_one() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"feature_names": ["a"], "coefficients": [1.0], "intercept": -0.5}}"#
        )
        .unwrap();
        let clf = LinearClassifier::load(file.path()).unwrap();
        assert_eq!(clf.predict(&[1.0]), 1);
        assert_eq!(clf.predict(&[0.0]), 0);
    }

    #[test]
    fn mismatched_weights_are_rejected() {
        assert!(LinearClassifier::new(vec!["a".into()], vec![1.0, 2.0], 0.0).is_err());
    }

    #[test]
    fn adapter_exposes_schema_and_checks_width() {
        let clf =
            LinearClassifier::new(vec!["x".into(), "y".into()], vec![1.0, 1.0], 0.0).unwrap();
        let adapter = ClassifierAdapter::new(Arc::new(clf));
        assert_eq!(adapter.schema().names(), &["x".to_string(), "y".to_string()]);
        assert_eq!(adapter.classify(&AlignedVector::new(vec![1.0, 1.0])).unwrap(), 1);
        assert!(matches!(
            adapter.classify(&AlignedVector::new(vec![1.0])),
            Err(ScreeningError::ShapeMismatch { stage: Stage::Classify, .. })
        ));
    }
}
