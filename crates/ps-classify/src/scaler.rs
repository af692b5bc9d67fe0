use std::path::Path;

use ps_core::error::{Result, ScreeningError, Stage};
use ps_core::numeric::ensure_finite;
use ps_core::schema::AlignedVector;
use ps_core::traits::Scaler;
use serde::{Deserialize, Serialize};

use crate::artifact::load_json;

/// Per-field standardisation `(x - mean) / scale`, replayed from training.
///
/// # Example
/// ```
/// use ps_classify::scaler::StandardScaler;
/// use ps_core::traits::Scaler;
///
/// let s = StandardScaler::new(vec![1.0, 0.0], vec![2.0, 0.5]).unwrap();
/// assert_eq!(s.transform(&[3.0, 1.0]), vec![1.0, 2.0]);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Build from fitted parameters.
    ///
    /// # Errors
    /// Returns [`ScreeningError::ShapeMismatch`] if the two vectors differ in
    /// length, or [`ScreeningError::NumericDegeneracy`] if a parameter is not
    /// finite.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let scaler = Self { mean, scale };
        scaler.check()?;
        Ok(scaler)
    }

    /// Load from a JSON artifact `{"mean": [...], "scale": [...]}`.
    ///
    /// # Errors
    /// Returns [`ScreeningError::Artifact`] if the file is unreadable, or the
    /// errors of [`StandardScaler::new`].
    pub fn load(path: &Path) -> Result<Self> {
        let scaler: Self = load_json(path)?;
        scaler.check()?;
        Ok(scaler)
    }

    fn check(&self) -> Result<()> {
        if self.mean.len() != self.scale.len() {
            return Err(ScreeningError::ShapeMismatch {
                stage: Stage::Scale,
                expected: self.mean.len(),
                actual: self.scale.len(),
            });
        }
        for (i, v) in self.mean.iter().chain(&self.scale).enumerate() {
            ensure_finite(*v, &format!("scaler[{i}]"), Stage::Scale)?;
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn width(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&m, &s))| {
                // Constant training features were fitted with a unit scale.
                let s = if s == 0.0 { 1.0 } else { s };
                (x - m) / s
            })
            .collect()
    }
}

/// Apply the optional scaler stage to an aligned row.
///
/// Without a scaler the row passes through unchanged.
///
/// # Errors
/// Returns [`ScreeningError::ShapeMismatch`] if the scaler width or its output
/// width differs from the row, or [`ScreeningError::NumericDegeneracy`] if the
/// transform produced a non-finite value.
pub fn apply(scaler: Option<&dyn Scaler>, row: AlignedVector) -> Result<AlignedVector> {
    let Some(scaler) = scaler else {
        return Ok(row);
    };
    if scaler.width() != row.len() {
        return Err(ScreeningError::ShapeMismatch {
            stage: Stage::Scale,
            expected: scaler.width(),
            actual: row.len(),
        });
    }
    let scaled = scaler.transform(row.values());
    if scaled.len() != row.len() {
        return Err(ScreeningError::ShapeMismatch {
            stage: Stage::Scale,
            expected: row.len(),
            actual: scaled.len(),
        });
    }
    for (i, v) in scaled.iter().enumerate() {
        ensure_finite(*v, &format!("scaled[{i}]"), Stage::Scale)?;
    }
    Ok(AlignedVector::new(scaled))
}
