use std::fmt;

use thiserror::Error;

/// Étape du pipeline où une erreur a été levée.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Waveform loader (decode, downmix, resample).
    Load,
    /// Spectral analyzer.
    Spectral,
    /// Perturbation estimator.
    Perturbation,
    /// Feature vector assembler.
    Assemble,
    /// Feature aligner.
    Align,
    /// Optional affine scaler.
    Scale,
    /// Classifier adapter.
    Classify,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Load => "load",
            Self::Spectral => "spectral",
            Self::Perturbation => "perturbation",
            Self::Assemble => "assemble",
            Self::Align => "align",
            Self::Scale => "scale",
            Self::Classify => "classify",
        };
        f.write_str(name)
    }
}

/// Errors originating from the screening pipeline.
#[derive(Error, Debug)]
pub enum ScreeningError {
    /// Unreadable or unsupported audio, or nothing left after decoding.
    #[error("Erreur de décodage : {0}")]
    Decode(String),

    /// The classifier schema references fields the assembler never produced.
    #[error("Schéma incompatible : champ(s) absent(s) {}", .missing.join(", "))]
    SchemaMismatch {
        /// Every schema field missing from the feature mapping, in schema order.
        missing: Vec<String>,
    },

    /// A value would have been NaN or infinite.
    #[error("Valeur non finie pour `{field}` (étape {stage})")]
    NumericDegeneracy {
        /// Feature or intermediate quantity name.
        field: String,
        /// Stage that detected it.
        stage: Stage,
    },

    /// A row does not have the width the next stage expects.
    #[error("Largeur de vecteur invalide (étape {stage}) : attendu {expected}, reçu {actual}")]
    ShapeMismatch {
        /// Stage that rejected the row.
        stage: Stage,
        /// Expected width.
        expected: usize,
        /// Actual width.
        actual: usize,
    },

    /// Invalid configuration value.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// A classifier or scaler artifact could not be loaded.
    #[error("Artefact invalide {path} : {reason}")]
    Artifact {
        /// Path of the artifact.
        path: String,
        /// What went wrong.
        reason: String,
    },
}

impl ScreeningError {
    /// Shorthand for a [`ScreeningError::NumericDegeneracy`].
    #[must_use]
    pub fn degenerate(field: impl Into<String>, stage: Stage) -> Self {
        Self::NumericDegeneracy {
            field: field.into(),
            stage,
        }
    }
}

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ScreeningError>;
