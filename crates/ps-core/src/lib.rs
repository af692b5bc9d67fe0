//! Shared types, configuration, errors and model seams for phonoscreen.
//!
//! Every other crate of the workspace depends on this one; it performs no
//! signal processing itself.

pub mod config;
pub mod decision;
pub mod error;
pub mod features;
pub mod numeric;
pub mod schema;
pub mod traits;
pub mod waveform;

pub use config::{AnalysisConfig, ScreeningConfig};
pub use decision::Decision;
pub use error::{ScreeningError, Stage};
pub use features::{FEATURE_NAMES, FeatureMapping};
pub use schema::{AlignedVector, CanonicalSchema};
pub use traits::{Classifier, Scaler};
pub use waveform::Waveform;
