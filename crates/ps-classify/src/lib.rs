// Schema alignment, scaling, classification and decision mapping for phonoscreen.

pub mod align;
pub mod artifact;
pub mod classifier;
pub mod pipeline;
pub mod scaler;

pub use pipeline::{ScreeningPipeline, ScreeningReport};
