use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ps_core::error::{Result, ScreeningError};
use serde::de::DeserializeOwned;

/// Read a JSON model artifact.
///
/// # Errors
/// Returns [`ScreeningError::Artifact`] if the file cannot be opened or parsed.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let artifact_err = |reason: String| ScreeningError::Artifact {
        path: path.display().to_string(),
        reason,
    };
    let file = File::open(path).map_err(|e| artifact_err(e.to_string()))?;
    let value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| artifact_err(e.to_string()))?;
    log::info!("Artefact chargé : {}", path.display());
    Ok(value)
}
