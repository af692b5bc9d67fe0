use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use ps_classify::ScreeningPipeline;
use ps_core::error::ScreeningError;
use rayon::prelude::*;
use serde::Serialize;

/// Extensions audio reconnues.
const AUDIO_EXTS: &[&str] = &["wav", "mp3", "flac", "ogg", "m4a", "aac", "mp4", "mkv"];

/// Outcome for one file of a batch.
#[derive(Debug, Serialize)]
pub struct BatchEntry {
    /// Audio file.
    pub path: PathBuf,
    /// Decision string, if screening succeeded.
    pub decision: Option<&'static str>,
    /// Error message, if it failed.
    pub error: Option<String>,
}

/// Liste récursivement les fichiers audio reconnus, triés.
///
/// # Errors
/// Retourne une erreur si le dossier ne peut être lu.
pub fn scan_audio_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    scan_dir(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            scan_dir(&path, files)?;
        } else if let Some(ext) = path.extension().and_then(|s| s.to_str())
            && AUDIO_EXTS.contains(&ext.to_lowercase().as_str())
        {
            files.push(path);
        }
    }
    Ok(())
}

/// Screen every audio file under `dir` in parallel.
///
/// A failing file is reported in its entry and never aborts the batch.
///
/// # Errors
/// Retourne une erreur si le dossier ne peut être parcouru.
pub fn run_batch(pipeline: &ScreeningPipeline, dir: &Path) -> Result<Vec<BatchEntry>> {
    let files = scan_audio_files(dir)?;
    log::info!("Traitement par lots : {} fichier(s) dans {}", files.len(), dir.display());

    Ok(files
        .into_par_iter()
        .map(|path| match pipeline.screen_file(&path) {
            Ok(report) => BatchEntry {
                path,
                decision: Some(report.decision.as_str()),
                error: None,
            },
            Err(e) => {
                log::warn!("{} : {e}", path.display());
                let error = Some(describe(&e));
                BatchEntry {
                    path,
                    decision: None,
                    error,
                }
            }
        })
        .collect())
}

fn describe(e: &ScreeningError) -> String {
    match e {
        ScreeningError::Decode(_) => format!("entrée rejetée : {e}"),
        _ => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_finds_audio_recursively_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        for p in [
            dir.path().join("b.WAV"),
            dir.path().join("a.mp3"),
            dir.path().join("notes.txt"),
            sub.join("c.flac"),
        ] {
            fs::write(p, b"").unwrap();
        }
        let files = scan_audio_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.mp3", "b.WAV", "c.flac"]);
    }

    #[test]
    fn missing_dir_is_an_error() {
        assert!(scan_audio_files(Path::new("/nonexistent/batch")).is_err());
    }
}
