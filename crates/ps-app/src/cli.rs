use std::path::PathBuf;

use clap::Parser;

/// phonoscreen — dépistage binaire à partir d'un enregistrement vocal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier audio à analyser, ou dossier pour un traitement par lots.
    pub input: PathBuf,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Artefact classifieur (JSON). Remplace `model.classifier` de la config.
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Artefact scaler (JSON). Remplace `model.scaler` de la config.
    #[arg(long)]
    pub scaler: Option<PathBuf>,

    /// Afficher uniquement les features extraites (aucun classifieur requis).
    #[arg(long, default_value_t = false)]
    pub features: bool,

    /// Sortie JSON au lieu du texte.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// `true` if the input is a folder to process in batch.
    #[must_use]
    pub fn is_batch(&self) -> bool {
        self.input.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let cli = Cli::parse_from([
            "phonoscreen",
            "voice.wav",
            "--model",
            "clf.json",
            "--json",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.input, PathBuf::from("voice.wav"));
        assert_eq!(cli.model, Some(PathBuf::from("clf.json")));
        assert!(cli.json);
        assert!(!cli.features);
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["phonoscreen"]).is_err());
    }
}
