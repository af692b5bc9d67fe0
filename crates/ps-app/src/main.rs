use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use ps_audio::decode::decode_file;
use ps_audio::features::FeatureExtractor;
use ps_classify::ScreeningPipeline;
use ps_core::config::ScreeningConfig;
use ps_core::features::FeatureMapping;

pub mod batch;
pub mod cli;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config, puis les overrides CLI
    let mut config = resolve_config(&cli.config)?;
    if let Some(ref path) = cli.model {
        config.model.classifier = Some(path.clone());
    }
    if let Some(ref path) = cli.scaler {
        config.model.scaler = Some(path.clone());
    }

    // 4. Extraction seule : aucun artefact modèle requis
    if cli.features {
        anyhow::ensure!(!cli.is_batch(), "--features attend un fichier, pas un dossier");
        let wave = decode_file(&cli.input, config.analysis.target_sample_rate)?;
        let features = FeatureExtractor::new(config.analysis.clone()).extract(&wave)?;
        print_features(&features, cli.json)?;
        return Ok(());
    }

    // 5. Charger classifieur/scaler une seule fois
    let pipeline = ScreeningPipeline::from_config(&config)
        .context("Impossible d'initialiser le pipeline de dépistage")?;

    // 6. Lots ou fichier unique
    if cli.is_batch() {
        let entries = batch::run_batch(&pipeline, &cli.input)?;
        let failed = entries.iter().filter(|e| e.error.is_some()).count();
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            for e in &entries {
                match (e.decision, &e.error) {
                    (Some(d), _) => println!("{}\t{d}", e.path.display()),
                    (None, Some(err)) => println!("{}\tERREUR: {err}", e.path.display()),
                    (None, None) => {}
                }
            }
        }
        if failed > 0 {
            anyhow::bail!("{failed} fichier(s) sur {} en échec", entries.len());
        }
        return Ok(());
    }

    let report = pipeline
        .screen_file(&cli.input)
        .with_context(|| format!("Échec du dépistage pour {}", cli.input.display()))?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.decision);
    }
    Ok(())
}

/// Use the config file if it exists, else the built-in defaults.
fn resolve_config(path: &Path) -> Result<ScreeningConfig> {
    if path.exists() {
        ps_core::config::load_config(path)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            path.display()
        );
        Ok(ScreeningConfig::default())
    }
}

fn print_features(features: &FeatureMapping, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(features)?);
    } else {
        for (name, value) in features.iter_known() {
            println!("{name:<20} {value:.6}");
        }
    }
    Ok(())
}
