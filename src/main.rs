//! Resume anonymizer: PII redaction pipeline for resume documents

mod cli;
mod config;
mod error;
mod input;
mod models;
mod pipeline;
mod processing;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction};
use config::Config;
use error::{AnonymizerError, Result};
use log::{error, info};
use pipeline::Pipeline;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Anonymize {
            file,
            output,
            detector,
            embedding,
            ner_variant,
            no_embed,
        } => {
            cli::validate_file_extension(&file, &["pdf", "docx", "txt"])
                .map_err(AnonymizerError::InvalidInput)?;

            // CLI overrides parse through the same closed enums as the
            // config file; an unknown key fails here, before any model is
            // touched.
            if let Some(backend) = detector {
                config.models.lang_detector_backend = backend.parse()?;
            }
            if let Some(backend) = embedding {
                config.models.embedding_backend = backend.parse()?;
            }
            if let Some(variant) = ner_variant {
                config.models.ner_variant_override = Some(variant.parse()?);
            }

            info!("Starting anonymization of {}", file.display());

            let mut pipeline = if no_embed {
                Pipeline::without_embedder(config)?
            } else {
                Pipeline::new(config)?
            };

            let report = pipeline.run(&file).await?;

            info!(
                "Done: language={}, variant={}, entities resolved={}, redacted={}",
                report.language, report.ner_variant, report.entities_resolved, report.entities_filtered
            );

            match output {
                Some(path) => {
                    let json = serde_json::to_string_pretty(&report)?;
                    std::fs::write(&path, json)?;
                    println!("Report written to {}", path.display());
                }
                None => {
                    println!("{}", report.anonymized_text);
                    if let Some(embedding) = &report.embedding {
                        info!("Embedding dimensions: {}", embedding.len());
                    }
                }
            }
            Ok(())
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    AnonymizerError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("{}", content);
                Ok(())
            }
            ConfigAction::Init => {
                config.save()?;
                println!("Default configuration written");
                Ok(())
            }
        },
    }
}
