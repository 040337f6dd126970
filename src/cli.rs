//! CLI interface for the resume anonymizer

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-anonymizer")]
#[command(about = "Resume anonymization pipeline")]
#[command(
    long_about = "Extract text from resumes (PDF/DOCX), detect the document language, redact PII via pattern rules and NER spans, and produce anonymized text plus an embedding vector"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Anonymize a resume document
    Anonymize {
        /// Path to the resume file (PDF, DOCX, TXT)
        #[arg(short, long)]
        file: PathBuf,

        /// Write the pipeline report as JSON to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Language detector backend: model, heuristic
        #[arg(long)]
        detector: Option<String>,

        /// Embedding backend: model2vec, hashing
        #[arg(long)]
        embedding: Option<String>,

        /// Force a NER variant (turkish, english, multi) instead of routing
        /// by detected language
        #[arg(long)]
        ner_variant: Option<String>,

        /// Skip embedding generation
        #[arg(long)]
        no_embed: bool,
    },

    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Write the default configuration file
    Init,
}

/// Validate that a file has one of the expected extensions
pub fn validate_file_extension(path: &Path, valid_extensions: &[&str]) -> Result<(), String> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .ok_or_else(|| format!("File has no extension: {}", path.display()))?;

    if valid_extensions.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(format!(
            "Invalid file extension '{}'. Expected one of: {}",
            extension,
            valid_extensions.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.pdf"), &["pdf", "docx"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.DOCX"), &["pdf", "docx"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.doc"), &["pdf", "docx"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["pdf"]).is_err());
    }
}
