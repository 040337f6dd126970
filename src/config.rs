//! Configuration management for the resume anonymizer

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AnonymizerError, Result};
use crate::models::embedding::EmbeddingBackend;
use crate::models::language::DetectorBackend;
use crate::models::ner::NerVariant;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub processing: ProcessingConfig,
    pub anonymization: AnonymizationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub lang_detector_backend: DetectorBackend,
    pub embedding_backend: EmbeddingBackend,
    /// Local directory holding the Model2Vec files (tokenizer.json,
    /// model.safetensors, config.json). Only used by the model2vec backend.
    pub embedding_model_dir: PathBuf,
    /// Force a NER variant instead of routing by detected language.
    pub ner_variant_override: Option<NerVariant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Prefix length handed to the language detector, for cost control.
    pub language_sample_chars: usize,
    pub enable_extraction_cache: bool,
    /// Vector size of the hashing embedding backend.
    pub hashing_dims: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Skill/acronym terms that suppress false-positive ORG entities.
    pub skill_terms: Vec<String>,
}

/// Skill vocabulary carried over from the production rule set.
pub const DEFAULT_SKILL_TERMS: &[&str] = &[
    "SQL",
    "AI",
    "AML & KYC",
    "ET",
    "LowCode",
    "NoCode",
    "Computer Engineering",
    "Low",
];

impl Default for Config {
    fn default() -> Self {
        let model_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-anonymizer")
            .join("models")
            .join("m2v-base");

        Self {
            models: ModelConfig {
                lang_detector_backend: DetectorBackend::Model,
                embedding_backend: EmbeddingBackend::Hashing,
                embedding_model_dir: model_dir,
                ner_variant_override: None,
            },
            processing: ProcessingConfig {
                language_sample_chars: 2000,
                enable_extraction_cache: true,
                hashing_dims: 256,
            },
            anonymization: AnonymizationConfig {
                skill_terms: DEFAULT_SKILL_TERMS.iter().map(|s| s.to_string()).collect(),
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            AnonymizerError::Configuration(format!("Failed to parse config: {}", e))
        })
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            AnonymizerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-anonymizer")
            .join("config.toml")
    }
}
