//! Embedding generation backends

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::str::FromStr;

use log::info;
use model2vec_rs::model::StaticModel;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::Config;
use crate::error::{AnonymizerError, Result};

pub trait EmbeddingGenerator: Send + Sync {
    /// Generate a feature vector for `text`. Dimensionality is backend
    /// dependent and opaque to the pipeline.
    fn generate(&self, text: &str) -> Result<Vec<f32>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Model2Vec static embeddings loaded from a local model directory.
    Model2Vec,
    /// Feature-hashed token frequencies; no model files required.
    Hashing,
}

impl FromStr for EmbeddingBackend {
    type Err = AnonymizerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "model2vec" => Ok(EmbeddingBackend::Model2Vec),
            "hashing" => Ok(EmbeddingBackend::Hashing),
            other => Err(AnonymizerError::Configuration(format!(
                "Unknown embedding backend: '{}' (expected 'model2vec' or 'hashing')",
                other
            ))),
        }
    }
}

pub fn create_embedding_generator(
    backend: EmbeddingBackend,
    config: &Config,
) -> Result<Box<dyn EmbeddingGenerator>> {
    match backend {
        EmbeddingBackend::Model2Vec => Ok(Box::new(Model2VecEmbedder::new(
            &config.models.embedding_model_dir,
        )?)),
        EmbeddingBackend::Hashing => Ok(Box::new(HashingEmbedder::new(
            config.processing.hashing_dims,
        ))),
    }
}

pub struct Model2VecEmbedder {
    model: StaticModel,
}

impl Model2VecEmbedder {
    pub fn new(model_path: &Path) -> Result<Self> {
        info!("Loading Model2Vec embedding model from: {}", model_path.display());
        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| AnonymizerError::ModelLoading(format!("Failed to load model: {}", e)))?;
        Ok(Self { model })
    }
}

impl EmbeddingGenerator for Model2VecEmbedder {
    fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.model.encode_single(text);
        if embedding.is_empty() {
            return Err(AnonymizerError::Embedding(
                "Model returned an empty embedding".to_string(),
            ));
        }
        Ok(embedding)
    }
}

/// Feature hashing over lowercased word tokens, L2-normalized. Deterministic
/// and dependency-free on model files, which keeps pipeline tests and
/// offline runs cheap.
pub struct HashingEmbedder {
    dims: usize,
}

impl HashingEmbedder {
    pub fn new(dims: usize) -> Self {
        Self { dims: dims.max(1) }
    }
}

impl EmbeddingGenerator for HashingEmbedder {
    fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dims];
        for word in text.unicode_words() {
            let token = word.to_lowercase();
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() % self.dims as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!(
            "model2vec".parse::<EmbeddingBackend>().unwrap(),
            EmbeddingBackend::Model2Vec
        );
        assert_eq!(
            "hashing".parse::<EmbeddingBackend>().unwrap(),
            EmbeddingBackend::Hashing
        );
    }

    #[test]
    fn test_unknown_backend_is_configuration_error() {
        let err = "sentence-transformers".parse::<EmbeddingBackend>().unwrap_err();
        assert!(matches!(err, AnonymizerError::Configuration(_)));
    }

    #[test]
    fn test_hashing_embedder_shape_and_norm() {
        let embedder = HashingEmbedder::new(256);
        let vector = embedder.generate("worked on payment systems").unwrap();
        assert_eq!(vector.len(), 256);
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hashing_embedder_deterministic() {
        let embedder = HashingEmbedder::new(128);
        let a = embedder.generate("backend engineer, five years").unwrap();
        let b = embedder.generate("backend engineer, five years").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_hashing_embedder_empty_text() {
        let embedder = HashingEmbedder::new(64);
        let vector = embedder.generate("").unwrap();
        assert_eq!(vector.len(), 64);
        assert!(vector.iter().all(|v| *v == 0.0));
    }
}
