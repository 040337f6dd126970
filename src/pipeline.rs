//! Pipeline orchestrator
//!
//! Linear run per document, no back edges and no internal retries:
//! extract -> normalize -> detect language -> resolve entities -> filter ->
//! anonymize -> embed. Model handles are constructed once and reused across
//! documents; NER resolvers are cached per variant on first use.

use std::collections::HashMap;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::input::manager::InputManager;
use crate::models::embedding::{create_embedding_generator, EmbeddingGenerator};
use crate::models::language::{create_detector, LanguageDetector};
use crate::models::ner::{create_ner_resolver, variant_for_language, NerResolver, NerVariant};
use crate::processing::anonymizer::anonymize;
use crate::processing::entity::{filter_entities, SkillMatcher};
use crate::processing::normalizer::strip_accents;

#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub source: String,
    pub language: String,
    pub ner_variant: NerVariant,
    pub entities_resolved: usize,
    pub entities_filtered: usize,
    pub anonymized_text: String,
    pub embedding: Option<Vec<f32>>,
}

pub struct Pipeline {
    config: Config,
    input: InputManager,
    detector: Box<dyn LanguageDetector>,
    embedder: Option<Box<dyn EmbeddingGenerator>>,
    skills: SkillMatcher,
    ner_resolvers: HashMap<NerVariant, Box<dyn NerResolver>>,
}

impl Pipeline {
    /// Construct a pipeline with all collaborators, including the embedding
    /// backend. Expensive handles are built here once and reused for every
    /// document this pipeline processes.
    pub fn new(config: Config) -> Result<Self> {
        let embedder = create_embedding_generator(config.models.embedding_backend, &config)?;
        Self::build(config, Some(embedder))
    }

    /// Construct a pipeline that skips the embedding stage entirely. Useful
    /// when only the anonymized text is needed and the embedding model files
    /// may not be present.
    pub fn without_embedder(config: Config) -> Result<Self> {
        Self::build(config, None)
    }

    fn build(config: Config, embedder: Option<Box<dyn EmbeddingGenerator>>) -> Result<Self> {
        let detector = create_detector(
            config.models.lang_detector_backend,
            config.processing.language_sample_chars,
        );
        let skills = SkillMatcher::new(&config.anonymization.skill_terms)?;
        let input = InputManager::new().with_cache(config.processing.enable_extraction_cache);

        Ok(Self {
            config,
            input,
            detector,
            embedder,
            skills,
            ner_resolvers: HashMap::new(),
        })
    }

    /// Process one document end to end. Extraction failure halts the run;
    /// no partial output is produced.
    pub async fn run(&mut self, path: &Path) -> Result<PipelineReport> {
        let raw = self.input.extract_text(path).await?;

        // The one normalized snapshot every span in this run refers to.
        let text = strip_accents(&raw);

        let language = self.detector.detect(&text)?;
        info!("Detected language '{}' for {}", language, path.display());

        let variant = self.select_variant(&language);
        let resolver = self.resolver_for(variant);
        let entities = resolver.resolve(&text)?;
        let entities_resolved = entities.len();

        let filtered = filter_entities(entities, &self.skills);
        let entities_filtered = filtered.len();
        info!(
            "Resolved {} entities, {} kept after skill filtering",
            entities_resolved, entities_filtered
        );

        let anonymized_text = anonymize(&text, &filtered)?;

        let embedding = match &self.embedder {
            Some(embedder) => Some(embedder.generate(&anonymized_text)?),
            None => None,
        };

        Ok(PipelineReport {
            source: path.display().to_string(),
            language,
            ner_variant: variant,
            entities_resolved,
            entities_filtered,
            anonymized_text,
            embedding,
        })
    }

    /// NER variant for a detected language code, honoring the config
    /// override when one is set.
    pub fn select_variant(&self, language: &str) -> NerVariant {
        self.config
            .models
            .ner_variant_override
            .unwrap_or_else(|| variant_for_language(language))
    }

    fn resolver_for(&mut self, variant: NerVariant) -> &dyn NerResolver {
        // Reborrow through the box rather than `.as_ref()`: auto-ref would
        // pick `AsRef` on the `&mut Box` temporary and the returned borrow
        // would not outlive this frame.
        &**self
            .ner_resolvers
            .entry(variant)
            .or_insert_with(|| create_ner_resolver(variant))
    }

    /// Variants for which a resolver handle has been constructed so far.
    pub fn constructed_variants(&self) -> Vec<NerVariant> {
        self.ner_resolvers.keys().copied().collect()
    }
}
