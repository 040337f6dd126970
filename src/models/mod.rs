//! Model collaborators: language detection, NER, and embeddings
//!
//! Each collaborator is a narrow trait with a closed set of backends chosen
//! through an enum-keyed factory. Unknown backend keys fail at parse time
//! with a configuration error; nothing silently falls back to a default.

pub mod embedding;
pub mod language;
pub mod ner;

pub use embedding::{create_embedding_generator, EmbeddingBackend, EmbeddingGenerator};
pub use language::{create_detector, DetectorBackend, LanguageDetector};
pub use ner::{create_ner_resolver, variant_for_language, NerResolver, NerVariant};
