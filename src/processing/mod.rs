//! Text processing: normalization, entity filtering, and anonymization

pub mod anonymizer;
pub mod entity;
pub mod normalizer;
