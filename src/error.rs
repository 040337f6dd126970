//! Error handling for the resume anonymizer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnonymizerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Language detection error: {0}")]
    Detection(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid entity span [{start}, {end}) for text of {len} chars")]
    InvalidSpan {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnonymizerError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for AnonymizerError {
    fn from(err: anyhow::Error) -> Self {
        AnonymizerError::ModelLoading(err.to_string())
    }
}
