//! File type detection

use std::path::Path;

use crate::error::{AnonymizerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
    Text,
}

impl FileType {
    /// Detect the document type from a path's extension. An unrecognized or
    /// missing extension is a configuration-class error raised before any
    /// extraction work starts.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .ok_or_else(|| {
                AnonymizerError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        match extension.as_str() {
            "pdf" => Ok(FileType::Pdf),
            "docx" => Ok(FileType::Docx),
            "txt" => Ok(FileType::Text),
            other => Err(AnonymizerError::UnsupportedFormat(format!(
                "Unsupported extension '.{}' for: {}",
                other,
                path.display()
            ))),
        }
    }
}
