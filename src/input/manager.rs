//! Document extraction entry point with per-path caching

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{AnonymizerError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{DocxExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};

/// Routes a document to the extractor for its type and caches raw extracted
/// text per path. The cache holds unnormalized text; accent stripping is the
/// pipeline's job and happens exactly once on top of this output.
pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if self.enable_cache {
            if let Some(cached) = self.cache.get(path) {
                debug!("Extraction cache hit for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(AnonymizerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = FileType::from_path(path)?;
        info!("Extracting {:?} document: {}", file_type, path.display());

        let text = match file_type {
            FileType::Pdf => PdfExtractor.extract(path).await?,
            FileType::Docx => DocxExtractor.extract(path).await?,
            FileType::Text => PlainTextExtractor.extract(path).await?,
        };

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }
        Ok(text)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
