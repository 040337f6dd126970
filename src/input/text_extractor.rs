//! Text extraction from various file formats

use std::path::Path;

use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild};
use log::{debug, warn};
use tokio::fs;

use crate::error::{AnonymizerError, Result};

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(AnonymizerError::Io)?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            AnonymizerError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                path.display(),
                e
            ))
        })?;

        let text = text.trim().to_string();
        if text.is_empty() {
            // Scanned documents carry no text layer; without an OCR engine
            // the document cannot be processed.
            return Err(AnonymizerError::PdfExtraction(format!(
                "No extractable text in '{}' (scanned PDF and no OCR engine available)",
                path.display()
            )));
        }
        Ok(text)
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(AnonymizerError::Io)?;

        let docx = read_docx(&bytes).map_err(|e| {
            AnonymizerError::DocxExtraction(format!(
                "Failed to parse DOCX '{}': {:?}",
                path.display(),
                e
            ))
        })?;

        let mut blocks: Vec<String> = Vec::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(paragraph) => {
                    let text = paragraph_text(paragraph);
                    if !text.trim().is_empty() {
                        blocks.push(text);
                    }
                }
                DocumentChild::Table(table) => {
                    blocks.extend(table_rows(table));
                }
                _ => {}
            }
        }

        if blocks.is_empty() {
            warn!("DOCX '{}' contained no paragraph or table text", path.display());
        }
        debug!("Extracted {} text blocks from '{}'", blocks.len(), path.display());
        Ok(blocks.join("\n").trim().to_string())
    }
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut parts = Vec::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(text) = run_child {
                    parts.push(text.text.clone());
                }
            }
        }
    }
    parts.concat()
}

/// Flatten table rows into one line per row, cells separated by tabs.
fn table_rows(table: &docx_rs::Table) -> Vec<String> {
    let mut rows = Vec::new();
    for row in &table.rows {
        let TableChild::TableRow(row) = row;
        let mut cells: Vec<String> = Vec::new();
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell;
            let mut cell_parts = Vec::new();
            for content in &cell.children {
                if let TableCellContent::Paragraph(paragraph) = content {
                    let text = paragraph_text(paragraph);
                    if !text.trim().is_empty() {
                        cell_parts.push(text);
                    }
                }
            }
            cells.push(cell_parts.join(" "));
        }
        let line = cells.join("\t");
        if !line.trim().is_empty() {
            rows.push(line);
        }
    }
    rows
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await.map_err(AnonymizerError::Io)?;
        Ok(content.trim().to_string())
    }
}
