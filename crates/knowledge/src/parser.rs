//! Corpus document extraction.

use crate::types::Document;
use grounded_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Content type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Pdf,
    PlainText,
    Unsupported,
}

impl ContentType {
    /// Detect content type from file extension, ignoring case.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Self::Pdf,
            Some("txt") => Self::PlainText,
            _ => Self::Unsupported,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::PlainText => "text",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Read a corpus file into a [`Document`].
///
/// Returns `Ok(None)` for extensions the corpus does not support. Any
/// extraction failure is reported as [`AppError::Ingestion`] naming the file.
pub fn extract_document(path: &Path) -> AppResult<Option<Document>> {
    let content_type = ContentType::from_path(path);

    let text = match content_type {
        ContentType::Pdf => extract_pdf(path)?,
        ContentType::PlainText => read_text(path)?,
        ContentType::Unsupported => return Ok(None),
    };

    let id = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| AppError::ingestion(path, "Path has no file name"))?;

    Ok(Some(Document {
        id,
        path: path.to_path_buf(),
        content_type,
        text,
    }))
}

/// Read a `.txt` file as UTF-8.
fn read_text(path: &Path) -> AppResult<String> {
    let bytes = fs::read(path).map_err(|e| AppError::ingestion(path, e.to_string()))?;

    String::from_utf8(bytes)
        .map_err(|e| AppError::ingestion(path, format!("File is not valid UTF-8: {}", e)))
}

/// Extract text from a PDF page by page.
///
/// A page that fails to extract contributes an empty string; only failing to
/// open the document at all is an error.
fn extract_pdf(path: &Path) -> AppResult<String> {
    let mut doc = pdf_oxide::PdfDocument::open(path)
        .map_err(|e| AppError::ingestion(path, format!("Failed to open PDF: {}", e)))?;

    let page_count = doc
        .page_count()
        .map_err(|e| AppError::ingestion(path, format!("Failed to read PDF pages: {}", e)))?;

    let mut pages = Vec::with_capacity(page_count);

    for page_index in 0..page_count {
        match doc.extract_text(page_index) {
            Ok(text) => pages.push(text),
            Err(e) => {
                tracing::warn!(
                    "Failed to extract page {} of {:?}: {}",
                    page_index + 1,
                    path,
                    e
                );
                pages.push(String::new());
            }
        }
    }

    tracing::debug!("Extracted {} pages from {:?}", page_count, path);

    Ok(pages.join("\n"))
}
