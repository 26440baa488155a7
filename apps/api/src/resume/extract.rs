//! Text Extractor — recovers plain text from uploaded PDF bytes.
//!
//! Two backends are tried in fixed order: `lopdf` page by page, then
//! `pdf-extract` over the whole document. The extractor never fails: when
//! both backends give up the result is empty text, which callers treat as
//! "no content" rather than an error. Image-only PDFs end up there too; no
//! OCR is attempted.

use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not open document: {0}")]
    Open(String),

    #[error("backend panicked while reading the document")]
    Panicked,
}

/// A single way of turning PDF bytes into text.
pub trait TextBackend: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Primary backend. Walks pages in page-number order and skips pages with no text.
pub struct LopdfBackend;

impl TextBackend for LopdfBackend {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let doc = lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::Open(e.to_string()))?;

        let mut pages = Vec::new();
        // get_pages() is a BTreeMap keyed by page number
        for page_num in doc.get_pages().into_keys() {
            match doc.extract_text(&[page_num]) {
                Ok(text) if !text.trim().is_empty() => pages.push(text.trim_end().to_string()),
                Ok(_) => warn!("No text found on page {page_num}"),
                Err(e) => warn!("No text found on page {page_num}: {e}"),
            }
        }

        Ok(pages.join("\n"))
    }
}

/// Fallback backend. Reads the document in one pass.
pub struct PdfExtractBackend;

impl TextBackend for PdfExtractBackend {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Open(e.to_string()))
    }
}

/// Runs the primary backend and falls back to the secondary one when the
/// primary cannot open the document or finds no text at all.
pub struct TextExtractor {
    primary: Box<dyn TextBackend>,
    fallback: Box<dyn TextBackend>,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(Box::new(LopdfBackend), Box::new(PdfExtractBackend))
    }
}

impl TextExtractor {
    pub fn new(primary: Box<dyn TextBackend>, fallback: Box<dyn TextBackend>) -> Self {
        Self { primary, fallback }
    }

    /// Returns the extracted text, or an empty string when nothing could be read.
    pub fn extract(&self, bytes: &[u8]) -> String {
        match run_backend(self.primary.as_ref(), bytes) {
            Ok(text) if !text.trim().is_empty() => {
                debug!("Extracted {} chars with {}", text.len(), self.primary.name());
                return text;
            }
            Ok(_) => warn!(
                "{} found no text, falling back to {}",
                self.primary.name(),
                self.fallback.name()
            ),
            Err(e) => warn!(
                "{} failed ({e}), falling back to {}",
                self.primary.name(),
                self.fallback.name()
            ),
        }

        match run_backend(self.fallback.as_ref(), bytes) {
            Ok(text) => {
                if text.trim().is_empty() {
                    warn!("{} found no text either", self.fallback.name());
                }
                text
            }
            Err(e) => {
                error!("Both PDF backends failed; last error from {}: {e}", self.fallback.name());
                String::new()
            }
        }
    }
}

/// Both PDF crates can panic on malformed fonts; a panic counts as a failed backend.
fn run_backend(backend: &dyn TextBackend, bytes: &[u8]) -> Result<String, ExtractError> {
    catch_unwind(AssertUnwindSafe(|| backend.extract(bytes))).unwrap_or(Err(ExtractError::Panicked))
}
