//! Document ingestion and normalization
//!
//! Converts an uploaded resume file into a content unit the generation
//! backend can consume: PDFs pass through as base64 for backend-side
//! document understanding, Word-processor documents are reduced to plain
//! text via the extractor seam.

pub mod docx;
pub mod mock;

pub use docx::DocxTextExtractor;
pub use mock::MockTextExtractor;

use crate::models::ContentUnit;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOC_MIME: &str = "application/msword";

/// Label prepended to extracted resume text so the backend can tell it apart
/// from conversational text in the same request.
const RESUME_LABEL: &str = "RESUME CONTENT:";

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String>;
}

/// Accepted document categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeKind {
    Pdf,
    Doc,
}

impl MimeKind {
    /// Resolve a declared mime type; anything outside the two accepted
    /// categories is rejected before normalization begins.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        match mime_type {
            PDF_MIME => Some(MimeKind::Pdf),
            DOCX_MIME | DOC_MIME => Some(MimeKind::Doc),
            _ => None,
        }
    }
}

/// A user-selected file, captured once and immutable afterwards.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub struct DocumentNormalizer {
    extractor: Box<dyn TextExtractor>,
}

impl DocumentNormalizer {
    pub fn new(extractor: Box<dyn TextExtractor>) -> Self {
        Self { extractor }
    }

    /// Produce the content unit for one uploaded document.
    ///
    /// Extraction failures surface as `DocumentRead` and are not retried.
    pub async fn normalize(&self, document: &UploadedDocument) -> Result<ContentUnit> {
        let kind = MimeKind::from_mime(&document.mime_type)
            .ok_or_else(|| Error::UnsupportedFormat(document.mime_type.clone()))?;

        match kind {
            MimeKind::Pdf => {
                tracing::debug!(
                    "Passing PDF through as inline data ({} bytes)",
                    document.size_bytes()
                );
                Ok(ContentUnit::Binary {
                    mime_type: document.mime_type.clone(),
                    data: base64::engine::general_purpose::STANDARD.encode(&document.bytes),
                })
            }
            MimeKind::Doc => {
                let text = self.extractor.extract_text(&document.bytes).await?;
                tracing::debug!(
                    "Extracted {} chars of text from {}",
                    text.len(),
                    document.file_name
                );
                Ok(ContentUnit::text(format!("{}\n{}", RESUME_LABEL, text)))
            }
        }
    }
}
