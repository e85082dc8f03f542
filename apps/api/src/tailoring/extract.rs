//! Document Text Extractor — flattens an uploaded résumé into plain lines.

use bytes::Bytes;
use thiserror::Error;

use crate::docx::{DocxError, Document};

#[derive(Debug, Error)]
#[error("Error reading DOCX file: {0}")]
pub struct DocumentParseError(#[from] pub DocxError);

/// Plain text of an uploaded résumé plus the untouched original bytes.
#[derive(Debug, Clone)]
pub struct ExtractedResume {
    /// Non-empty paragraph texts joined by `\n`.
    pub text: String,
    pub original: Bytes,
}

pub fn extract_resume(bytes: Bytes) -> Result<ExtractedResume, DocumentParseError> {
    let doc = Document::from_bytes(&bytes)?;
    Ok(ExtractedResume {
        text: doc.non_empty_lines().join("\n"),
        original: bytes,
    })
}

/// Splits text into FlatLines: one per line break, blank lines dropped.
pub fn flat_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|l| !l.trim().is_empty()).collect()
}
