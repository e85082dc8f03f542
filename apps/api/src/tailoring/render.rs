//! Degradation chain for the downloadable résumé:
//! formatting-preserving rewrite → fallback formatter → plain paragraphs.
//!
//! Each stage returns an explicit outcome; only the last one can surface an
//! error, and it only fails if writing to an in-memory buffer fails. The
//! plain stage writes a bare package of its own (no styles, no numbering,
//! no event writer), so it does not share the formatter's failure modes.

use tracing::{info, warn};

use crate::docx::DocxError;
use crate::tailoring::fallback::{format_from_text, render_plain};
use crate::tailoring::rewriter::rewrite_preserving_format;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fidelity {
    /// Original paragraph and run formatting kept.
    Preserved,
    /// Rebuilt from text with heading/bullet heuristics.
    Reformatted,
    /// One unstyled paragraph per line.
    Plain,
}

impl Fidelity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fidelity::Preserved => "preserved",
            Fidelity::Reformatted => "reformatted",
            Fidelity::Plain => "plain",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedResume {
    pub bytes: Vec<u8>,
    pub fidelity: Fidelity,
}

pub fn render_resume(
    original: Option<&[u8]>,
    original_text: &str,
    tailored_text: &str,
) -> Result<RenderedResume, DocxError> {
    if let Some(original) = original {
        match rewrite_preserving_format(original, original_text, tailored_text) {
            Ok(bytes) => {
                info!("Rendered tailored résumé with original formatting");
                return Ok(RenderedResume {
                    bytes,
                    fidelity: Fidelity::Preserved,
                });
            }
            Err(e) => warn!("Formatting-preserving rewrite failed, reformatting from text: {e}"),
        }
    }

    match format_from_text(tailored_text) {
        Ok(bytes) => Ok(RenderedResume {
            bytes,
            fidelity: Fidelity::Reformatted,
        }),
        Err(e) => {
            warn!("Fallback formatter failed, rendering plain paragraphs: {e}");
            Ok(RenderedResume {
                bytes: render_plain(tailored_text)?,
                fidelity: Fidelity::Plain,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{render_document, Document, Paragraph, STYLE_HEADING_1};

    const TAILORED: &str = "John Doe\nSoftware Developer\nExperience with Python and web development.";

    #[test]
    fn test_valid_original_keeps_formatting() {
        let original = render_document(&Document {
            paragraphs: vec![
                Paragraph::plain("John Doe"),
                Paragraph::plain("Developer"),
            ],
        })
        .unwrap();

        let rendered = render_resume(Some(original.as_slice()), "John Doe\nDeveloper", TAILORED).unwrap();

        assert_eq!(rendered.fidelity, Fidelity::Preserved);
        let doc = Document::from_bytes(&rendered.bytes).unwrap();
        assert_eq!(doc.non_empty_lines(), vec!["John Doe", "Software Developer"]);
    }

    #[test]
    fn test_malformed_original_falls_back_to_formatter() {
        let rendered = render_resume(
            Some(&b"invalid_base64_content_that_should_trigger_fallback"[..]),
            "",
            TAILORED,
        )
        .unwrap();

        assert_eq!(rendered.fidelity, Fidelity::Reformatted);
        let doc = Document::from_bytes(&rendered.bytes).unwrap();
        assert!(doc.non_empty_lines().len() >= 3);
        assert_eq!(doc.paragraphs[1].style.as_deref(), Some(STYLE_HEADING_1));
    }

    #[test]
    fn test_missing_original_uses_formatter() {
        let rendered = render_resume(None, "", TAILORED).unwrap();
        assert_eq!(rendered.fidelity, Fidelity::Reformatted);
    }
}
