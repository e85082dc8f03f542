//! Formatting-Preserving Rewriter — maps tailored lines back onto the
//! original document's paragraphs without touching paragraph or run styling.
//!
//! Per paragraph (document order, blank paragraphs skipped):
//! 1. best word-overlap line from the full tailored pool (never consumed);
//! 2. else the first line containing one of the paragraph's first three words;
//! 3. else the paragraph is left exactly as it was.
//!
//! A hit clears every run and writes the line into the first run.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::docx::{parse_document_xml, patch_paragraph_text, DocxError, DocxPackage, Document};
use crate::tailoring::extract::flat_lines;
use crate::tailoring::matcher::{best_match, prefix_word_match, LineMatch};

#[derive(Debug, Error)]
pub enum RewriteFailure {
    #[error("original document could not be rewritten: {0}")]
    Docx(#[from] DocxError),

    #[error("tailored text contains no lines")]
    EmptyTailoredText,
}

/// How a paragraph received its new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Overlap,
    PrefixWord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphEdit {
    pub paragraph: usize,
    pub text: String,
    pub kind: MatchKind,
}

/// Chooses the replacement text for every paragraph of `doc` that matches a
/// tailored line. Paragraphs without an edit keep their text.
pub fn plan_edits<S: AsRef<str>>(doc: &Document, tailored_lines: &[S]) -> Vec<ParagraphEdit> {
    doc.paragraphs
        .iter()
        .enumerate()
        .filter_map(|(paragraph, p)| {
            let text = p.text();
            if text.trim().is_empty() {
                return None;
            }
            let (hit, kind): (LineMatch<'_>, MatchKind) =
                match best_match(&text, tailored_lines) {
                    Some(hit) => (hit, MatchKind::Overlap),
                    None => (prefix_word_match(&text, tailored_lines)?, MatchKind::PrefixWord),
                };
            Some(ParagraphEdit {
                paragraph,
                text: hit.line.to_string(),
                kind,
            })
        })
        .collect()
}

/// Rewrites `original` so each paragraph carries its best-matching tailored
/// line, and returns the new `.docx` bytes. `original_text` is the flat text
/// the tailoring was produced from; it only feeds diagnostics.
pub fn rewrite_preserving_format(
    original: &[u8],
    original_text: &str,
    tailored_text: &str,
) -> Result<Vec<u8>, RewriteFailure> {
    let tailored_lines = flat_lines(tailored_text);
    if tailored_lines.is_empty() {
        return Err(RewriteFailure::EmptyTailoredText);
    }

    let mut package = DocxPackage::from_bytes(original)?;
    let document_xml = package.document_xml();
    let doc = parse_document_xml(document_xml)?;
    let edits = plan_edits(&doc, &tailored_lines);

    debug!(
        original_lines = flat_lines(original_text).len(),
        document_lines = doc.non_empty_lines().len(),
        tailored_lines = tailored_lines.len(),
        overlap = edits.iter().filter(|e| e.kind == MatchKind::Overlap).count(),
        prefix_word = edits.iter().filter(|e| e.kind == MatchKind::PrefixWord).count(),
        "Planned paragraph rewrites"
    );

    let edits: BTreeMap<usize, String> = edits.into_iter().map(|e| (e.paragraph, e.text)).collect();
    let patched = patch_paragraph_text(document_xml, &edits)?;
    package.set_document_xml(patched);
    Ok(package.to_bytes()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{render_document, Alignment, Paragraph, Run, RunStyle};

    fn apply_edits(doc: &mut Document, edits: &[ParagraphEdit]) {
        for edit in edits {
            if let Some(p) = doc.paragraphs.get_mut(edit.paragraph) {
                p.replace_text(&edit.text);
            }
        }
    }

    fn style(bold: bool, italic: bool, font: &str, size: u32) -> RunStyle {
        RunStyle {
            bold,
            italic,
            font: Some(font.to_string()),
            size_half_points: Some(size),
        }
    }

    fn original_doc() -> Document {
        Document {
            paragraphs: vec![
                Paragraph {
                    style: Some("Title".to_string()),
                    alignment: Some(Alignment::Center),
                    runs: vec![Run::styled("Jane Doe", style(true, false, "Arial", 36))],
                },
                Paragraph {
                    style: None,
                    alignment: None,
                    runs: vec![
                        Run::styled("Python ", style(false, true, "Calibri", 24)),
                        Run::styled("Developer", style(true, false, "Calibri", 24)),
                    ],
                },
                Paragraph::default(),
                Paragraph {
                    style: Some("ListBullet".to_string()),
                    alignment: None,
                    runs: vec![Run::styled(
                        "5 years experience",
                        style(false, false, "Georgia", 20),
                    )],
                },
                Paragraph {
                    style: Some("Heading1".to_string()),
                    alignment: Some(Alignment::Left),
                    runs: vec![Run::styled("Certifications", style(true, false, "Calibri", 28))],
                },
            ],
        }
    }

    const ORIGINAL_TEXT: &str = "Jane Doe\nPython Developer\n5 years experience\nCertifications";
    const TAILORED: &str = "Jane Doe\n\nSenior Python Developer with cloud skills\n5+ years of professional experience\n";

    fn rewrite(doc: &Document, tailored: &str) -> Document {
        let bytes = render_document(doc).unwrap();
        let out = rewrite_preserving_format(&bytes, ORIGINAL_TEXT, tailored).unwrap();
        Document::from_bytes(&out).unwrap()
    }

    #[test]
    fn test_each_line_takes_its_best_tailored_match() {
        let rewritten = rewrite(&original_doc(), TAILORED);
        assert_eq!(rewritten.paragraphs[0].text(), "Jane Doe");
        assert_eq!(
            rewritten.paragraphs[1].text(),
            "Senior Python Developer with cloud skills"
        );
        assert_eq!(
            rewritten.paragraphs[3].text(),
            "5+ years of professional experience"
        );
    }

    #[test]
    fn test_unmatched_paragraph_is_kept_verbatim() {
        let original = original_doc();
        let rewritten = rewrite(&original, TAILORED);
        assert_eq!(rewritten.paragraphs[4], original.paragraphs[4]);
    }

    #[test]
    fn test_paragraph_count_order_and_styles_are_preserved() {
        let original = original_doc();
        let rewritten = rewrite(&original, TAILORED);

        assert_eq!(rewritten.paragraphs.len(), original.paragraphs.len());
        for (before, after) in original.paragraphs.iter().zip(&rewritten.paragraphs) {
            assert_eq!(before.style, after.style);
            assert_eq!(before.alignment, after.alignment);
            assert_eq!(before.runs.len(), after.runs.len());
            for (rb, ra) in before.runs.iter().zip(&after.runs) {
                assert_eq!(rb.style, ra.style);
            }
        }
    }

    #[test]
    fn test_trailing_runs_are_emptied_not_removed() {
        let rewritten = rewrite(&original_doc(), TAILORED);
        let para = &rewritten.paragraphs[1];
        assert_eq!(para.runs.len(), 2);
        assert_eq!(para.runs[1].text, "");
        assert!(para.runs[1].style.bold);
    }

    #[test]
    fn test_tailored_line_can_be_reused_by_several_paragraphs() {
        let doc = Document {
            paragraphs: vec![
                Paragraph::plain("Rust engineer"),
                Paragraph::plain("Rust mentor"),
            ],
        };
        let rewritten = rewrite(&doc, "Senior Rust engineer");
        assert_eq!(rewritten.paragraphs[0].text(), "Senior Rust engineer");
        assert_eq!(rewritten.paragraphs[1].text(), "Senior Rust engineer");
    }

    #[test]
    fn test_prefix_word_fallback_is_used_when_no_token_is_shared() {
        let doc = Document {
            paragraphs: vec![Paragraph::plain("Cert")],
        };
        let rewritten = rewrite(&doc, "Skills\nCertified Scrum Master");
        assert_eq!(rewritten.paragraphs[0].text(), "Certified Scrum Master");
    }

    #[test]
    fn test_plan_edits_reports_match_kind() {
        let doc = Document {
            paragraphs: vec![
                Paragraph::plain("Jane Doe"),
                Paragraph::plain("Cert"),
                Paragraph::plain("Hobbies"),
            ],
        };
        let edits = plan_edits(&doc, &["Jane A. Doe", "Certified Scrum Master"]);
        assert_eq!(
            edits,
            vec![
                ParagraphEdit {
                    paragraph: 0,
                    text: "Jane A. Doe".to_string(),
                    kind: MatchKind::Overlap,
                },
                ParagraphEdit {
                    paragraph: 1,
                    text: "Certified Scrum Master".to_string(),
                    kind: MatchKind::PrefixWord,
                },
            ]
        );
    }

    #[test]
    fn test_apply_edits_matches_patched_output() {
        let original = original_doc();
        let tailored = flat_lines(TAILORED);
        let mut expected = original.clone();
        apply_edits(&mut expected, &plan_edits(&original, &tailored));

        assert_eq!(rewrite(&original, TAILORED), expected);
    }

    #[test]
    fn test_control_characters_never_reach_the_document() {
        let bytes = render_document(&Document {
            paragraphs: vec![Paragraph::plain("Jane Doe")],
        })
        .unwrap();

        let out =
            rewrite_preserving_format(&bytes, "Jane Doe", "Jane\u{1}Doe Jane\u{b} Doe").unwrap();

        let package = DocxPackage::from_bytes(&out).unwrap();
        assert!(package
            .document_xml()
            .iter()
            .all(|&b| b >= 0x20 || matches!(b, b'\t' | b'\n' | b'\r')));
        let doc = Document::from_bytes(&out).unwrap();
        assert_eq!(doc.paragraphs[0].text(), "JaneDoe Jane Doe");
    }

    #[test]
    fn test_malformed_original_is_a_rewrite_failure() {
        let err = rewrite_preserving_format(b"not a docx", ORIGINAL_TEXT, TAILORED).unwrap_err();
        assert!(matches!(err, RewriteFailure::Docx(_)));
    }

    #[test]
    fn test_blank_tailored_text_is_a_rewrite_failure() {
        let bytes = render_document(&original_doc()).unwrap();
        let err = rewrite_preserving_format(&bytes, ORIGINAL_TEXT, " \n\n").unwrap_err();
        assert!(matches!(err, RewriteFailure::EmptyTailoredText));
    }
}
