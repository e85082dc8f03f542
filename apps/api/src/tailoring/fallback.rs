//! Fallback Formatter — builds a fresh document from tailored plain text when
//! the original upload is missing or cannot be rewritten.
//!
//! Rule order per line matters and must not change: heading, then bullet,
//! then plain paragraph (with name emphasis for the document's first one).

use thiserror::Error;

use crate::docx::{
    render_document, render_plain_lines, Alignment, DocxError, Document, Paragraph, Run,
    RunStyle, STYLE_HEADING_1, STYLE_LIST_BULLET,
};
use crate::tailoring::extract::flat_lines;

const SECTION_KEYWORDS: [&str; 8] = [
    "experience",
    "education",
    "skills",
    "summary",
    "objective",
    "contact",
    "certifications",
    "projects",
];

const CONTACT_WORDS: [&str; 3] = ["email", "phone", "address"];

const BULLET_MARKERS: [char; 3] = ['•', '-', '*'];

/// Candidate name: bold, 16pt.
const NAME_SIZE_HALF_POINTS: u32 = 32;

#[derive(Debug, Error)]
#[error("fallback document could not be built: {0}")]
pub struct FormatterFailure(#[from] pub DocxError);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading,
    Bullet,
    Plain,
}

pub fn classify_line(line: &str) -> LineKind {
    let lower = line.to_lowercase();
    let word_count = line.split_whitespace().count();

    let keyword_heading = word_count <= 4 && SECTION_KEYWORDS.iter().any(|k| lower.contains(k));
    let shouted = is_upper(line) && line.chars().count() < 50;
    let bare = !line.contains(['.', ',', ';']) && word_count <= 3;

    if keyword_heading || shouted || bare {
        LineKind::Heading
    } else if line.starts_with(BULLET_MARKERS) {
        LineKind::Bullet
    } else {
        LineKind::Plain
    }
}

/// Fully upper-case: at least one cased character and no lower-case ones.
fn is_upper(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}

/// Lays tailored text out as headings, bullets and plain paragraphs.
pub fn layout_from_text(text: &str) -> Document {
    let mut paragraphs = Vec::new();

    for line in flat_lines(text) {
        let line = line.trim();
        let paragraph = match classify_line(line) {
            LineKind::Heading => Paragraph {
                style: Some(STYLE_HEADING_1.to_string()),
                alignment: Some(Alignment::Left),
                runs: vec![Run::plain(line)],
            },
            LineKind::Bullet => Paragraph {
                style: Some(STYLE_LIST_BULLET.to_string()),
                alignment: None,
                runs: vec![Run::plain(line.trim_start_matches(BULLET_MARKERS).trim_start())],
            },
            LineKind::Plain if paragraphs.is_empty() && !mentions_contact(line) => Paragraph {
                style: None,
                alignment: None,
                runs: vec![Run::styled(
                    line,
                    RunStyle {
                        bold: true,
                        size_half_points: Some(NAME_SIZE_HALF_POINTS),
                        ..Default::default()
                    },
                )],
            },
            LineKind::Plain => Paragraph::plain(line),
        };
        paragraphs.push(paragraph);
    }

    Document { paragraphs }
}

fn mentions_contact(line: &str) -> bool {
    let lower = line.to_lowercase();
    CONTACT_WORDS.iter().any(|w| lower.contains(w))
}

/// Formats tailored text into a new styled `.docx`.
pub fn format_from_text(text: &str) -> Result<Vec<u8>, FormatterFailure> {
    Ok(render_document(&layout_from_text(text))?)
}

/// Last resort: one unstyled paragraph per non-empty line, in a bare package
/// that does not depend on the styled document writer.
pub fn render_plain(text: &str) -> Result<Vec<u8>, DocxError> {
    render_plain_lines(&flat_lines(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_caps_line_is_a_heading() {
        assert_eq!(classify_line("EXPERIENCE"), LineKind::Heading);
        assert_eq!(
            classify_line("PROFESSIONAL DEVELOPMENT AND TRAINING, 2019"),
            LineKind::Heading
        );
    }

    #[test]
    fn test_short_keyword_line_is_a_heading() {
        assert_eq!(classify_line("Technical Skills & Tools"), LineKind::Heading);
        assert_eq!(
            classify_line("Relevant work experience, remote."),
            LineKind::Heading
        );
    }

    #[test]
    fn test_short_unpunctuated_line_is_a_heading() {
        // Rule order: three words without punctuation wins over plain text.
        assert_eq!(classify_line("Jane Doe"), LineKind::Heading);
        assert_eq!(classify_line("- Rust"), LineKind::Heading);
    }

    #[test]
    fn test_bullets_need_a_marker() {
        assert_eq!(
            classify_line("• Built a real-time pipeline serving 1M users, daily."),
            LineKind::Bullet
        );
        assert_eq!(
            classify_line("* Reduced deploy time by 70%, using Argo CD."),
            LineKind::Bullet
        );
        assert_eq!(
            classify_line("Built a real-time pipeline serving 1M users, daily."),
            LineKind::Plain
        );
    }

    #[test]
    fn test_layout_renders_headings_and_bullets() {
        let doc = layout_from_text(
            "Jane Doe, Backend Engineer\nEXPERIENCE\n- Shipped the billing service, on time.\n",
        );
        assert_eq!(doc.paragraphs.len(), 3);

        let heading = &doc.paragraphs[1];
        assert_eq!(heading.style.as_deref(), Some(STYLE_HEADING_1));
        assert_eq!(heading.alignment, Some(Alignment::Left));
        assert_eq!(heading.text(), "EXPERIENCE");

        let bullet = &doc.paragraphs[2];
        assert_eq!(bullet.style.as_deref(), Some(STYLE_LIST_BULLET));
        assert_eq!(bullet.text(), "Shipped the billing service, on time.");
    }

    #[test]
    fn test_first_plain_paragraph_is_emphasized_as_name() {
        let doc = layout_from_text("Jane Doe, Backend Engineer\nBuilt things, at scale.");
        let name = &doc.paragraphs[0].runs[0].style;
        assert!(name.bold);
        assert_eq!(name.size_half_points, Some(NAME_SIZE_HALF_POINTS));
        assert_eq!(doc.paragraphs[1].runs[0].style, RunStyle::default());
    }

    #[test]
    fn test_contact_line_is_not_emphasized() {
        let doc = layout_from_text("Email: jane@example.com, Phone: 555-0100\nMore text, here.");
        assert_eq!(doc.paragraphs[0].runs[0].style, RunStyle::default());
    }

    #[test]
    fn test_name_emphasis_only_applies_to_first_paragraph() {
        let doc = layout_from_text("SUMMARY\nJane Doe, Backend Engineer, Berlin.");
        assert_eq!(doc.paragraphs[1].runs[0].style, RunStyle::default());
    }

    #[test]
    fn test_formatter_output_is_a_valid_document() {
        let bytes = format_from_text("EXPERIENCE\nLed the platform team, 2019-2024.").unwrap();
        let doc = Document::from_bytes(&bytes).unwrap();
        assert_eq!(
            doc.non_empty_lines(),
            vec!["EXPERIENCE", "Led the platform team, 2019-2024."]
        );
    }

    #[test]
    fn test_formatter_handles_single_line_input() {
        let bytes = format_from_text("Jane").unwrap();
        let doc = Document::from_bytes(&bytes).unwrap();
        assert_eq!(doc.paragraphs.len(), 1);
    }

    #[test]
    fn test_formatter_handles_thousands_of_lines() {
        let text: String = (0..5000)
            .map(|i| format!("• Delivered project number {i}, on schedule.\n"))
            .collect();
        let bytes = format_from_text(&text).unwrap();
        let doc = Document::from_bytes(&bytes).unwrap();
        assert_eq!(doc.paragraphs.len(), 5000);
    }

    #[test]
    fn test_formatter_survives_control_characters() {
        let bytes = format_from_text("Jane\u{1}Doe\nSKILLS").unwrap();
        let doc = Document::from_bytes(&bytes).unwrap();
        assert_eq!(doc.non_empty_lines(), vec!["JaneDoe", "SKILLS"]);
    }

    #[test]
    fn test_render_plain_writes_one_unstyled_paragraph_per_line() {
        let bytes = render_plain("EXPERIENCE\n\n• Rust").unwrap();
        let doc = Document::from_bytes(&bytes).unwrap();
        assert_eq!(doc.paragraphs.len(), 2);
        assert!(doc.paragraphs.iter().all(|p| p.style.is_none()));
        assert_eq!(doc.paragraphs[1].text(), "• Rust");
    }
}
