//! Word-processing documents (`.docx`) as a three-level model:
//! `Document` → `Paragraph` → `Run`.
//!
//! Only the main story (`word/document.xml`, top-level body paragraphs) is
//! modelled. Everything else in the package is carried through untouched.

pub mod build;
pub mod package;
pub mod parse;
pub mod patch;
mod walker;

use thiserror::Error;

pub use build::{render_document, render_plain_lines};
pub use package::DocxPackage;
pub use parse::parse_document_xml;
pub use patch::patch_paragraph_text;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Style id of the level-1 heading paragraph style.
pub const STYLE_HEADING_1: &str = "Heading1";
/// Style id of the bulleted list paragraph style.
pub const STYLE_LIST_BULLET: &str = "ListBullet";

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("Invalid document container: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document is missing required part '{0}'")]
    MissingPart(String),

    #[error("Document part '{part}' inflates beyond {limit} bytes")]
    PartTooLarge { part: String, limit: u64 },
}

impl From<quick_xml::events::attributes::AttrError> for DocxError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        DocxError::Xml(e.into())
    }
}

/// Paragraph alignment (`w:jc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn from_ooxml(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "both" | "distribute" => Some(Alignment::Justify),
            _ => None,
        }
    }

    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}

/// Character formatting of a run (`w:rPr`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub font: Option<String>,
    /// OOXML sizes are stored in half-points (`w:sz w:val="24"` is 12pt).
    pub size_half_points: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub style: RunStyle,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    /// Paragraph style id (`w:pStyle`), `None` for the document default.
    pub style: Option<String>,
    pub alignment: Option<Alignment>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::plain(text)],
            ..Default::default()
        }
    }

    /// Aggregate text: the concatenation of all run texts.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Clears every run and writes `text` into the first one; the model-level
    /// counterpart of `patch_paragraph_text`.
    #[cfg(test)]
    pub fn replace_text(&mut self, text: &str) {
        for run in &mut self.runs {
            run.text.clear();
        }
        match self.runs.first_mut() {
            Some(first) => first.text.push_str(text),
            None => self.runs.push(Run::plain(text)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    /// Loads the paragraph model from raw `.docx` bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        let package = DocxPackage::from_bytes(bytes)?;
        parse_document_xml(package.document_xml())
    }

    /// Texts of paragraphs that are non-empty after trimming, in order.
    pub fn non_empty_lines(&self) -> Vec<String> {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .filter(|t| !t.trim().is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_text_clears_trailing_runs_and_keeps_styles() {
        let bold = RunStyle {
            bold: true,
            ..Default::default()
        };
        let mut para = Paragraph {
            style: Some("Heading1".to_string()),
            alignment: Some(Alignment::Center),
            runs: vec![Run::styled("Senior ", bold.clone()), Run::plain("Engineer")],
        };

        para.replace_text("Staff Engineer");

        assert_eq!(para.text(), "Staff Engineer");
        assert_eq!(para.runs.len(), 2);
        assert_eq!(para.runs[0].style, bold);
        assert!(para.runs[1].text.is_empty());
    }

    #[test]
    fn test_replace_text_on_empty_paragraph_adds_run() {
        let mut para = Paragraph::default();
        para.replace_text("Hello");
        assert_eq!(para.runs.len(), 1);
        assert_eq!(para.text(), "Hello");
    }

    #[test]
    fn test_alignment_round_trips_ooxml_values() {
        assert_eq!(Alignment::from_ooxml("both"), Some(Alignment::Justify));
        assert_eq!(Alignment::from_ooxml("start"), Some(Alignment::Left));
        assert_eq!(Alignment::Center.as_ooxml(), "center");
        assert_eq!(Alignment::from_ooxml("mediumKashida"), None);
    }
}
