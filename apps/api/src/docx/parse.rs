use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::walker::{BodyWalker, Content, Node};
use super::{Alignment, DocxError, Document, Paragraph, Run};

/// Parses `word/document.xml` into the paragraph/run model.
pub fn parse_document_xml(xml: &[u8]) -> Result<Document, DocxError> {
    let mut reader = Reader::from_reader(xml);
    let mut walker = BodyWalker::default();
    let mut paragraphs: Vec<Paragraph> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let parent = walker.parent();
                let node = walker.enter(e.local_name().as_ref());
                open_element(&mut paragraphs, parent, node, e)?;
            }
            Event::Empty(ref e) => {
                let parent = walker.parent();
                let node = walker.enter(e.local_name().as_ref());
                open_element(&mut paragraphs, parent, node, e)?;
                walker.leave();
            }
            Event::End(_) => {
                walker.leave();
            }
            Event::Text(ref e) if walker.in_text() => {
                push_run_text(&mut paragraphs, &e.unescape()?);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(Document { paragraphs })
}

fn open_element(
    paragraphs: &mut Vec<Paragraph>,
    parent: Option<Node>,
    node: Node,
    e: &BytesStart<'_>,
) -> Result<(), DocxError> {
    match node {
        Node::Paragraph(_) => paragraphs.push(Paragraph::default()),
        Node::Run(_) => {
            if let Some(p) = paragraphs.last_mut() {
                p.runs.push(Run::default());
            }
        }
        Node::Content(Content::Tab) => push_run_text(paragraphs, "\t"),
        Node::Content(Content::Break) => push_run_text(paragraphs, "\n"),
        Node::Other if parent == Some(Node::ParagraphProps) => {
            let Some(p) = paragraphs.last_mut() else {
                return Ok(());
            };
            match e.local_name().as_ref() {
                b"pStyle" => p.style = attr_value(e, b"val")?,
                b"jc" => {
                    p.alignment = attr_value(e, b"val")?
                        .as_deref()
                        .and_then(Alignment::from_ooxml)
                }
                _ => {}
            }
        }
        Node::Other if parent == Some(Node::RunProps) => {
            let Some(run) = paragraphs.last_mut().and_then(|p| p.runs.last_mut()) else {
                return Ok(());
            };
            match e.local_name().as_ref() {
                b"b" => run.style.bold = toggle_on(e)?,
                b"i" => run.style.italic = toggle_on(e)?,
                b"rFonts" => {
                    run.style.font = match attr_value(e, b"ascii")? {
                        Some(font) => Some(font),
                        None => attr_value(e, b"hAnsi")?,
                    }
                }
                b"sz" => {
                    run.style.size_half_points =
                        attr_value(e, b"val")?.and_then(|v| v.parse().ok())
                }
                _ => {}
            }
        }
        _ => {}
    }
    Ok(())
}

fn push_run_text(paragraphs: &mut [Paragraph], text: &str) {
    if let Some(run) = paragraphs.last_mut().and_then(|p| p.runs.last_mut()) {
        run.text.push_str(text);
    }
}

/// Reads an attribute by local name, ignoring its namespace prefix.
fn attr_value(e: &BytesStart<'_>, local: &[u8]) -> Result<Option<String>, DocxError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == local {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// OOXML on/off properties: present means on unless `w:val` says otherwise.
fn toggle_on(e: &BytesStart<'_>) -> Result<bool, DocxError> {
    Ok(!matches!(
        attr_value(e, b"val")?.as_deref(),
        Some("0" | "false" | "off")
    ))
}
