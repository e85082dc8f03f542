//! In-place text replacement on `word/document.xml`.
//!
//! The event stream is copied through unchanged except for the text content
//! of runs in edited paragraphs: every `w:t`/`w:tab`/`w:br`/`w:cr` of those
//! runs is dropped and the new text is written into the first run, minus any
//! characters XML 1.0 forbids. Paragraph and run properties are never touched.

use std::collections::BTreeMap;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::build::xml_safe;
use super::walker::{BodyWalker, Node};
use super::DocxError;

/// Rewrites the text of the given top-level paragraphs (by document index).
pub fn patch_paragraph_text(
    xml: &[u8],
    edits: &BTreeMap<usize, String>,
) -> Result<Vec<u8>, DocxError> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    let mut walker = BodyWalker::default();
    let mut buf = Vec::new();

    // Nesting depth inside a dropped run-content element.
    let mut skipping: Option<usize> = None;
    let mut prefix = String::new();
    let mut saw_run = false;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match &event {
            Event::Eof => break,
            Event::Start(e) => {
                if let Some(depth) = skipping.as_mut() {
                    *depth += 1;
                } else {
                    let node = walker.enter(e.local_name().as_ref());
                    let edit = current_edit(&walker, edits);
                    match node {
                        Node::Content(_) if edit.is_some() => {
                            walker.leave();
                            skipping = Some(0);
                        }
                        Node::Paragraph(_) => {
                            prefix = prefix_of(e);
                            saw_run = false;
                            writer.write_event(event.borrow())?;
                        }
                        Node::Run(_) => {
                            saw_run = true;
                            writer.write_event(event.borrow())?;
                        }
                        _ => writer.write_event(event.borrow())?,
                    }
                }
            }
            Event::Empty(e) => {
                if skipping.is_none() {
                    let node = walker.enter(e.local_name().as_ref());
                    let edit = current_edit(&walker, edits);
                    walker.leave();
                    match (node, edit) {
                        (Node::Content(_), Some(_)) => {}
                        (Node::Run(0), Some(text)) => {
                            saw_run = true;
                            writer.write_event(Event::Start(e.borrow()))?;
                            write_text(&mut writer, &prefix, text)?;
                            writer.write_event(Event::End(e.to_end()))?;
                        }
                        (Node::Paragraph(_), Some(text)) => {
                            let prefix = prefix_of(e);
                            writer.write_event(Event::Start(e.borrow()))?;
                            write_run(&mut writer, &prefix, text)?;
                            writer.write_event(Event::End(e.to_end()))?;
                        }
                        _ => writer.write_event(event.borrow())?,
                    }
                }
            }
            Event::End(_) => match skipping {
                Some(0) => skipping = None,
                Some(depth) => skipping = Some(depth - 1),
                None => {
                    let edit = current_edit(&walker, edits);
                    match (walker.leave(), edit) {
                        (Some(Node::Run(0)), Some(text)) => write_text(&mut writer, &prefix, text)?,
                        (Some(Node::Paragraph(_)), Some(text)) if !saw_run => {
                            write_run(&mut writer, &prefix, text)?
                        }
                        _ => {}
                    }
                    writer.write_event(event.borrow())?;
                }
            },
            _ => {
                if skipping.is_none() {
                    writer.write_event(event.borrow())?;
                }
            }
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

fn current_edit<'a>(walker: &BodyWalker, edits: &'a BTreeMap<usize, String>) -> Option<&'a str> {
    walker
        .paragraph()
        .and_then(|i| edits.get(&i))
        .map(String::as_str)
}

/// Namespace prefix of the paragraph element, including the colon (`"w:"`).
fn prefix_of(e: &BytesStart<'_>) -> String {
    e.name()
        .prefix()
        .map(|p| format!("{}:", String::from_utf8_lossy(p.as_ref())))
        .unwrap_or_default()
}

fn write_text(writer: &mut Writer<Vec<u8>>, prefix: &str, text: &str) -> Result<(), DocxError> {
    let text = xml_safe(text);
    if text.is_empty() {
        return Ok(());
    }
    let tag = format!("{prefix}t");
    writer.write_event(Event::Start(
        BytesStart::new(tag.as_str()).with_attributes([("xml:space", "preserve")]),
    ))?;
    writer.write_event(Event::Text(BytesText::new(&text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
    Ok(())
}

fn write_run(writer: &mut Writer<Vec<u8>>, prefix: &str, text: &str) -> Result<(), DocxError> {
    let tag = format!("{prefix}r");
    writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;
    write_text(writer, prefix, text)?;
    writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
    Ok(())
}
