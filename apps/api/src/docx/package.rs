//! The `.docx` zip container.
//!
//! Only the main document part is inflated, and only up to a fixed cap.
//! Every other entry (styles, media, headers...) stays compressed and is
//! copied raw into the rewritten package, in the original entry order.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::DocxError;

pub const DOCUMENT_PART: &str = "word/document.xml";

/// Upper bound on the inflated size of `word/document.xml`.
pub const MAX_DOCUMENT_PART_BYTES: u64 = 32 * 1024 * 1024;

/// An opened `.docx` package. Borrows the original bytes; owned by a single
/// operation.
#[derive(Debug, Clone)]
pub struct DocxPackage<'a> {
    source: &'a [u8],
    document_xml: Vec<u8>,
    document_compression: CompressionMethod,
}

impl<'a> DocxPackage<'a> {
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, DocxError> {
        Self::open(bytes, MAX_DOCUMENT_PART_BYTES)
    }

    fn open(bytes: &'a [u8], limit: u64) -> Result<Self, DocxError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let (document_xml, document_compression) = {
            // A zip without a main story is not a word-processing document.
            let file = match archive.by_name(DOCUMENT_PART) {
                Ok(file) => file,
                Err(zip::result::ZipError::FileNotFound) => {
                    return Err(DocxError::MissingPart(DOCUMENT_PART.to_string()))
                }
                Err(e) => return Err(e.into()),
            };
            let compression = file.compression();
            (read_capped(file, DOCUMENT_PART, limit)?, compression)
        };

        Ok(Self {
            source: bytes,
            document_xml,
            document_compression,
        })
    }

    pub fn document_xml(&self) -> &[u8] {
        &self.document_xml
    }

    /// Replaces the main document part, keeping every other part as is.
    pub fn set_document_xml(&mut self, xml: Vec<u8>) {
        self.document_xml = xml;
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        let mut archive = ZipArchive::new(Cursor::new(self.source))?;
        let mut zip = ZipWriter::new(Cursor::new(Vec::with_capacity(self.source.len())));

        for i in 0..archive.len() {
            let file = archive.by_index_raw(i)?;
            if file.name() == DOCUMENT_PART {
                let compression = match self.document_compression {
                    CompressionMethod::Stored => CompressionMethod::Stored,
                    _ => CompressionMethod::Deflated,
                };
                drop(file);
                zip.start_file(
                    DOCUMENT_PART,
                    SimpleFileOptions::default().compression_method(compression),
                )?;
                zip.write_all(&self.document_xml)?;
            } else {
                zip.raw_copy_file(file)?;
            }
        }

        Ok(zip.finish()?.into_inner())
    }

    /// Inflates any part, capped like the main document. Test inspection only.
    #[cfg(test)]
    pub(crate) fn read_part(&self, name: &str) -> Result<Option<Vec<u8>>, DocxError> {
        let mut archive = ZipArchive::new(Cursor::new(self.source))?;
        let file = match archive.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(read_capped(file, name, MAX_DOCUMENT_PART_BYTES)?))
    }
}

/// Reads at most `limit` inflated bytes; the header's claimed size is not trusted.
fn read_capped(file: impl Read, name: &str, limit: u64) -> Result<Vec<u8>, DocxError> {
    let mut data = Vec::new();
    file.take(limit + 1).read_to_end(&mut data)?;
    if data.len() as u64 > limit {
        return Err(DocxError::PartTooLarge {
            part: name.to_string(),
            limit,
        });
    }
    Ok(data)
}

/// Writes a fresh package from `(name, content)` pairs, deflated.
pub fn write_package(parts: &[(&str, &[u8])]) -> Result<Vec<u8>, DocxError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in parts {
        zip.start_file(*name, options)?;
        zip.write_all(data)?;
    }

    Ok(zip.finish()?.into_inner())
}
