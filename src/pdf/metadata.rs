//! PDF metadata extraction

use std::path::Path;
use lopdf::{Document, Object};
use tracing::warn;
use crate::error::{Error, Result};

/// Read the `/Count` entry of the root Pages node
///
/// This is what the file claims; it can disagree with the page tree, so it
/// is reported alongside the walked count rather than trusted.
fn declared_page_count(doc: &Document) -> Option<usize> {
    let catalog_id = doc.trailer.get(b"Root").ok()?.as_reference().ok()?;
    let catalog = doc.get_dictionary(catalog_id).ok()?;
    let pages_id = catalog.get(b"Pages").ok()?.as_reference().ok()?;
    let pages = doc.get_dictionary(pages_id).ok()?;

    match pages.get(b"Count").ok()? {
        Object::Integer(n) => usize::try_from(*n).ok(),
        _ => None,
    }
}

/// Look up a text entry in the document Info dictionary
fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info = match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };

    let bytes = info.get(key).ok()?.as_str().ok()?;
    decode_text_string(bytes).filter(|s| !s.is_empty())
}

/// Decode a PDF text string
///
/// Strings starting with the `FE FF` byte order mark are UTF-16BE; anything
/// else is read as UTF-8, falling back to Latin-1 for the PDFDocEncoding
/// range.
fn decode_text_string(bytes: &[u8]) -> Option<String> {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        if utf16.len() % 2 != 0 {
            return None;
        }
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16(&units).ok();
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Some(text.to_string()),
        Err(_) => Some(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

/// PDF metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfMetadata {
    /// Number of pages found by walking the page tree
    pub page_count: usize,
    /// `/Count` of the root Pages node, if present
    pub declared_page_count: Option<usize>,
    /// Document title (if present)
    pub title: Option<String>,
    /// Document author (if present)
    pub author: Option<String>,
}

impl PdfMetadata {
    /// Collect metadata from an already loaded document
    pub fn from_document(doc: &Document) -> Self {
        let page_count = doc.get_pages().len();
        let declared_page_count = declared_page_count(doc);

        if let Some(declared) = declared_page_count {
            if declared != page_count {
                warn!(declared, found = page_count, "page count in file disagrees with page tree");
            }
        }

        Self {
            page_count,
            declared_page_count,
            title: info_string(doc, b"Title"),
            author: info_string(doc, b"Author"),
        }
    }
}

/// Extract metadata from PDF bytes
pub fn extract_metadata(bytes: &[u8]) -> Result<PdfMetadata> {
    let doc = Document::load_mem(bytes)?;
    Ok(PdfMetadata::from_document(&doc))
}

/// Extract metadata from a PDF file
pub fn extract_metadata_from_path(path: &Path) -> Result<PdfMetadata> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    Ok(PdfMetadata::from_document(&doc))
}
