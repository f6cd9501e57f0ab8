//! Decoding PDF bytes into addressable page sequences

use std::collections::HashSet;

use lopdf::{Document, Object, ObjectId};
use tracing::debug;

use crate::error::{Error, Result};
use crate::mix::{PageSequence, Source};
use crate::pdf::metadata::PdfMetadata;

/// A loaded source document and the object ids of its pages
#[derive(Debug, Clone)]
pub struct DecodedDocument {
    document: Document,
    page_ids: Vec<ObjectId>,
    pages: PageSequence,
    metadata: PdfMetadata,
}

impl DecodedDocument {
    /// Pages of this document, tagged with its source
    pub fn pages(&self) -> &PageSequence {
        &self.pages
    }

    pub fn source(&self) -> Source {
        self.pages.source()
    }

    /// Object id of the page at `index` (0-based)
    pub fn page_id(&self, index: usize) -> Option<ObjectId> {
        self.page_ids.get(index).copied()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn metadata(&self) -> &PdfMetadata {
        &self.metadata
    }
}

/// Load `bytes` as the document for `source`
///
/// A well-formed document without pages decodes to an empty sequence. A
/// document whose page tree is missing or has kids that do not resolve to
/// pages is rejected, so the count always matches what the file holds.
pub fn decode(source: Source, bytes: &[u8]) -> Result<DecodedDocument> {
    let malformed = |reason: String| Error::Decode {
        slot: source,
        reason,
    };

    let document = Document::load_mem(bytes).map_err(|e| malformed(e.to_string()))?;
    let leaves = check_page_tree(&document).map_err(malformed)?;

    // get_pages walks nested page trees and is keyed by 1-based page number
    let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
    if page_ids.len() != leaves {
        return Err(malformed(format!(
            "page tree holds {leaves} pages but only {} are reachable",
            page_ids.len()
        )));
    }

    let pages = PageSequence::new(source, page_ids.len());
    let metadata = PdfMetadata::from_document(&document);

    debug!(
        %source,
        pages = pages.count(),
        bytes = bytes.len(),
        version = %document.version,
        "decoded document"
    );

    Ok(DecodedDocument {
        document,
        page_ids,
        pages,
        metadata,
    })
}

/// Walk the page tree from the catalog and count its pages
///
/// Every kid must resolve to a dictionary; nodes with `/Kids` are
/// intermediate, everything else is a page.
fn check_page_tree(doc: &Document) -> std::result::Result<usize, String> {
    let catalog = doc.catalog().map_err(|e| format!("no document catalog: {e}"))?;
    let root_id = catalog
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| "catalog has no /Pages reference".to_string())?;

    let mut pending = vec![root_id];
    let mut visited: HashSet<ObjectId> = HashSet::new();
    let mut leaves = 0;

    while let Some(node_id) = pending.pop() {
        if !visited.insert(node_id) {
            return Err(format!("page tree visits {} {} R twice", node_id.0, node_id.1));
        }

        let node = doc
            .get_dictionary(node_id)
            .map_err(|e| format!("page tree entry {} {} R is unreadable: {e}", node_id.0, node_id.1))?;

        match node.get(b"Kids") {
            Ok(kids) => {
                let kids = kids.as_array().map_err(|_| {
                    format!("pages node {} {} R has malformed /Kids", node_id.0, node_id.1)
                })?;
                for kid in kids {
                    let kid_id = kid
                        .as_reference()
                        .map_err(|_| "page tree kid is not a reference".to_string())?;
                    pending.push(kid_id);
                }
            }
            Err(_) if node_id != root_id => leaves += 1,
            Err(_) => return Err("root pages node has no /Kids".to_string()),
        }
    }

    Ok(leaves)
}
