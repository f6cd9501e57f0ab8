//! Assembling a mix plan into a new PDF
//!
//! Both sources are copied into one object space (the second renumbered
//! past the first), then a fresh flat page tree is built whose kids follow
//! the plan. Objects no page refers to are pruned before saving.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, FixedOffset, Local};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::error::{Error, Result};
use crate::mix::{MixPlan, PageHandle, Source};
use crate::pdf::decode::DecodedDocument;

const PRODUCER: &str = concat!("pdf-mixer ", env!("CARGO_PKG_VERSION"));

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `/Parent` chains in malformed files
const MAX_TREE_DEPTH: usize = 64;

/// Build the output PDF for `plan`, stamped with the current local time
pub fn encode(plan: &MixPlan, a: &DecodedDocument, b: &DecodedDocument) -> Result<Vec<u8>> {
    encode_at(plan, a, b, Local::now().fixed_offset())
}

/// Build the output PDF for `plan` with an explicit creation date
///
/// Every handle must resolve to a page of `a` or `b`; otherwise nothing is
/// produced and [`Error::Encode`] is returned.
pub fn encode_at(
    plan: &MixPlan,
    a: &DecodedDocument,
    b: &DecodedDocument,
    created: DateTime<FixedOffset>,
) -> Result<Vec<u8>> {
    let sources = [a, b];

    // Validate every handle before copying anything
    for handle in plan {
        resolve(&sources, *handle)?;
    }

    // Copy both documents into one object space
    let mut max_id = 1;
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut page_ids: Vec<(Source, Vec<ObjectId>)> = Vec::with_capacity(sources.len());

    for decoded in sources {
        let mut doc = decoded.document().clone();
        materialize_inherited_attributes(&mut doc);

        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        page_ids.push((decoded.source(), doc.get_pages().into_values().collect()));
        objects.extend(doc.objects);
    }

    let version = a.document().version.clone().max(b.document().version.clone());
    let mut merged = Document::with_version(version);
    merged.objects.extend(objects);
    merged.max_id = max_id - 1;

    let pages_id = merged.new_object_id();

    let mut placed: HashSet<ObjectId> = HashSet::with_capacity(plan.len());
    let mut kids: Vec<Object> = Vec::with_capacity(plan.len());

    for handle in plan {
        let page_id = page_ids
            .iter()
            .find(|(source, _)| *source == handle.source)
            .and_then(|(_, ids)| ids.get(handle.index).copied())
            .ok_or_else(|| Error::Encode(format!("page {handle} was lost while copying")))?;

        // A page object can only have one parent, so repeats get their own copy
        let page_id = if placed.insert(page_id) {
            page_id
        } else {
            let copy = merged
                .get_object(page_id)
                .map_err(|e| Error::Encode(format!("page {handle}: {e}")))?
                .clone();
            merged.add_object(copy)
        };

        match merged.get_object_mut(page_id) {
            Ok(Object::Dictionary(page)) => page.set("Parent", Object::Reference(pages_id)),
            _ => {
                return Err(Error::Encode(format!(
                    "page {handle} is not a page dictionary"
                )))
            }
        }

        kids.push(Object::Reference(page_id));
    }

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(kids.len() as i64));
    pages.set("Kids", Object::Array(kids));
    merged.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = merged.add_object(catalog);
    merged.trailer.set("Root", Object::Reference(catalog_id));

    let mut info = Dictionary::new();
    info.set("Producer", Object::string_literal(PRODUCER));
    info.set("CreationDate", Object::string_literal(pdf_date(&created)));
    let info_id = merged.add_object(info);
    merged.trailer.set("Info", Object::Reference(info_id));

    let pruned = merged.prune_objects();
    debug!(
        pages = plan.len(),
        pruned = pruned.len(),
        objects = merged.objects.len(),
        "assembled mixed document"
    );

    merged.compress();

    let mut buffer = Vec::new();
    merged
        .save_to(&mut buffer)
        .map_err(|e| Error::Encode(format!("failed to write document: {e}")))?;

    Ok(buffer)
}

/// Find the page object a handle refers to
fn resolve(sources: &[&DecodedDocument], handle: PageHandle) -> Result<ObjectId> {
    let decoded = sources
        .iter()
        .find(|d| d.source() == handle.source)
        .ok_or_else(|| {
            Error::Encode(format!(
                "page {handle} refers to {}, which was not supplied",
                handle.source.label()
            ))
        })?;

    decoded.page_id(handle.index).ok_or_else(|| {
        Error::Encode(format!(
            "page {handle} does not exist ({} has {} pages)",
            handle.source.label(),
            decoded.pages().count()
        ))
    })
}

/// Copy inherited attributes onto every page
///
/// Pages are re-parented under a new tree, so anything they picked up from
/// their old ancestors has to live on the page itself.
fn materialize_inherited_attributes(doc: &mut Document) {
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

    for page_id in page_ids {
        let inherited = inherited_attributes(doc, page_id);
        if inherited.is_empty() {
            continue;
        }

        if let Ok(Object::Dictionary(page)) = doc.get_object_mut(page_id) {
            for (key, value) in inherited {
                page.set(key, value);
            }
        }
    }
}

/// Attributes `page_id` lacks itself but inherits from an ancestor
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };

    let mut missing: Vec<&[u8]> = INHERITABLE
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut found = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let Some(parent_id) = parent else { break };
        if missing.is_empty() {
            break;
        }
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };

        // Nearest ancestor wins
        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                found.push((key.to_vec(), value.clone()));
                false
            }
            Err(_) => true,
        });

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    found
}

/// Format a timestamp as a PDF date string, e.g. `D:20240314092653+01'00'`
fn pdf_date(at: &DateTime<FixedOffset>) -> String {
    let offset = at.offset().local_minus_utc();
    let zone = if offset == 0 {
        "Z".to_string()
    } else {
        let sign = if offset < 0 { '-' } else { '+' };
        let minutes = offset.abs() / 60;
        format!("{sign}{:02}'{:02}'", minutes / 60, minutes % 60)
    };

    format!("{}{zone}", at.format("D:%Y%m%d%H%M%S"))
}
