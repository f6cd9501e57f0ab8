//! Fixture PDFs built in memory with lopdf
//!
//! Every page draws a single text label such as `A3` (prefix plus 1-based
//! page number), so the page order of an output can be read back with
//! [`page_labels`].

#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// How the page tree of a fixture is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One Pages node; every page carries its own MediaBox and Resources
    Flat,
    /// One Pages node holding MediaBox, CropBox, Rotate and Resources for all pages
    Inherited,
    /// Root Pages node with two intermediate nodes splitting the pages;
    /// geometry lives on the root, Resources on the intermediate nodes
    Nested,
}

fn media_box() -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ])
}

fn crop_box() -> Object {
    Object::Array(vec![
        Object::Integer(36),
        Object::Integer(36),
        Object::Integer(576),
        Object::Integer(756),
    ])
}

/// Attributes every page of the inheriting layouts picks up from the root
fn set_inherited_geometry(root: &mut Dictionary) {
    root.set("MediaBox", media_box());
    root.set("CropBox", crop_box());
    root.set("Rotate", Object::Integer(INHERITED_ROTATION));
}

/// Rotation set on the root Pages node of inheriting layouts
pub const INHERITED_ROTATION: i64 = 90;

fn font_resources(doc: &mut Document) -> Object {
    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let fonts = Dictionary::from_iter(vec![("F1", Object::Reference(font_id))]);
    Object::Dictionary(Dictionary::from_iter(vec![("Font", Object::Dictionary(fonts))]))
}

fn add_page(doc: &mut Document, parent: ObjectId, label: &str, own_attributes: Option<&Object>) -> ObjectId {
    let content = format!("BT /F1 24 Tf 72 720 Td ({label}) Tj ET");
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut page = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(parent)),
        ("Contents", Object::Reference(content_id)),
    ]);
    if let Some(resources) = own_attributes {
        page.set("MediaBox", media_box());
        page.set("Resources", resources.clone());
    }
    doc.add_object(page)
}

fn pages_node(kids: &[ObjectId], count: usize) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(count as i64)),
        (
            "Kids",
            Object::Array(kids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ])
}

fn finish(mut doc: Document, pages_id: ObjectId, title: Option<&str>) -> Vec<u8> {
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    if let Some(title) = title {
        let info_id = doc.add_object(Dictionary::from_iter(vec![
            ("Title", Object::string_literal(title)),
            ("Author", Object::string_literal("Fixture Author")),
        ]));
        doc.trailer.set("Info", Object::Reference(info_id));
    }

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("fixture should serialize");
    buffer
}

/// Build a PDF with `count` labelled pages
pub fn build_pdf(prefix: &str, count: usize, layout: Layout, title: Option<&str>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources = font_resources(&mut doc);
    let label = |i: usize| format!("{prefix}{}", i + 1);

    let root = match layout {
        Layout::Flat | Layout::Inherited => {
            let own = (layout == Layout::Flat).then_some(&resources);
            let kids: Vec<ObjectId> = (0..count)
                .map(|i| add_page(&mut doc, pages_id, &label(i), own))
                .collect();

            let mut root = pages_node(&kids, count);
            if layout == Layout::Inherited {
                set_inherited_geometry(&mut root);
                root.set("Resources", resources.clone());
            }
            root
        }
        Layout::Nested => {
            let split = count / 2;
            let mut mids = Vec::new();
            for range in [0..split, split..count] {
                let mid_id = doc.new_object_id();
                let kids: Vec<ObjectId> = range
                    .clone()
                    .map(|i| add_page(&mut doc, mid_id, &label(i), None))
                    .collect();
                let mut mid = pages_node(&kids, kids.len());
                mid.set("Parent", Object::Reference(pages_id));
                mid.set("Resources", resources.clone());
                doc.objects.insert(mid_id, Object::Dictionary(mid));
                mids.push(mid_id);
            }

            let mut root = pages_node(&mids, count);
            set_inherited_geometry(&mut root);
            root
        }
    };

    doc.objects.insert(pages_id, Object::Dictionary(root));
    finish(doc, pages_id, title)
}

/// Flat PDF with `count` pages labelled `{prefix}1..`
pub fn pdf_with_pages(prefix: &str, count: usize) -> Vec<u8> {
    build_pdf(prefix, count, Layout::Flat, None)
}

/// Labels of every page in `bytes`, in page order
pub fn page_labels(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("output should load");
    doc.get_pages()
        .values()
        .map(|&id| {
            let content = doc.get_page_content(id).expect("page should have content");
            let text = String::from_utf8_lossy(&content);
            let start = text.find('(').expect("label start") + 1;
            let end = start + text[start..].find(')').expect("label end");
            text[start..end].to_string()
        })
        .collect()
}

/// Expected labels written as a space separated string
pub fn labels(expected: &str) -> Vec<String> {
    expected.split_whitespace().map(str::to_string).collect()
}
