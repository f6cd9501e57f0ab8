//! PDF reading and assembly

pub mod decode;
pub mod encode;
pub mod metadata;

// Re-export commonly used items
pub use decode::{decode, DecodedDocument};
pub use encode::{encode, encode_at};
pub use metadata::{extract_metadata, extract_metadata_from_path, PdfMetadata};
