//! Error types for the PDF mixer

use std::path::PathBuf;
use thiserror::Error;

use crate::mix::Source;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF mixer
///
/// The `Display` output of each variant is the message shown to the user.
#[derive(Error, Debug)]
pub enum Error {
    /// One or both inputs were not supplied; nothing was attempted
    #[error("Please select both PDF files (missing: {})", labels(.0))]
    MissingInput(Vec<Source>),

    /// Input bytes are not a readable PDF, or its page tree is broken
    #[error("Could not read {}: {reason}", .slot.label())]
    Decode { slot: Source, reason: String },

    /// The output document could not be assembled
    #[error("Could not assemble mixed PDF: {0}")]
    Encode(String),

    /// PDF processing error outside decode/encode
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

fn labels(sources: &[Source]) -> String {
    sources
        .iter()
        .map(|s| s.label())
        .collect::<Vec<_>>()
        .join(", ")
}
