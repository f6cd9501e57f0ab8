//! PDF Mixer Library
//!
//! Interleaves the pages of two PDF documents into one, optionally
//! reversing the page order of the second document first.
//! This library provides functionality to:
//! - Compute the interleaved page order (`mix`)
//! - Decode PDF bytes into addressable page sequences
//! - Assemble the ordered pages into a new PDF
//! - Name the result and drive the whole flow from one request
//!
//! # Example
//!
//! ```no_run
//! use pdf_mixer::job::{InputDocument, MixJob};
//! use std::path::Path;
//!
//! let job = MixJob {
//!     first: Some(InputDocument::from_path(Path::new("odd.pdf")).unwrap()),
//!     second: Some(InputDocument::from_path(Path::new("even.pdf")).unwrap()),
//!     reverse_b: true,
//! };
//!
//! let output = job.run().expect("Failed to mix PDFs");
//! std::fs::write(&output.file_name, &output.bytes).unwrap();
//! ```

pub mod error;
pub mod job;
pub mod mix;
pub mod naming;
pub mod pdf;

// Re-export commonly used items
pub use error::{Error, Result};
pub use mix::{mix, MixPlan, MixRequest, PageHandle, PageSequence, Source};
