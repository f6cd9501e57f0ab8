//! One mix request, from input bytes to a named output document
//!
//! This is the boundary where decode and encode failures surface as
//! [`Error`] values; nothing is written or returned unless every step
//! succeeded.

use std::fmt;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::mix::{MixPlan, MixRequest, Source};
use crate::naming::output_file_name;
use crate::pdf::{decode, encode, DecodedDocument};

/// A supplied input: its display name and raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDocument {
    /// File name as selected by the user, used for naming the output
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputDocument {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read an input from disk, named after its file name
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self { name, bytes })
    }
}

/// Readiness of a job, as shown before mixing starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub first: Option<String>,
    pub second: Option<String>,
    pub reverse_b: bool,
}

impl JobStatus {
    pub fn is_ready(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |n: &Option<String>| n.clone().unwrap_or_else(|| "Not selected".to_string());

        writeln!(f, "{}: {}", Source::A.label(), name(&self.first))?;
        writeln!(f, "{}: {}", Source::B.label(), name(&self.second))?;
        if self.reverse_b {
            writeln!(f, "{} will be reversed", Source::B.label())?;
        } else {
            writeln!(f, "{} normal order", Source::B.label())?;
        }

        if self.is_ready() {
            write!(f, "Ready to mix PDFs")
        } else {
            write!(f, "Please select PDF files")
        }
    }
}

/// The result of a successful mix
#[derive(Debug, Clone)]
pub struct MixOutput {
    /// Suggested file name, see [`output_file_name`]
    pub file_name: String,
    /// The assembled PDF
    pub bytes: Vec<u8>,
    /// Page order the output was built from
    pub plan: MixPlan,
}

/// A single mix request
///
/// The reversal flag travels with the request; nothing about it is kept
/// between runs.
#[derive(Debug, Clone, Default)]
pub struct MixJob {
    pub first: Option<InputDocument>,
    pub second: Option<InputDocument>,
    /// Reverse the page order of the second input before interleaving
    pub reverse_b: bool,
}

impl MixJob {
    pub fn status(&self) -> JobStatus {
        JobStatus {
            first: self.first.as_ref().map(|d| d.name.clone()),
            second: self.second.as_ref().map(|d| d.name.clone()),
            reverse_b: self.reverse_b,
        }
    }

    /// Compute the page order without building the output
    pub fn plan(&self) -> Result<MixPlan> {
        let (a, b) = self.decode_inputs()?;
        Ok(self.request(&a, &b).plan())
    }

    /// Decode, mix and encode
    pub fn run(&self) -> Result<MixOutput> {
        let (first, second) = self.inputs()?;
        let (a, b) = self.decode_inputs()?;

        let plan = self.request(&a, &b).plan();
        info!(
            first = a.pages().count(),
            second = b.pages().count(),
            reverse_b = self.reverse_b,
            "mixing {} pages",
            plan.len()
        );

        let bytes = encode(&plan, &a, &b)?;
        let file_name = output_file_name(&first.name, &second.name, self.reverse_b);
        info!(%file_name, bytes = bytes.len(), "mixed document ready");

        Ok(MixOutput {
            file_name,
            bytes,
            plan,
        })
    }

    fn inputs(&self) -> Result<(&InputDocument, &InputDocument)> {
        match (&self.first, &self.second) {
            (Some(first), Some(second)) => Ok((first, second)),
            (first, second) => {
                let mut missing = Vec::new();
                if first.is_none() {
                    missing.push(Source::A);
                }
                if second.is_none() {
                    missing.push(Source::B);
                }
                Err(Error::MissingInput(missing))
            }
        }
    }

    fn decode_inputs(&self) -> Result<(DecodedDocument, DecodedDocument)> {
        let (first, second) = self.inputs()?;
        let a = decode(Source::A, &first.bytes)?;
        let b = decode(Source::B, &second.bytes)?;
        Ok((a, b))
    }

    fn request(&self, a: &DecodedDocument, b: &DecodedDocument) -> MixRequest {
        MixRequest {
            a: *a.pages(),
            b: *b.pages(),
            reverse_b: self.reverse_b,
        }
    }
}
