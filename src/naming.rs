//! Output file naming

use std::path::Path;

const FALLBACK_STEM: &str = "document";

/// Name for the mixed document
///
/// Produces `{first}_mixed_{second}.pdf`, with `_reversed` appended to the
/// stem when the second input was reversed. Only the file stem of each name
/// is used, so directories and extensions are dropped.
///
/// # Example
///
/// ```
/// use pdf_mixer::naming::output_file_name;
///
/// assert_eq!(
///     output_file_name("scans/odd.pdf", "even.pdf", true),
///     "odd_mixed_even_reversed.pdf"
/// );
/// ```
pub fn output_file_name(first: &str, second: &str, reverse_b: bool) -> String {
    let suffix = if reverse_b { "_reversed" } else { "" };
    format!("{}_mixed_{}{}.pdf", stem(first), stem(second), suffix)
}

fn stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_STEM)
}
