//! Page interleaving
//!
//! Computes the output page order for two sources without touching any
//! PDF data. The result is a [`MixPlan`] that the encoder later resolves
//! against the decoded documents.

use std::fmt;

/// Which input a page comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    /// The first input ("PDF 1")
    A,
    /// The second input ("PDF 2"), the one that may be reversed
    B,
}

impl Source {
    /// Label shown to the user for this input
    pub fn label(&self) -> &'static str {
        match self {
            Source::A => "PDF 1",
            Source::B => "PDF 2",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::A => f.write_str("A"),
            Source::B => f.write_str("B"),
        }
    }
}

/// Reference to one page of one source, 0-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageHandle {
    pub source: Source,
    pub index: usize,
}

impl PageHandle {
    pub fn new(source: Source, index: usize) -> Self {
        Self { source, index }
    }
}

impl fmt::Display for PageHandle {
    /// Renders 1-based, e.g. `A1` for the first page of source A
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source, self.index + 1)
    }
}

/// The pages of one source document, in original order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSequence {
    source: Source,
    count: usize,
}

impl PageSequence {
    pub fn new(source: Source, count: usize) -> Self {
        Self { source, count }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    /// Number of pages
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Handle for the page at `index`, if it exists
    pub fn handle(&self, index: usize) -> Option<PageHandle> {
        (index < self.count).then(|| PageHandle::new(self.source, index))
    }

    /// All handles in original page order
    pub fn handles(&self) -> impl DoubleEndedIterator<Item = PageHandle> + ExactSizeIterator {
        let source = self.source;
        (0..self.count).map(move |index| PageHandle::new(source, index))
    }
}

/// Output page order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MixPlan {
    pages: Vec<PageHandle>,
}

impl MixPlan {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageHandle> {
        self.pages.iter()
    }

    pub fn as_slice(&self) -> &[PageHandle] {
        &self.pages
    }

    /// The subsequence of handles that come from `source`, in plan order
    pub fn from_source(&self, source: Source) -> Vec<PageHandle> {
        self.pages
            .iter()
            .filter(|h| h.source == source)
            .copied()
            .collect()
    }
}

impl From<Vec<PageHandle>> for MixPlan {
    fn from(pages: Vec<PageHandle>) -> Self {
        Self { pages }
    }
}

impl IntoIterator for MixPlan {
    type Item = PageHandle;
    type IntoIter = std::vec::IntoIter<PageHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.into_iter()
    }
}

impl<'a> IntoIterator for &'a MixPlan {
    type Item = &'a PageHandle;
    type IntoIter = std::slice::Iter<'a, PageHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

impl fmt::Display for MixPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, handle) in self.pages.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{handle}")?;
        }
        Ok(())
    }
}

/// Input to a single mix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixRequest {
    pub a: PageSequence,
    pub b: PageSequence,
    /// Walk B from its last page to its first
    pub reverse_b: bool,
}

impl MixRequest {
    pub fn plan(&self) -> MixPlan {
        mix(&self.a, &self.b, self.reverse_b)
    }
}

/// Interleave `a` and `b` page by page
///
/// At each index `i` the page `a[i]` is emitted (if any) followed by the
/// `i`-th page of B's effective order (if any). Once the shorter source
/// runs out only the longer one contributes, one page per index.
///
/// # Example
///
/// ```
/// use pdf_mixer::{mix, PageSequence, Source};
///
/// let a = PageSequence::new(Source::A, 3);
/// let b = PageSequence::new(Source::B, 3);
///
/// assert_eq!(mix(&a, &b, true).to_string(), "A1 B3 A2 B2 A3 B1");
/// ```
pub fn mix(a: &PageSequence, b: &PageSequence, reverse_b: bool) -> MixPlan {
    let b_order: Vec<PageHandle> = if reverse_b {
        b.handles().rev().collect()
    } else {
        b.handles().collect()
    };

    let mut pages = Vec::with_capacity(a.count() + b.count());
    for i in 0..a.count().max(b.count()) {
        if let Some(page) = a.handle(i) {
            pages.push(page);
        }
        if let Some(&page) = b_order.get(i) {
            pages.push(page);
        }
    }

    MixPlan { pages }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seqs(a: usize, b: usize) -> (PageSequence, PageSequence) {
        (PageSequence::new(Source::A, a), PageSequence::new(Source::B, b))
    }

    fn render(a: usize, b: usize, reverse_b: bool) -> String {
        let (a, b) = seqs(a, b);
        mix(&a, &b, reverse_b).to_string()
    }

    #[test]
    fn test_equal_lengths() {
        assert_eq!(render(3, 3, false), "A1 B1 A2 B2 A3 B3");
    }

    #[test]
    fn test_equal_lengths_reversed() {
        assert_eq!(render(3, 3, true), "A1 B3 A2 B2 A3 B1");
    }

    #[test]
    fn test_second_longer() {
        assert_eq!(render(2, 4, false), "A1 B1 A2 B2 B3 B4");
    }

    #[test]
    fn test_first_longer_reversed() {
        assert_eq!(render(4, 2, true), "A1 B2 A2 B1 A3 A4");
    }

    #[test]
    fn test_only_second_reversed() {
        assert_eq!(render(0, 2, true), "B2 B1");
    }

    #[test]
    fn test_both_empty() {
        let (a, b) = seqs(0, 0);
        assert!(mix(&a, &b, false).is_empty());
        assert!(mix(&a, &b, true).is_empty());
    }

    #[test]
    fn test_only_first() {
        assert_eq!(render(1, 0, false), "A1");
        assert_eq!(render(1, 0, true), "A1");
    }

    #[test]
    fn test_reverse_singleton_is_identity() {
        assert_eq!(render(3, 1, true), render(3, 1, false));
    }

    #[test]
    fn test_from_source_keeps_plan_order() {
        let (a, b) = seqs(2, 3);
        let plan = mix(&a, &b, true);
        let b_pages: Vec<usize> = plan.from_source(Source::B).iter().map(|h| h.index).collect();
        assert_eq!(b_pages, vec![2, 1, 0]);
    }

    #[test]
    fn test_request_plan_matches_mix() {
        let (a, b) = seqs(5, 2);
        let request = MixRequest { a, b, reverse_b: true };
        assert_eq!(request.plan(), mix(&a, &b, true));
    }

    #[test]
    fn test_handle_out_of_range() {
        let seq = PageSequence::new(Source::A, 2);
        assert_eq!(seq.handle(1), Some(PageHandle::new(Source::A, 1)));
        assert_eq!(seq.handle(2), None);
    }
}
