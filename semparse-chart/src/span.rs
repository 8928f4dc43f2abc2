use std::rc::Rc;

/// A verbatim byte range into a shared copy of the original utterance.
/// Every derivation's `span` is the concatenation of its children's spans,
/// down to the token boundaries a sub-parser or lexical rule first
/// anchored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    source: Rc<str>,
    start: usize,
    end: usize,
}

impl Span {
    pub(crate) fn new(source: Rc<str>, start: usize, end: usize) -> Self {
        Span { source, start, end }
    }

    /// The verbatim source text this span covers.
    pub fn text(&self) -> &str {
        &self.source[self.start..self.end]
    }

    /// Byte offset of this span's start in the original utterance.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset of this span's end (exclusive) in the original utterance.
    pub fn end(&self) -> usize {
        self.end
    }
}
