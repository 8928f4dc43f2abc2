use std::fmt;

/// A tokenizer failed during `parse`. Wraps the tokenizer's own error
/// unchanged (available via [`std::error::Error::source`]) so that callers
/// configuring different tokenizers still get a single named error kind
/// from this crate, per the engine's error design.
#[derive(Debug)]
pub struct TokenizationError<E>(pub E);

impl<E: fmt::Display> fmt::Display for TokenizationError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tokenization failed: {}", self.0)
    }
}

impl<E: std::error::Error + 'static> std::error::Error for TokenizationError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}
