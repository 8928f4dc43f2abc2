use std::convert::Infallible;

/// A single token produced by a [`Tokenizer`].
///
/// `token` is the tokenizer's canonical form (e.g. lowercased); `start` and
/// `end` are byte offsets into the original, pre-normalized source such
/// that `source[start..end]` is the token's verbatim text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The canonical (e.g. lowercased, punctuation-stripped) form of the
    /// token, used for rule matching.
    pub token: String,
    /// Byte offset of the token's start in the original source string.
    pub start: usize,
    /// Byte offset of the token's end (exclusive) in the original source
    /// string.
    pub end: usize,
}

/// The tokenizer contract external to this crate (see the engine's external
/// interfaces): split a string into tokens, each carrying a canonical form
/// and a verbatim source span. A tokenizer's own error type is surfaced to
/// callers unchanged.
pub trait Tokenizer {
    /// The tokenizer's own failure type.
    type Error: std::error::Error;

    /// Tokenizes `s`, or fails with this tokenizer's own error type.
    fn tokenize(&self, s: &str) -> Result<Vec<Token>, Self::Error>;
}

/// A minimal default tokenizer: drops ASCII punctuation, splits on
/// whitespace, and lowercases. Provided for convenience; the normalizer and
/// chart parser are generic over any [`Tokenizer`] and never require this
/// one.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleTokenizer;

impl Tokenizer for SimpleTokenizer {
    type Error = Infallible;

    fn tokenize(&self, s: &str) -> Result<Vec<Token>, Infallible> {
        let mut tokens = Vec::new();
        let bytes = s.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            while i < bytes.len() && (bytes[i] as char).is_whitespace() {
                i += 1;
            }
            let word_start = i;
            while i < bytes.len() && !(bytes[i] as char).is_whitespace() {
                i += 1;
            }
            if word_start == i {
                continue;
            }
            let mut start = word_start;
            let mut end = i;
            while start < end && is_ascii_punctuation(bytes[start]) {
                start += 1;
            }
            while end > start && is_ascii_punctuation(bytes[end - 1]) {
                end -= 1;
            }
            if start == end {
                continue;
            }
            tokens.push(Token {
                token: s[start..end].to_ascii_lowercase(),
                start,
                end,
            });
        }
        Ok(tokens)
    }
}

fn is_ascii_punctuation(b: u8) -> bool {
    matches!(b, b'.' | b',' | b'?' | b'!' | b':' | b';' | b'"' | b'\'')
}
