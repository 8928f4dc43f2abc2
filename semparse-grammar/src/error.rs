use std::fmt;

/// A rule could not be normalized into lexical, unary, or binary form.
#[derive(Debug, Clone)]
pub enum InvalidGrammar {
    /// A rule's rhs, after stripping optionals and lifting terminals, was
    /// neither lexical, unary, nor binary. This should be unreachable for
    /// well-formed input rules; it signals a normalizer invariant
    /// violation.
    UnrecognizedShape {
        /// The offending rule's tag.
        tag: String,
        /// The offending rule's rhs, at the point normalization gave up.
        rhs: Vec<String>,
    },
    /// An rhs symbol was neither a terminal nor a non-terminal after
    /// stripping any optional marker (this cannot currently happen given
    /// the symbol classifier's total terminal/non-terminal split, but is
    /// retained as a named failure mode per the engine's error design).
    UnrecognizedSymbol {
        /// The offending symbol.
        symbol: String,
    },
    /// The configured tokenizer failed while canonicalizing a rule's
    /// literal terminal word during normalization.
    Tokenization {
        /// The terminal word that failed to tokenize.
        word: String,
        /// The tokenizer's error, rendered to a string.
        reason: String,
    },
}

impl fmt::Display for InvalidGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidGrammar::UnrecognizedShape { tag, rhs } => {
                write!(
                    f,
                    "rule '{tag}' could not be normalized: rhs {rhs:?} is neither lexical, unary, nor binary"
                )
            }
            InvalidGrammar::UnrecognizedSymbol { symbol } => {
                write!(f, "symbol '{symbol}' is neither terminal nor non-terminal")
            }
            InvalidGrammar::Tokenization { word, reason } => {
                write!(f, "failed to tokenize terminal '{word}': {reason}")
            }
        }
    }
}

impl std::error::Error for InvalidGrammar {}
