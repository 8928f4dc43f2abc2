//! Bottom-up CYK chart parsing over a [`semparse_grammar::NormalizedGrammar`],
//! integrating pluggable sub-parsers and producing a forest of derivations.

mod chart;
mod derivation;
mod error;
mod span;
mod subparser;

pub use chart::{parse, parse_with_roots, Chart};
pub use derivation::Derivation;
pub use error::TokenizationError;
pub use span::Span;
pub use subparser::{SubParser, SubParserMatch};

pub use semparse_grammar::{SimpleTokenizer, Token, Tokenizer};
