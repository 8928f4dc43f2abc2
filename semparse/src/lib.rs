//! A domain-general semantic parsing engine.
//!
//! An application supplies a grammar (production rules with attached
//! semantic functions), a tokenizer, and optionally pluggable sub-parsers;
//! this crate normalizes the grammar, chart-parses an utterance against it,
//! and ranks the resulting derivations. This facade re-exports the six
//! crates that do the actual work, the way [`cfg`]'s root crate re-exports
//! `cfg-symbol`/`cfg-grammar`/`cfg-earley`/etc. under short module names.
//!
//! [`cfg`]: https://docs.rs/cfg
//!
//! - [`symbol`] — terminal / non-terminal / optional classification (§4.A).
//! - [`rule`] — the author-level [`rule::Rule`] and its predicates (§4.B).
//! - [`grammar`] — [`grammar::GrammarBuilder`], rewriting author rules into
//!   normalized lexical/unary/binary tables (§4.C).
//! - [`chart`] — [`chart::parse`]/[`chart::parse_with_roots`], the bottom-up
//!   CYK chart parser (§4.D).
//! - [`feature`] — featurizers mapping a derivation to a sparse feature map
//!   (§4.E).
//! - [`rank`] — [`rank::ConstantRanker`], [`rank::LinearRanker`], and
//!   [`rank::SoftmaxRanker`] (§4.F).
//!
//! The most frequently used types are re-exported at the crate root so a
//! typical host application only needs one `use semparse::*;`.

pub use semparse_symbol as symbol;

pub use semparse_rule as rule;
pub use semparse_rule::{Denotation, EvaluationError, InvalidRule, Rule, RuleBuilder, Semantics};

pub use semparse_grammar as grammar;
pub use semparse_grammar::{
    lexical_key, GrammarBuilder, InvalidGrammar, NormalizedGrammar, SimpleTokenizer, Token,
    Tokenizer, BINARIZATION_SEPARATOR, KEY_SEPARATOR, SYNTHETIC_TERMINAL_PREFIX,
};

pub use semparse_chart as chart;
pub use semparse_chart::{
    parse, parse_with_roots, Chart, Derivation, Span, SubParser, SubParserMatch,
    TokenizationError,
};

pub use semparse_feature as feature;
pub use semparse_feature::{Concat, FeatureMap, Featurizer, ParseCounts, ParseDepths, ParseLengths, ParsePrecedence};

pub use semparse_rank as rank;
pub use semparse_rank::{
    ConstantRanker, LengthMismatch, LinearRanker, ParsingContext, RankError, Ranker,
    SoftmaxRanker, TrainingState,
};
