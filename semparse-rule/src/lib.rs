//! Author-level production rules.
//!
//! A [`Rule`] pairs a left-hand side, a right-hand side, and a semantic
//! function mapping the denotations of its right-hand-side children (in
//! order) to the rule's own denotation. Rules are immutable once
//! constructed; [`RuleBuilder`] validates the preconditions from the
//! construction of a rule and reports them as [`InvalidRule`].

mod builder;
mod denotation;
mod error;

pub use builder::RuleBuilder;
pub use denotation::Denotation;
pub use error::{EvaluationError, InvalidRule};

use std::fmt;
use std::rc::Rc;

/// A pure function from a rule's children's denotations to the rule's own
/// denotation. May fail; failures are deferred until a derivation's
/// denotation is actually requested (see `semparse-chart::Derivation`).
pub type Semantics<D> = Rc<dyn Fn(&[D]) -> Result<D, EvaluationError>>;

/// An author-level production rule: `lhs -> rhs` with attached semantics.
///
/// `tag` is a free-form identifier used for featurization and debugging; it
/// is not required to be unique across a grammar's rules. Two rules with
/// identical `lhs`/`rhs` but distinct `tag` or `semantics` are distinct
/// rules and will produce distinct derivations during parsing.
pub struct Rule<D> {
    tag: String,
    lhs: String,
    rhs: Vec<String>,
    semantics: Semantics<D>,
}

impl<D> Clone for Rule<D> {
    fn clone(&self) -> Self {
        Rule {
            tag: self.tag.clone(),
            lhs: self.lhs.clone(),
            rhs: self.rhs.clone(),
            semantics: Rc::clone(&self.semantics),
        }
    }
}

impl<D> fmt::Debug for Rule<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("tag", &self.tag)
            .field("lhs", &self.lhs)
            .field("rhs", &self.rhs)
            .finish_non_exhaustive()
    }
}

/// Serializes a rule's data-only fields (`tag`/`lhs`/`rhs`). `semantics` is
/// a closure and cannot be serialized, so there is no matching
/// `Deserialize` impl: a serialized rule is a snapshot for inspection or
/// diffing, not something this crate can rebuild into a working `Rule`.
#[cfg(feature = "serde")]
impl<D> serde::Serialize for Rule<D> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Rule", 3)?;
        state.serialize_field("tag", &self.tag)?;
        state.serialize_field("lhs", &self.lhs)?;
        state.serialize_field("rhs", &self.rhs)?;
        state.end()
    }
}

impl<D> Rule<D> {
    /// Constructs a rule directly. Prefer [`RuleBuilder`] unless `rhs` is
    /// already validated and split.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRule`] if `lhs` is not a non-terminal, if `rhs` is
    /// empty, or if any rhs symbol is the empty string.
    pub fn new(
        tag: impl Into<String>,
        lhs: impl Into<String>,
        rhs: Vec<String>,
        semantics: Semantics<D>,
    ) -> Result<Self, InvalidRule> {
        let tag = tag.into();
        let lhs = lhs.into();
        if !semparse_symbol::is_non_terminal(&lhs) {
            return Err(InvalidRule::LhsNotNonTerminal { lhs });
        }
        if rhs.is_empty() {
            return Err(InvalidRule::EmptyRhs { tag });
        }
        if rhs.iter().any(|s| s.is_empty()) {
            return Err(InvalidRule::EmptyRhsSymbol { tag });
        }
        Ok(Rule {
            tag,
            lhs,
            rhs,
            semantics,
        })
    }

    /// This rule's tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// This rule's left-hand side, always a non-terminal.
    pub fn lhs(&self) -> &str {
        &self.lhs
    }

    /// This rule's right-hand side symbols, in order.
    pub fn rhs(&self) -> &[String] {
        &self.rhs
    }

    /// This rule's semantic function.
    pub fn semantics(&self) -> &Semantics<D> {
        &self.semantics
    }

    /// Evaluates this rule's semantics against the given children
    /// denotations.
    pub fn evaluate(&self, children: &[D]) -> Result<D, EvaluationError> {
        (self.semantics)(children)
    }

    /// `|rhs|`.
    pub fn arity(&self) -> usize {
        self.rhs.len()
    }

    /// `|rhs| == 1`.
    pub fn is_unary(&self) -> bool {
        self.rhs.len() == 1
    }

    /// `|rhs| == 2`.
    pub fn is_binary(&self) -> bool {
        self.rhs.len() == 2
    }

    /// `|rhs| > 2`.
    pub fn is_nary(&self) -> bool {
        self.rhs.len() > 2
    }

    /// True if every rhs symbol is a terminal.
    pub fn is_lexical(&self) -> bool {
        self.rhs.iter().all(|s| semparse_symbol::is_terminal(s))
    }

    /// True if every rhs symbol is a non-terminal.
    pub fn is_categorical(&self) -> bool {
        self.rhs.iter().all(|s| semparse_symbol::is_non_terminal(s))
    }

    /// True if the rhs mixes terminals and non-terminals (neither lexical
    /// nor categorical).
    pub fn is_mixed(&self) -> bool {
        !self.is_lexical() && !self.is_categorical()
    }

    /// True if any rhs symbol carries the optional marker.
    pub fn has_optionals(&self) -> bool {
        self.rhs.iter().any(|s| semparse_symbol::is_optional(s))
    }

    /// Returns a new rule with the same lhs/semantics but a different tag
    /// and rhs. Used internally by the normalizer to emit derived rules;
    /// exposed because host applications building their own normalization
    /// passes need the same capability.
    pub fn with_tag_and_rhs(&self, tag: impl Into<String>, rhs: Vec<String>) -> Self {
        Rule {
            tag: tag.into(),
            lhs: self.lhs.clone(),
            rhs,
            semantics: Rc::clone(&self.semantics),
        }
    }

    /// Returns a new rule with the same tag/lhs/rhs but different semantics.
    /// Used by the normalizer when it must wrap a rule's semantics (for
    /// optional-omission and mixed-rule lifting).
    pub fn with_semantics(&self, semantics: Semantics<D>) -> Self {
        Rule {
            tag: self.tag.clone(),
            lhs: self.lhs.clone(),
            rhs: self.rhs.clone(),
            semantics,
        }
    }
}
