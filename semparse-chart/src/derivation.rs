use std::rc::Rc;

use semparse_rule::{EvaluationError, Rule, Semantics};

use crate::span::Span;

/// A parse-tree node spanning some interval of the original utterance.
///
/// Tagged-variant replacement for the source system's abstract-base/
/// subclass derivation hierarchy (see the engine's design notes): a
/// derivation either comes from a normalized grammar rule with no children
/// (`Lexical`), a normalized grammar rule with children (`Composite`), or a
/// sub-parser, which supplies its own tag/category/semantics without
/// referencing any `Rule` (`SubParser`).
pub enum Derivation<D> {
    /// Produced by a lexical rule match; always has empty children, even
    /// when the matched rule's rhs spans more than one token.
    Lexical { rule: Rc<Rule<D>>, span: Span },
    /// Produced by a unary or binary rule application.
    Composite {
        rule: Rc<Rule<D>>,
        span: Span,
        children: Vec<Rc<Derivation<D>>>,
    },
    /// Produced by a configured sub-parser; carries its own semantics since
    /// it has no originating grammar rule.
    SubParser {
        tag: String,
        category: String,
        span: Span,
        children: Vec<Rc<Derivation<D>>>,
        semantics: Semantics<D>,
    },
}

impl<D> Derivation<D> {
    /// The originating rule's tag, or the sub-parser derivation's own tag.
    pub fn tag(&self) -> &str {
        match self {
            Derivation::Lexical { rule, .. } => rule.tag(),
            Derivation::Composite { rule, .. } => rule.tag(),
            Derivation::SubParser { tag, .. } => tag,
        }
    }

    /// The originating rule's lhs, or the sub-parser derivation's own
    /// category.
    pub fn category(&self) -> &str {
        match self {
            Derivation::Lexical { rule, .. } => rule.lhs(),
            Derivation::Composite { rule, .. } => rule.lhs(),
            Derivation::SubParser { category, .. } => category,
        }
    }

    /// The verbatim span of input this derivation covers.
    pub fn span(&self) -> &Span {
        match self {
            Derivation::Lexical { span, .. } => span,
            Derivation::Composite { span, .. } => span,
            Derivation::SubParser { span, .. } => span,
        }
    }

    /// This derivation's children, in rule-rhs order. Always empty for
    /// `Lexical` derivations.
    pub fn children(&self) -> &[Rc<Derivation<D>>] {
        match self {
            Derivation::Lexical { .. } => &[],
            Derivation::Composite { children, .. } => children,
            Derivation::SubParser { children, .. } => children,
        }
    }

    /// Evaluates this derivation's denotation by recursively evaluating its
    /// children and applying the originating rule's (or sub-parser's)
    /// semantics. Pure and referentially transparent; callers may recompute
    /// freely instead of caching.
    pub fn compute_denotation(&self) -> Result<D, EvaluationError>
    where
        D: Clone,
    {
        match self {
            Derivation::Lexical { rule, .. } => rule.evaluate(&[]),
            Derivation::Composite { rule, children, .. } => {
                let child_denotations = children
                    .iter()
                    .map(|c| c.compute_denotation())
                    .collect::<Result<Vec<D>, _>>()?;
                rule.evaluate(&child_denotations)
            }
            Derivation::SubParser {
                children, semantics, ..
            } => {
                let child_denotations = children
                    .iter()
                    .map(|c| c.compute_denotation())
                    .collect::<Result<Vec<D>, _>>()?;
                semantics(&child_denotations)
            }
        }
    }
}
