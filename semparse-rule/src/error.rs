use std::fmt;

/// A rule failed its construction preconditions.
#[derive(Debug, Clone)]
pub enum InvalidRule {
    /// `rhs` was empty; arity-0 rules are forbidden.
    EmptyRhs {
        /// The rule's tag, for diagnostics.
        tag: String,
    },
    /// `lhs` was not a non-terminal symbol.
    LhsNotNonTerminal {
        /// The offending left-hand side.
        lhs: String,
    },
    /// One of the `rhs` symbols was empty.
    EmptyRhsSymbol {
        /// The rule's tag, for diagnostics.
        tag: String,
    },
}

impl fmt::Display for InvalidRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidRule::EmptyRhs { tag } => {
                write!(f, "rule '{tag}' has an empty rhs; arity-0 rules are forbidden")
            }
            InvalidRule::LhsNotNonTerminal { lhs } => {
                write!(f, "lhs '{lhs}' is not a non-terminal symbol")
            }
            InvalidRule::EmptyRhsSymbol { tag } => {
                write!(f, "rule '{tag}' has an empty symbol in its rhs")
            }
        }
    }
}

impl std::error::Error for InvalidRule {}

/// A user-supplied semantics function failed when `compute_denotation` was
/// called. This is never raised during parsing itself — only when a caller
/// asks a derivation to evaluate.
#[derive(Debug, Clone)]
pub struct EvaluationError {
    /// The tag of the rule (or sub-parser derivation) whose semantics failed.
    pub tag: String,
    /// A human-readable reason, supplied by the semantics function.
    pub reason: String,
}

impl EvaluationError {
    /// Constructs an evaluation error for the given rule tag and reason.
    pub fn new(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        EvaluationError {
            tag: tag.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "evaluation of '{}' failed: {}",
            self.tag, self.reason
        )
    }
}

impl std::error::Error for EvaluationError {}
