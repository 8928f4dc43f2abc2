use crate::error::InvalidRule;
use crate::{Rule, Semantics};

/// Fluent construction of a [`Rule`], mirroring the rhs-then-semantics
/// builder pattern of grammar-construction libraries in this space. Accepts
/// `rhs` either as a whitespace-separated string (split per the rule DSL in
/// the engine's external interfaces) or as an explicit sequence of symbols.
pub struct RuleBuilder<D> {
    tag: Option<String>,
    lhs: Option<String>,
    rhs: Option<Vec<String>>,
    semantics: Option<Semantics<D>>,
}

impl<D> Default for RuleBuilder<D> {
    fn default() -> Self {
        RuleBuilder {
            tag: None,
            lhs: None,
            rhs: None,
            semantics: None,
        }
    }
}

impl<D> RuleBuilder<D> {
    /// Starts building a rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rule's tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Sets the rule's left-hand side.
    pub fn lhs(mut self, lhs: impl Into<String>) -> Self {
        self.lhs = Some(lhs.into());
        self
    }

    /// Sets the rule's right-hand side from a whitespace-separated string,
    /// splitting on any run of ASCII whitespace per the rule DSL.
    pub fn rhs_str(mut self, rhs: &str) -> Self {
        self.rhs = Some(rhs.split_whitespace().map(str::to_string).collect());
        self
    }

    /// Sets the rule's right-hand side from an explicit sequence of
    /// symbols.
    pub fn rhs(mut self, rhs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.rhs = Some(rhs.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the rule's semantic function.
    pub fn semantics(mut self, semantics: Semantics<D>) -> Self {
        self.semantics = Some(semantics);
        self
    }

    /// Finishes construction.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRule`] under the same conditions as [`Rule::new`];
    /// additionally, a missing `tag`, `lhs`, `rhs`, or `semantics` call is
    /// treated as an empty-rhs/non-non-terminal-lhs violation as
    /// appropriate, since the builder has no sensible default for them.
    pub fn build(self) -> Result<Rule<D>, InvalidRule> {
        let tag = self.tag.unwrap_or_default();
        let lhs = self.lhs.ok_or_else(|| InvalidRule::LhsNotNonTerminal {
            lhs: String::new(),
        })?;
        let rhs = self.rhs.ok_or_else(|| InvalidRule::EmptyRhs { tag: tag.clone() })?;
        let semantics = self
            .semantics
            .ok_or_else(|| InvalidRule::EmptyRhs { tag: tag.clone() })?;
        Rule::new(tag, lhs, rhs, semantics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn builder_splits_whitespace_separated_rhs() {
        let rule = RuleBuilder::new()
            .tag("add")
            .lhs("$Expr")
            .rhs_str("$Expr plus $Expr")
            .semantics(Rc::new(|children: &[i64]| Ok(children[0] + children[2])))
            .build()
            .unwrap();
        assert_eq!(rule.rhs(), &["$Expr", "plus", "$Expr"]);
        assert!(rule.is_mixed());
    }

    #[test]
    fn builder_accepts_explicit_symbol_sequence() {
        let rule = RuleBuilder::new()
            .tag("leaf")
            .lhs("$N")
            .rhs(["one"])
            .semantics(Rc::new(|_: &[i64]| Ok(1)))
            .build()
            .unwrap();
        assert!(rule.is_lexical());
    }
}
