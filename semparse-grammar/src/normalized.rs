use std::collections::HashMap;
use std::rc::Rc;

use semparse_rule::Rule;

/// The reserved separator joining canonical tokens into a lexical-rule key.
/// Authors must not use this in their own non-terminals (see the engine's
/// external interfaces).
pub const KEY_SEPARATOR: &str = "-";

/// The reserved separator joining a binarized rule's first two rhs symbols
/// into a synthetic intermediate category, distinct from [`KEY_SEPARATOR`]
/// so authors can tell the two kinds of synthetic name apart (and so a
/// lexical key can never collide with a binarization category).
pub const BINARIZATION_SEPARATOR: &str = "_";

/// The prefix used for non-terminals synthesized by lifting a terminal out
/// of a mixed rule.
pub const SYNTHETIC_TERMINAL_PREFIX: &str = "$@";

/// A grammar rewritten into the three tables a bottom-up chart parser
/// needs: rules whose rhs is entirely terminal (keyed by the canonical
/// token sequence they match), rules with a single non-terminal rhs symbol
/// (keyed by that symbol), and rules with exactly two non-terminal rhs
/// symbols (keyed by the ordered pair).
///
/// Every [`Rule`] reachable through these tables is lexical, unary, or
/// binary; this invariant is enforced by construction in
/// [`crate::GrammarBuilder::build`].
pub struct NormalizedGrammar<D> {
    pub(crate) lexical_rules: HashMap<String, Vec<Rc<Rule<D>>>>,
    pub(crate) unary_rules: HashMap<String, Vec<Rc<Rule<D>>>>,
    pub(crate) binary_rules: HashMap<(String, String), Vec<Rc<Rule<D>>>>,
    pub(crate) roots: Vec<String>,
}

impl<D> NormalizedGrammar<D> {
    /// Rules matching a canonical token-sequence key (tokens joined by
    /// [`KEY_SEPARATOR`]).
    pub fn lexical_rules(&self, key: &str) -> &[Rc<Rule<D>>] {
        self.lexical_rules
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rules whose sole rhs symbol is `category`.
    pub fn unary_rules(&self, category: &str) -> &[Rc<Rule<D>>] {
        self.unary_rules
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rules whose rhs is exactly `(left, right)`.
    pub fn binary_rules(&self, left: &str, right: &str) -> &[Rc<Rule<D>>] {
        self.binary_rules
            .get(&(left.to_string(), right.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The configured root categories. A derivation's category must be a
    /// member of this set for `parse` to return it, unless the set is
    /// empty (in which case every derivation spanning the full input is
    /// returned).
    pub fn roots(&self) -> &[String] {
        &self.roots
    }
}

/// Builds a canonical lexical-rule key from a sequence of canonical
/// tokens, joined by [`KEY_SEPARATOR`]. Shared between grammar
/// normalization (building the table) and the chart parser (looking it
/// up), so both sides compute the same key for the same tokens.
pub fn lexical_key<'a>(tokens: impl IntoIterator<Item = &'a str>) -> String {
    tokens.into_iter().collect::<Vec<_>>().join(KEY_SEPARATOR)
}
