use std::rc::Rc;

use semparse_rule::Semantics;

use crate::Derivation;

/// One contribution a [`SubParser`] makes to a chart cell: everything a
/// [`Derivation::SubParser`] needs except the span, which the chart fills
/// in from the cell the sub-parser was invoked on.
pub struct SubParserMatch<D> {
    pub tag: String,
    pub category: String,
    pub children: Vec<Rc<Derivation<D>>>,
    pub semantics: Semantics<D>,
}

/// An external collaborator consulted at every chart cell, on the cell's
/// verbatim span. Output categories need not belong to the host grammar's
/// non-terminal set; the chart parser treats them as opaque but
/// composable, per the engine's sub-parser contract.
pub trait SubParser<D> {
    fn parse(&self, text: &str) -> Vec<SubParserMatch<D>>;
}
