/// A capability trait a host's denotation type implements so that the
/// grammar normalizer (see `semparse-grammar`) can manufacture the three
/// kinds of synthetic values its rewrites need, without this crate assuming
/// anything dynamically-typed about `Self`:
///
/// - [`Denotation::null`] stands in for the value substituted when an
///   optional symbol is omitted (the source system's `null`).
/// - [`Denotation::terminal`] produces the denotation of a literal word
///   lifted out of a mixed rule's rhs (the source system's "semantics
///   returns the literal terminal string").
/// - [`Denotation::pair`]/[`Denotation::unpair`] let the normalizer stash a
///   two-element intermediate result at a synthetic binarization category
///   and destructure it again at the rule that consumes it, without ever
///   needing `Self` to already be some concrete tuple type.
///
/// Only the grammar normalizer requires this bound; `Rule`, `Derivation`,
/// featurizers, and rankers only ever need `Clone` (plus `PartialEq` for
/// rankers, to compare denotations for equality).
pub trait Denotation: Clone + 'static {
    /// The denotation substituted for an omitted optional symbol.
    fn null() -> Self;

    /// The denotation of a literal terminal word lifted out of a mixed
    /// rule, e.g. `"plus"` in `$Expr -> $Expr plus $Expr`.
    fn terminal(word: &str) -> Self;

    /// Packs two denotations into one, for a synthetic binarization
    /// category's intermediate result.
    fn pair(a: Self, b: Self) -> Self;

    /// Unpacks a value produced by [`Denotation::pair`]. Panics if `self`
    /// was not produced by `pair`; the normalizer never calls this on
    /// anything else.
    fn unpair(self) -> (Self, Self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Value {
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

    #[test]
    fn pair_round_trips() {
        let packed = Value::pair(Value::Num(1.0), Value::Str("x".into()));
        let (a, b) = packed.unpair();
        assert_eq!(a, Value::Num(1.0));
        assert_eq!(b, Value::Str("x".into()));
    }
}
