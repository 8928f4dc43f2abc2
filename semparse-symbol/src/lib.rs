//! Classification of grammar symbols.
//!
//! A symbol is a short string. It is a *non-terminal* when it begins with
//! `$` and has length greater than one; otherwise it is a *terminal*. Any
//! symbol may additionally carry an *optional* marker: a leading `?` with
//! length greater than one. These three predicates, plus the ability to
//! strip the optional marker, are all this crate provides; classification
//! depends only on the first byte and the length of the symbol, never on
//! Unicode normalization.

#![deny(missing_copy_implementations, trivial_casts, trivial_numeric_casts)]

/// Returns true if `symbol` begins with `$` and has more than one byte.
///
/// ```
/// assert!(semparse_symbol::is_non_terminal("$NP"));
/// assert!(!semparse_symbol::is_non_terminal("$"));
/// assert!(!semparse_symbol::is_non_terminal("plus"));
/// ```
pub fn is_non_terminal(symbol: &str) -> bool {
    symbol.starts_with('$') && symbol.len() > 1
}

/// A symbol is a terminal exactly when it is not a non-terminal.
pub fn is_terminal(symbol: &str) -> bool {
    !is_non_terminal(symbol)
}

/// Returns true if `symbol` begins with `?` and has more than one byte.
pub fn is_optional(symbol: &str) -> bool {
    symbol.starts_with('?') && symbol.len() > 1
}

/// Strips a single leading `?` marker, if present. Idempotent:
/// `strip_optional(strip_optional(x)) == strip_optional(x)`.
pub fn strip_optional(symbol: &str) -> &str {
    if is_optional(symbol) {
        &symbol[1..]
    } else {
        symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("$NP" => true; "dollar prefixed, length > 1")]
    #[test_case("$" => false; "bare dollar has length 1")]
    #[test_case("plus" => false; "plain word")]
    #[test_case("?$NP" => false; "optional marker shadows the dollar")]
    #[test_case("" => false; "empty string")]
    fn non_terminal_classification(symbol: &str) -> bool {
        is_non_terminal(symbol)
    }

    #[test_case("$NP" => false)]
    #[test_case("$" => true)]
    #[test_case("plus" => true)]
    #[test_case("?$NP" => true; "optional-marked symbols classify as terminal until stripped")]
    fn terminal_is_the_complement(symbol: &str) -> bool {
        is_terminal(symbol)
    }

    #[test_case("?x" => true)]
    #[test_case("?" => false; "bare question mark has length 1")]
    #[test_case("$NP" => false)]
    #[test_case("" => false)]
    fn optional_classification(symbol: &str) -> bool {
        is_optional(symbol)
    }

    #[test]
    fn strip_optional_removes_one_leading_marker() {
        assert_eq!(strip_optional("?x"), "x");
        assert_eq!(strip_optional("?$NP"), "$NP");
    }

    #[test]
    fn strip_optional_is_a_no_op_on_non_optional_symbols() {
        assert_eq!(strip_optional("$NP"), "$NP");
        assert_eq!(strip_optional("plus"), "plus");
    }

    #[test]
    fn strip_optional_is_idempotent() {
        for symbol in ["?x", "x", "?$NP", "$NP", "?"] {
            let once = strip_optional(symbol);
            let twice = strip_optional(once);
            assert_eq!(once, twice);
        }
    }
}
