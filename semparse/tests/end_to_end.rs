//! End-to-end scenarios exercising the whole engine together: grammar
//! normalization (optionals, mixed rules, n-ary binarization), the chart
//! parser (including a pluggable sub-parser for bare numerals), and a
//! ranker, on a small arithmetic-with-filler-words grammar.
//!
//! The grammar below is a test fixture only, not a shipped collaborator:
//! it exists to exercise every normalizer rewrite and the chart's
//! sub-parser/lexical/binary/unary interleaving against realistic
//! sentences, the way a host application's own grammar would.

use std::rc::Rc;

use semparse::{
    parse, ConstantRanker, Denotation, GrammarBuilder, ParsingContext, Ranker, Rule, Semantics,
    SimpleTokenizer, SubParser, SubParserMatch,
};

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

/// Recognizes a bare run of ASCII digits as an `$Expr`, standing in for the
/// kind of numeral sub-parser a host application plugs into the chart.
struct DigitSubParser;

impl SubParser<Value> for DigitSubParser {
    fn parse(&self, text: &str) -> Vec<SubParserMatch<Value>> {
        let trimmed = text.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Vec::new();
        }
        let Ok(n) = trimmed.parse::<f64>() else {
            return Vec::new();
        };
        vec![SubParserMatch {
            tag: "digit".to_string(),
            category: "$Expr".to_string(),
            children: Vec::new(),
            semantics: Rc::new(move |_: &[Value]| Ok(Value::Num(n))),
        }]
    }
}

fn num(n: f64) -> Semantics<Value> {
    Rc::new(move |_: &[Value]| Ok(Value::Num(n)))
}

/// Builds the arithmetic-with-filler grammar shared by every scenario below:
///
/// - `$Expr -> one|two|three|four|seven` (number words; bare numerals come
///   from [`DigitSubParser`] instead of a lexical rule).
/// - `$Expr -> $Expr plus $Expr` / `$Expr -> $Expr minus $Expr` (mixed
///   infix rules, each lifting one terminal and binarizing to arity 2).
/// - `$Expr -> minus $Expr` (mixed prefix negation).
/// - `$Expr -> $Expr to the $Expr` (mixed, two lifted terminals, binarizes
///   through two synthetic intermediates, exercising nested un-pairing).
/// - `$Lead -> what is` / `$Lead -> how about` (lexical filler phrases).
/// - `$Query -> ?$Lead $Expr` (an optional rhs symbol expands into an
///   "included" binary rule and an "omitted" unary rule).
fn arithmetic_grammar() -> semparse::NormalizedGrammar<Value> {
    let one = Rule::new("one", "$Expr", vec!["one".into()], num(1.0)).unwrap();
    let two = Rule::new("two", "$Expr", vec!["two".into()], num(2.0)).unwrap();
    let three = Rule::new("three", "$Expr", vec!["three".into()], num(3.0)).unwrap();
    let four = Rule::new("four", "$Expr", vec!["four".into()], num(4.0)).unwrap();
    let seven = Rule::new("seven", "$Expr", vec!["seven".into()], num(7.0)).unwrap();

    let plus = Rule::new(
        "plus",
        "$Expr",
        vec!["$Expr".into(), "plus".into(), "$Expr".into()],
        Rc::new(|children: &[Value]| match (&children[0], &children[2]) {
            (Value::Num(a), Value::Num(b)) => Ok(Value::Num(a + b)),
            other => panic!("unexpected plus operands {other:?}"),
        }),
    )
    .unwrap();
    let minus = Rule::new(
        "minus",
        "$Expr",
        vec!["$Expr".into(), "minus".into(), "$Expr".into()],
        Rc::new(|children: &[Value]| match (&children[0], &children[2]) {
            (Value::Num(a), Value::Num(b)) => Ok(Value::Num(a - b)),
            other => panic!("unexpected minus operands {other:?}"),
        }),
    )
    .unwrap();
    let negate = Rule::new(
        "neg",
        "$Expr",
        vec!["minus".into(), "$Expr".into()],
        Rc::new(|children: &[Value]| match &children[1] {
            Value::Num(n) => Ok(Value::Num(-n)),
            other => panic!("unexpected negation operand {other:?}"),
        }),
    )
    .unwrap();
    let pow = Rule::new(
        "pow",
        "$Expr",
        vec!["$Expr".into(), "to".into(), "the".into(), "$Expr".into()],
        Rc::new(|children: &[Value]| match (&children[0], &children[3]) {
            (Value::Num(a), Value::Num(b)) => Ok(Value::Num(a.powf(*b))),
            other => panic!("unexpected pow operands {other:?}"),
        }),
    )
    .unwrap();

    let lead_what_is = Rule::new(
        "lead_what_is",
        "$Lead",
        vec!["what".into(), "is".into()],
        Rc::new(|_: &[Value]| Ok(Value::Null)),
    )
    .unwrap();
    let lead_how_about = Rule::new(
        "lead_how_about",
        "$Lead",
        vec!["how".into(), "about".into()],
        Rc::new(|_: &[Value]| Ok(Value::Null)),
    )
    .unwrap();

    let query = Rule::new(
        "query",
        "$Query",
        vec!["?$Lead".into(), "$Expr".into()],
        Rc::new(|children: &[Value]| Ok(children[1].clone())),
    )
    .unwrap();

    GrammarBuilder::new()
        .rule(one)
        .rule(two)
        .rule(three)
        .rule(four)
        .rule(seven)
        .rule(plus)
        .rule(minus)
        .rule(negate)
        .rule(pow)
        .rule(lead_what_is)
        .rule(lead_how_about)
        .rule(query)
        .root("$Query")
        .build(&SimpleTokenizer)
        .unwrap()
}

fn top_denotation(source: &str) -> Value {
    let grammar = arithmetic_grammar();
    let sub_parsers: Vec<Box<dyn SubParser<Value>>> = vec![Box::new(DigitSubParser)];
    let derivations = parse(&grammar, &SimpleTokenizer, &sub_parsers, source).unwrap();
    let featurizer = semparse::ParseCounts;
    let ctx = ParsingContext {
        grammar: &grammar,
        tokenizer: &SimpleTokenizer,
        sub_parsers: &sub_parsers,
        featurizer: &featurizer,
    };
    let ranker = ConstantRanker::new();
    let (_, denotation) = ranker
        .top_denotation(&ctx, source)
        .unwrap()
        .unwrap_or_else(|| panic!("expected at least one derivation for {source:?}"));
    assert!(
        !derivations.is_empty(),
        "expected parse() and the ranker to agree that {source:?} parses"
    );
    denotation
}

#[test]
fn bare_number_word() {
    assert_eq!(top_denotation("one"), Value::Num(1.0));
}

#[test]
fn double_negation() {
    assert_eq!(top_denotation("minus minus three"), Value::Num(3.0));
}

#[test]
fn left_to_right_addition_and_subtraction() {
    assert_eq!(top_denotation("one plus two minus three"), Value::Num(0.0));
}

#[test]
fn filler_prefixed_addition_with_numeral_sub_parses() {
    assert_eq!(
        top_denotation("What is 43 plus 21?"),
        Value::Num(64.0)
    );
}

#[test]
fn alternate_filler_phrase() {
    assert_eq!(
        top_denotation("How about 4 plus seven?"),
        Value::Num(11.0)
    );
}

#[test]
fn mixed_rule_with_two_lifted_terminals_and_a_numeral_sub_parse() {
    assert_eq!(top_denotation("What is 2 to the 3?"), Value::Num(8.0));
}

#[test]
fn derivation_span_is_the_verbatim_source_substring() {
    let grammar = arithmetic_grammar();
    let sub_parsers: Vec<Box<dyn SubParser<Value>>> = vec![Box::new(DigitSubParser)];
    let source = "What is 43 plus 21?";
    let derivations = parse(&grammar, &SimpleTokenizer, &sub_parsers, source).unwrap();
    assert!(!derivations.is_empty());
    for derivation in &derivations {
        // The tokenizer strips the trailing "?"; the root span therefore
        // covers "What is 43 plus 21", not the full source string.
        assert_eq!(derivation.span().text(), "What is 43 plus 21");
    }
}

#[test]
fn compute_denotation_is_referentially_transparent() {
    let grammar = arithmetic_grammar();
    let sub_parsers: Vec<Box<dyn SubParser<Value>>> = vec![Box::new(DigitSubParser)];
    let derivations = parse(&grammar, &SimpleTokenizer, &sub_parsers, "one plus two").unwrap();
    let derivation = derivations
        .iter()
        .find(|d| d.compute_denotation().unwrap() == Value::Num(3.0))
        .expect("expected a derivation denoting 3");
    assert_eq!(
        derivation.compute_denotation().unwrap(),
        derivation.compute_denotation().unwrap()
    );
}
