use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, trace};
use semparse_grammar::{lexical_key, NormalizedGrammar, Tokenizer};

use crate::derivation::Derivation;
use crate::error::TokenizationError;
use crate::span::Span;
use crate::subparser::SubParser;

/// The chart built by a single `parse` call: every cell keyed by the
/// half-open token-index interval it spans.
pub struct Chart<D> {
    cells: HashMap<(usize, usize), Vec<Rc<Derivation<D>>>>,
    token_count: usize,
}

impl<D> Chart<D> {
    /// The derivations found for the interval `[i, j)`, in insertion order
    /// (sub-parsers, then lexical, then binary in split order, then one
    /// unary pass). Empty if `[i, j)` was never populated.
    pub fn cell(&self, i: usize, j: usize) -> &[Rc<Derivation<D>>] {
        self.cells
            .get(&(i, j))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of tokens the chart was built over.
    pub fn token_count(&self) -> usize {
        self.token_count
    }
}

/// Parses `source` against `grammar`'s own configured root categories.
pub fn parse<D, T>(
    grammar: &NormalizedGrammar<D>,
    tokenizer: &T,
    sub_parsers: &[Box<dyn SubParser<D>>],
    source: &str,
) -> Result<Vec<Rc<Derivation<D>>>, TokenizationError<T::Error>>
where
    D: Clone,
    T: Tokenizer,
{
    parse_with_roots(grammar, tokenizer, sub_parsers, source, grammar.roots())
}

/// Parses `source`, filtering the result against an explicit root-category
/// override instead of `grammar`'s configured roots. An empty `roots`
/// returns every derivation spanning the full input, per the engine's
/// chart-parser contract.
pub fn parse_with_roots<D, T>(
    grammar: &NormalizedGrammar<D>,
    tokenizer: &T,
    sub_parsers: &[Box<dyn SubParser<D>>],
    source: &str,
    roots: &[String],
) -> Result<Vec<Rc<Derivation<D>>>, TokenizationError<T::Error>>
where
    D: Clone,
    T: Tokenizer,
{
    let tokens = tokenizer.tokenize(source).map_err(TokenizationError)?;
    let token_count = tokens.len();
    if token_count == 0 {
        return Ok(Vec::new());
    }

    let shared_source: Rc<str> = Rc::from(source);
    let mut chart: Chart<D> = Chart {
        cells: HashMap::new(),
        token_count,
    };

    for len in 1..=token_count {
        for i in 0..=(token_count - len) {
            let j = i + len;
            let span = Span::new(
                Rc::clone(&shared_source),
                tokens[i].start,
                tokens[j - 1].end,
            );
            let mut cell = Vec::new();

            for sub_parser in sub_parsers {
                for m in sub_parser.parse(span.text()) {
                    cell.push(Rc::new(Derivation::SubParser {
                        tag: m.tag,
                        category: m.category,
                        span: span.clone(),
                        children: m.children,
                        semantics: m.semantics,
                    }));
                }
            }

            let key = lexical_key(tokens[i..j].iter().map(|t| t.token.as_str()));
            for rule in grammar.lexical_rules(&key) {
                cell.push(Rc::new(Derivation::Lexical {
                    rule: Rc::clone(rule),
                    span: span.clone(),
                }));
            }

            for k in (i + 1)..j {
                let left = chart.cell(i, k);
                let right = chart.cell(k, j);
                for l in left {
                    for r in right {
                        for rule in grammar.binary_rules(l.category(), r.category()) {
                            cell.push(Rc::new(Derivation::Composite {
                                rule: Rc::clone(rule),
                                span: span.clone(),
                                children: vec![Rc::clone(l), Rc::clone(r)],
                            }));
                        }
                    }
                }
            }

            let before_unary = cell.len();
            for idx in 0..before_unary {
                let parent = Rc::clone(&cell[idx]);
                for rule in grammar.unary_rules(parent.category()) {
                    cell.push(Rc::new(Derivation::Composite {
                        rule: Rc::clone(rule),
                        span: span.clone(),
                        children: vec![Rc::clone(&parent)],
                    }));
                }
            }

            trace!("cell [{i}, {j}): {} derivations", cell.len());
            chart.cells.insert((i, j), cell);
        }
    }

    let full_span = chart.cell(0, token_count);
    let result: Vec<Rc<Derivation<D>>> = full_span
        .iter()
        .filter(|d| roots.is_empty() || roots.iter().any(|r| r == d.category()))
        .cloned()
        .collect();

    debug!(
        "parse produced {} derivation(s) over {} token(s)",
        result.len(),
        token_count
    );
    Ok(result)
}
