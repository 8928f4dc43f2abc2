use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use log::debug;
use semparse_rule::{Denotation, Rule, Semantics};
use semparse_symbol::{is_non_terminal, is_optional, is_terminal, strip_optional};

use crate::error::InvalidGrammar;
use crate::normalized::{
    lexical_key, NormalizedGrammar, BINARIZATION_SEPARATOR, SYNTHETIC_TERMINAL_PREFIX,
};
use crate::token::Tokenizer;

/// Accumulates author rules and root categories, then normalizes them into
/// a [`NormalizedGrammar`] in one call, mirroring a binarized-grammar
/// builder's `from_context_free` entry point.
pub struct GrammarBuilder<D> {
    rules: Vec<Rule<D>>,
    roots: Vec<String>,
}

impl<D> Default for GrammarBuilder<D> {
    fn default() -> Self {
        GrammarBuilder {
            rules: Vec::new(),
            roots: Vec::new(),
        }
    }
}

impl<D> GrammarBuilder<D> {
    /// Starts an empty grammar builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one author rule.
    pub fn rule(mut self, rule: Rule<D>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several author rules.
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule<D>>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Adds a root category. If no roots are ever added, normalization
    /// defaults to every lhs that never occurs on the rhs of any author
    /// rule.
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Normalizes the accumulated rules into lexical/unary/binary tables,
    /// using `tokenizer` to canonicalize literal terminal words.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidGrammar`] if a rule's rhs cannot be classified as
    /// lexical, unary, or binary after expansion, or if `tokenizer` fails
    /// on one of the grammar's literal terminal words.
    pub fn build<T: Tokenizer>(
        self,
        tokenizer: &T,
    ) -> Result<NormalizedGrammar<D>, InvalidGrammar>
    where
        D: Denotation,
    {
        let roots = if self.roots.is_empty() {
            default_roots(&self.rules)
        } else {
            self.roots
        };
        normalize(self.rules, roots, tokenizer)
    }
}

/// Rules whose lhs never appears on the rhs of any author rule: the
/// grammar's roots, absent an explicit configuration.
fn default_roots<D>(rules: &[Rule<D>]) -> Vec<String> {
    let mut seen_lhs = Vec::new();
    let mut appears_in_rhs = HashSet::new();
    for rule in rules {
        let lhs = rule.lhs().to_string();
        if !seen_lhs.contains(&lhs) {
            seen_lhs.push(lhs);
        }
        for symbol in rule.rhs() {
            if is_non_terminal(symbol) {
                appears_in_rhs.insert(strip_optional(symbol).to_string());
            }
        }
    }
    seen_lhs
        .into_iter()
        .filter(|lhs| !appears_in_rhs.contains(lhs))
        .collect()
}

fn normalize<D: Denotation, T: Tokenizer>(
    rules: Vec<Rule<D>>,
    roots: Vec<String>,
    tokenizer: &T,
) -> Result<NormalizedGrammar<D>, InvalidGrammar> {
    let mut queue: VecDeque<Rule<D>> = rules.into_iter().collect();
    let mut generated_lexical_keys: HashSet<String> = HashSet::new();
    let mut generated_binarization_keys: HashSet<String> = HashSet::new();

    let mut lexical_rules: HashMap<String, Vec<Rc<Rule<D>>>> = HashMap::new();
    let mut unary_rules: HashMap<String, Vec<Rc<Rule<D>>>> = HashMap::new();
    let mut binary_rules: HashMap<(String, String), Vec<Rc<Rule<D>>>> = HashMap::new();

    while let Some(rule) = queue.pop_front() {
        if rule.has_optionals() {
            expand_optional(rule, &mut queue);
        } else if rule.is_mixed() {
            lift_mixed(rule, tokenizer, &mut generated_lexical_keys, &mut queue)?;
        } else if rule.is_nary() && rule.is_categorical() {
            binarize(rule, &mut generated_binarization_keys, &mut queue);
        } else {
            install(
                rule,
                tokenizer,
                &mut lexical_rules,
                &mut unary_rules,
                &mut binary_rules,
            )?;
        }
    }

    debug!(
        "normalized grammar: {} lexical keys, {} unary categories, {} binary pairs, {} roots",
        lexical_rules.len(),
        unary_rules.len(),
        binary_rules.len(),
        roots.len()
    );

    Ok(NormalizedGrammar {
        lexical_rules,
        unary_rules,
        binary_rules,
        roots,
    })
}

/// Rewrites a rule with at least one optional rhs symbol into two
/// replacement rules: one with the (first) optional included and its
/// marker stripped, one with it omitted and a wrapped semantics that
/// re-inserts [`Denotation::null`] at the omitted position.
fn expand_optional<D: Denotation>(rule: Rule<D>, queue: &mut VecDeque<Rule<D>>) {
    let index = rule
        .rhs()
        .iter()
        .position(|symbol| is_optional(symbol))
        .expect("has_optionals() guarantees a match");
    let word = strip_optional(&rule.rhs()[index]).to_string();

    let mut included_rhs = rule.rhs().to_vec();
    included_rhs[index] = word.clone();
    debug!("expanding optional '{}' in rule '{}'", word, rule.tag());
    queue.push_back(rule.with_tag_and_rhs(format!("{}_{word}", rule.tag()), included_rhs));

    let mut omitted_rhs = rule.rhs().to_vec();
    omitted_rhs.remove(index);
    let original_semantics = Rc::clone(rule.semantics());
    let omitted_semantics: Semantics<D> = Rc::new(move |children: &[D]| {
        let mut with_null = Vec::with_capacity(children.len() + 1);
        with_null.extend_from_slice(&children[..index]);
        with_null.push(D::null());
        with_null.extend_from_slice(&children[index..]);
        original_semantics(&with_null)
    });
    let omitted = rule
        .with_tag_and_rhs(format!("{}_~{word}", rule.tag()), omitted_rhs)
        .with_semantics(omitted_semantics);
    queue.push_back(omitted);
}

/// Lifts every literal terminal out of a mixed rule's rhs into a synthetic
/// non-terminal prefixed with the tokenized form of the word, re-queuing a
/// fully categorical rule plus (once per unique terminal) a lexical
/// wrapping rule whose semantics reproduces the literal terminal's
/// denotation.
fn lift_mixed<D: Denotation, T: Tokenizer>(
    rule: Rule<D>,
    tokenizer: &T,
    generated_lexical_keys: &mut HashSet<String>,
    queue: &mut VecDeque<Rule<D>>,
) -> Result<(), InvalidGrammar> {
    let mut lifted_rhs = Vec::with_capacity(rule.rhs().len());
    for symbol in rule.rhs() {
        if is_terminal(symbol) {
            let tokens = tokenizer
                .tokenize(symbol)
                .map_err(|e| InvalidGrammar::Tokenization {
                    word: symbol.clone(),
                    reason: e.to_string(),
                })?;
            let canonical: Vec<String> = tokens.into_iter().map(|t| t.token).collect();
            let key = lexical_key(canonical.iter().map(String::as_str));
            let synthetic = format!("{SYNTHETIC_TERMINAL_PREFIX}{key}");
            if generated_lexical_keys.insert(key.clone()) {
                let word = symbol.clone();
                let semantics: Semantics<D> = Rc::new(move |_: &[D]| Ok(D::terminal(&word)));
                let lexical_rule = Rule::new(
                    format!("lex_{key}"),
                    synthetic.clone(),
                    vec![symbol.clone()],
                    semantics,
                )
                .expect("a single-terminal rhs under a synthetic non-terminal lhs is always valid");
                debug!("lifted terminal '{}' to synthetic category '{}'", symbol, synthetic);
                queue.push_back(lexical_rule);
            }
            lifted_rhs.push(synthetic);
        } else {
            lifted_rhs.push(symbol.clone());
        }
    }
    let tag = rule.tag().to_string();
    queue.push_back(rule.with_tag_and_rhs(tag, lifted_rhs));
    Ok(())
}

/// Binarizes a non-lexical n-ary rule left to right: the first two rhs
/// symbols collapse into a synthetic `A-B` category (deduplicated across
/// rules), and the residual rule destructures that category's paired
/// denotation back into two arguments before calling the original
/// semantics.
fn binarize<D: Denotation>(
    rule: Rule<D>,
    generated_binarization_keys: &mut HashSet<String>,
    queue: &mut VecDeque<Rule<D>>,
) {
    let rhs = rule.rhs();
    let (a, b) = (rhs[0].clone(), rhs[1].clone());
    let category = format!("{a}{BINARIZATION_SEPARATOR}{b}");

    if generated_binarization_keys.insert(category.clone()) {
        let pair_semantics: Semantics<D> =
            Rc::new(|children: &[D]| Ok(D::pair(children[0].clone(), children[1].clone())));
        let pair_rule = Rule::new(
            format!("bin_{category}"),
            category.clone(),
            vec![a, b],
            pair_semantics,
        )
        .expect("a two-symbol rhs under a synthetic non-terminal lhs is always valid");
        debug!("binarizing '{}' into intermediate category '{}'", rule.tag(), category);
        queue.push_back(pair_rule);
    }

    let mut residual_rhs = Vec::with_capacity(rhs.len() - 1);
    residual_rhs.push(category.clone());
    residual_rhs.extend(rhs[2..].iter().cloned());

    let original_semantics = Rc::clone(rule.semantics());
    let residual_semantics: Semantics<D> = Rc::new(move |children: &[D]| {
        let (first, second) = children[0].clone().unpair();
        let mut full = Vec::with_capacity(children.len() + 1);
        full.push(first);
        full.push(second);
        full.extend_from_slice(&children[1..]);
        original_semantics(&full)
    });
    let tag = rule.tag().to_string();
    queue.push_back(
        rule.with_tag_and_rhs(tag, residual_rhs)
            .with_semantics(residual_semantics),
    );
}

/// Installs a rule that is already lexical, unary, or binary into its
/// table. Lexical rules may have any arity, as long as every rhs symbol is
/// terminal; they are keyed by the concatenation of each symbol's own
/// canonical tokenization.
fn install<D, T: Tokenizer>(
    rule: Rule<D>,
    tokenizer: &T,
    lexical_rules: &mut HashMap<String, Vec<Rc<Rule<D>>>>,
    unary_rules: &mut HashMap<String, Vec<Rc<Rule<D>>>>,
    binary_rules: &mut HashMap<(String, String), Vec<Rc<Rule<D>>>>,
) -> Result<(), InvalidGrammar> {
    if rule.is_lexical() {
        let mut canonical = Vec::new();
        for word in rule.rhs() {
            let tokens = tokenizer
                .tokenize(word)
                .map_err(|e| InvalidGrammar::Tokenization {
                    word: word.clone(),
                    reason: e.to_string(),
                })?;
            canonical.extend(tokens.into_iter().map(|t| t.token));
        }
        let key = lexical_key(canonical.iter().map(String::as_str));
        lexical_rules.entry(key).or_default().push(Rc::new(rule));
    } else if rule.is_unary() {
        let category = rule.rhs()[0].clone();
        unary_rules.entry(category).or_default().push(Rc::new(rule));
    } else if rule.is_binary() {
        let pair = (rule.rhs()[0].clone(), rule.rhs()[1].clone());
        binary_rules.entry(pair).or_default().push(Rc::new(rule));
    } else {
        return Err(InvalidGrammar::UnrecognizedShape {
            tag: rule.tag().to_string(),
            rhs: rule.rhs().to_vec(),
        });
    }
    Ok(())
}
