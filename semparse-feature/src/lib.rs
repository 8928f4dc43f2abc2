//! Pure functions from a derivation tree to a sparse feature map, for
//! consumption by the rankers in `semparse-rank`.

use std::collections::BTreeMap;

use semparse_chart::Derivation;

/// A sparse `feature-name -> weight` mapping. Absent keys are treated as
/// zero by every ranker. `BTreeMap` keeps iteration order deterministic,
/// which keeps ranker training reproducible for a fixed sample order.
pub type FeatureMap = BTreeMap<String, f64>;

/// A pure, deterministic map from a derivation to its feature vector.
pub trait Featurizer<D> {
    fn featurize(&self, derivation: &Derivation<D>) -> FeatureMap;
}

fn visit<D>(node: &Derivation<D>, visitor: &mut impl FnMut(&Derivation<D>)) {
    visitor(node);
    for child in node.children() {
        visit(child, visitor);
    }
}

/// Counts occurrences of each tag across every node in the tree.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParseCounts;

impl<D> Featurizer<D> for ParseCounts {
    fn featurize(&self, derivation: &Derivation<D>) -> FeatureMap {
        let mut counts = FeatureMap::new();
        visit(derivation, &mut |node| {
            *counts.entry(node.tag().to_string()).or_insert(0.0) += 1.0;
        });
        counts
    }
}

/// For every (ancestor tag, node tag) pair on a root-to-node path, counts
/// occurrences. The ancestor set is cloned (never shared by reference) on
/// each descent, so a node's siblings never see each other's tags.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParsePrecedence;

impl<D> Featurizer<D> for ParsePrecedence {
    fn featurize(&self, derivation: &Derivation<D>) -> FeatureMap {
        let mut features = FeatureMap::new();
        precedence_visit(derivation, &[], &mut features);
        features
    }
}

fn precedence_visit<D>(node: &Derivation<D>, ancestors: &[String], features: &mut FeatureMap) {
    let tag = node.tag().to_string();
    for ancestor in ancestors {
        *features
            .entry(format!("{ancestor}::{tag}"))
            .or_insert(0.0) += 1.0;
    }
    let mut with_self = ancestors.to_vec();
    with_self.push(tag);
    for child in node.children() {
        precedence_visit(child, &with_self, features);
    }
}

/// For each tag, the minimum depth at which a node with that tag appears
/// (root is depth 0).
#[derive(Clone, Copy, Debug, Default)]
pub struct ParseDepths;

impl<D> Featurizer<D> for ParseDepths {
    fn featurize(&self, derivation: &Derivation<D>) -> FeatureMap {
        let mut depths: BTreeMap<String, usize> = BTreeMap::new();
        depth_visit(derivation, 0, &mut depths);
        depths.into_iter().map(|(tag, d)| (tag, d as f64)).collect()
    }
}

fn depth_visit<D>(node: &Derivation<D>, depth: usize, depths: &mut BTreeMap<String, usize>) {
    depths
        .entry(node.tag().to_string())
        .and_modify(|d| *d = (*d).min(depth))
        .or_insert(depth);
    for child in node.children() {
        depth_visit(child, depth + 1, depths);
    }
}

/// For each tag, the maximum character length of `span` across all nodes
/// with that tag.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParseLengths;

impl<D> Featurizer<D> for ParseLengths {
    fn featurize(&self, derivation: &Derivation<D>) -> FeatureMap {
        let mut lengths: BTreeMap<String, usize> = BTreeMap::new();
        visit(derivation, &mut |node| {
            let len = node.span().text().chars().count();
            lengths
                .entry(node.tag().to_string())
                .and_modify(|l| *l = (*l).max(len))
                .or_insert(len);
        });
        lengths.into_iter().map(|(tag, l)| (tag, l as f64)).collect()
    }
}

/// Runs several featurizers and namespaces each one's keys with a `_i`
/// suffix (`i` its index in `featurizers`), guaranteeing unique combined
/// keys even when sub-featurizers share key names.
pub struct Concat<D> {
    featurizers: Vec<Box<dyn Featurizer<D>>>,
}

impl<D> Concat<D> {
    pub fn new(featurizers: Vec<Box<dyn Featurizer<D>>>) -> Self {
        Concat { featurizers }
    }
}

impl<D> Featurizer<D> for Concat<D> {
    fn featurize(&self, derivation: &Derivation<D>) -> FeatureMap {
        let mut combined = FeatureMap::new();
        for (i, featurizer) in self.featurizers.iter().enumerate() {
            for (key, value) in featurizer.featurize(derivation) {
                combined.insert(format!("{key}_{i}"), value);
            }
        }
        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semparse_grammar::{GrammarBuilder, SimpleTokenizer};
    use semparse_rule::{Denotation, Rule};
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

    fn sample_derivation() -> Rc<semparse_chart::Derivation<Value>> {
        let one = Rule::new(
            "one",
            "$Num",
            vec!["one".into()],
            Rc::new(|_: &[Value]| Ok(Value::Num(1.0))),
        )
        .unwrap();
        let two = Rule::new(
            "two",
            "$Num",
            vec!["two".into()],
            Rc::new(|_: &[Value]| Ok(Value::Num(2.0))),
        )
        .unwrap();
        let plus = Rule::new(
            "plus",
            "$Num",
            vec!["$Num".into(), "plus".into(), "$Num".into()],
            Rc::new(|children: &[Value]| match (&children[0], &children[2]) {
                (Value::Num(a), Value::Num(b)) => Ok(Value::Num(a + b)),
                other => panic!("unexpected {other:?}"),
            }),
        )
        .unwrap();
        let grammar = GrammarBuilder::new()
            .rule(one)
            .rule(two)
            .rule(plus)
            .root("$Num")
            .build(&SimpleTokenizer)
            .unwrap();
        semparse_chart::parse(&grammar, &SimpleTokenizer, &[], "one plus two")
            .unwrap()
            .into_iter()
            .find(|d| d.compute_denotation().unwrap() == Value::Num(3.0))
            .expect("expected a derivation denoting 3")
    }

    #[test]
    fn parse_counts_counts_every_node() {
        let derivation = sample_derivation();
        let counts = ParseCounts.featurize(&derivation);
        assert_eq!(counts.get("one"), Some(&1.0));
        assert_eq!(counts.get("two"), Some(&1.0));
        assert_eq!(counts.get("plus"), Some(&1.0));
    }

    #[test]
    fn parse_depths_records_minimum_depth() {
        let derivation = sample_derivation();
        let depths = ParseDepths.featurize(&derivation);
        // The top node is the un-lifted "plus" rule; "one"/"two" sit two
        // levels down, past the synthetic binarization category the
        // normalizer inserted between $Num and the lifted "plus" terminal.
        assert_eq!(depths.get("plus"), Some(&0.0));
        assert_eq!(depths.get("two"), Some(&1.0));
        assert_eq!(depths.get("one"), Some(&2.0));
    }

    #[test]
    fn parse_lengths_records_maximum_span_length() {
        let derivation = sample_derivation();
        let lengths = ParseLengths.featurize(&derivation);
        assert_eq!(lengths.get("plus"), Some(&("one plus two".len() as f64)));
    }

    #[test]
    fn concat_namespaces_keys_by_featurizer_index() {
        let derivation = sample_derivation();
        let concat = Concat::new(vec![Box::new(ParseCounts), Box::new(ParseDepths)]);
        let combined = concat.featurize(&derivation);
        assert!(combined.contains_key("plus_0"));
        assert!(combined.contains_key("plus_1"));
    }
}
