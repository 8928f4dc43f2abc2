use std::collections::HashMap;

use log::debug;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use semparse_chart::{Derivation, Tokenizer};
use semparse_feature::{FeatureMap, Featurizer};

use crate::context::ParsingContext;
use crate::error::{LengthMismatch, RankError};
use crate::ranker::{Ranker, TrainingState};

/// Marginal-likelihood ranker: a derivation's raw logit is the dot product
/// of its featurization and a learned weight map, and parse probabilities
/// are the softmax of an utterance's logits. Denotation probability sums
/// the probabilities of every parse sharing that denotation. Training
/// minimizes the negative log marginal likelihood of the labeled
/// denotation.
///
/// Every field is plain data, so under the `serde` feature this derives
/// `Serialize`/`Deserialize` directly, the same as [`crate::LinearRanker`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoftmaxRanker {
    weights: HashMap<String, f64>,
    last_update: HashMap<String, usize>,
    state: TrainingState,
    max_epochs: usize,
    tol: f64,
    eta: f64,
    lambda: f64,
}

impl SoftmaxRanker {
    pub const DEFAULT_MAX_EPOCHS: usize = 100;
    pub const DEFAULT_TOL: f64 = 1e-4;
    pub const DEFAULT_ETA: f64 = 1e-3;
    pub const DEFAULT_LAMBDA: f64 = 1e-3;

    pub fn new() -> Self {
        SoftmaxRanker {
            weights: HashMap::new(),
            last_update: HashMap::new(),
            state: TrainingState::Fresh,
            max_epochs: Self::DEFAULT_MAX_EPOCHS,
            tol: Self::DEFAULT_TOL,
            eta: Self::DEFAULT_ETA,
            lambda: Self::DEFAULT_LAMBDA,
        }
    }

    /// Overrides the `maxEpochs`/`tol`/`eta`/`lambda` defaults.
    pub fn with_hyperparams(mut self, max_epochs: usize, tol: f64, eta: f64, lambda: f64) -> Self {
        self.max_epochs = max_epochs;
        self.tol = tol;
        self.eta = eta;
        self.lambda = lambda;
        self
    }

    pub fn state(&self) -> TrainingState {
        self.state
    }

    /// This feature's current weight, or 0 if never updated.
    pub fn weight(&self, feature: &str) -> f64 {
        self.weights.get(feature).copied().unwrap_or(0.0)
    }

    fn dot(&self, features: &FeatureMap) -> f64 {
        features.iter().map(|(k, v)| self.weight(k) * v).sum()
    }

    /// Same lazy L2-decay scheme as [`crate::LinearRanker`]: a feature's
    /// weight decays in one step the next time it is touched, rather than
    /// once per idle sample.
    fn catch_up_regularization(&mut self, feature: &str, index: usize) {
        let last = self.last_update.get(feature).copied().unwrap_or(0);
        if index > last {
            if let Some(w) = self.weights.get_mut(feature) {
                *w *= (1.0 - self.eta * self.lambda).powi((index - last) as i32);
            }
        }
        self.last_update.insert(feature.to_string(), index);
    }

    /// Trains on `(utterances[i], denotations[i])` pairs by minimizing the
    /// negative log marginal likelihood of the labeled denotation.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::LengthMismatch`] if the two slices differ in
    /// length, or propagates tokenization/evaluation failures encountered
    /// while parsing training utterances.
    pub fn fit<D, T>(
        &mut self,
        ctx: &ParsingContext<D, T>,
        utterances: &[String],
        denotations: &[D],
    ) -> Result<(), RankError<T::Error>>
    where
        D: Clone + PartialEq,
        T: Tokenizer,
    {
        if utterances.len() != denotations.len() {
            return Err(RankError::LengthMismatch(LengthMismatch {
                utterances: utterances.len(),
                denotations: denotations.len(),
            }));
        }
        self.state = TrainingState::Fitting;

        let mut indices: Vec<usize> = (0..utterances.len()).collect();
        let mut rng = SmallRng::from_entropy();
        let mut global_index = 0usize;
        let mut previous_loss: Option<f64> = None;

        for epoch in 0..self.max_epochs {
            indices.shuffle(&mut rng);
            let mut epoch_loss = 0.0;

            for &sample in &indices {
                global_index += 1;
                let parses = ctx.parse(&utterances[sample])?;
                if parses.is_empty() {
                    continue;
                }
                let featurized: Vec<FeatureMap> = parses
                    .iter()
                    .map(|p| ctx.featurizer.featurize(p))
                    .collect();
                let logits: Vec<f64> = featurized.iter().map(|f| self.dot(f)).collect();
                let correctness: Vec<bool> = parses
                    .iter()
                    .map(|p| {
                        p.compute_denotation()
                            .map(|d| d == denotations[sample])
                            .map_err(RankError::Evaluation)
                    })
                    .collect::<Result<_, _>>()?;

                // Subtract the maximum logit before exponentiating. The
                // source this engine was distilled from does not do this
                // and can overflow `exp`; this is an intentional, noted
                // deviation for numerical stability (see DESIGN.md).
                let max_logit = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let unnormalized: Vec<f64> = logits.iter().map(|l| (l - max_logit).exp()).collect();
                let z: f64 = unnormalized.iter().sum();
                let probabilities: Vec<f64> = unnormalized.iter().map(|e| e / z).collect();

                let labeled_probability: f64 = correctness
                    .iter()
                    .zip(&probabilities)
                    .filter(|(&correct, _)| correct)
                    .map(|(_, &p)| p)
                    .sum();
                if labeled_probability == 0.0 {
                    continue;
                }

                let mut mu: HashMap<String, f64> = HashMap::new();
                for (features, &p) in featurized.iter().zip(&probabilities) {
                    for (key, value) in features {
                        *mu.entry(key.clone()).or_insert(0.0) += p * value;
                    }
                }

                epoch_loss += -labeled_probability.ln();

                let mut correct_features: Vec<String> = Vec::new();
                for (features, &correct) in featurized.iter().zip(&correctness) {
                    if correct {
                        for key in features.keys() {
                            if !correct_features.iter().any(|f| f == key) {
                                correct_features.push(key.clone());
                            }
                        }
                    }
                }

                for feature in &correct_features {
                    let mu_f = mu.get(feature).copied().unwrap_or(0.0);
                    let mut gradient = 0.0;
                    for ((features, &p), &correct) in
                        featurized.iter().zip(&probabilities).zip(&correctness)
                    {
                        if !correct {
                            continue;
                        }
                        let phi_p = features.get(feature).copied().unwrap_or(0.0);
                        gradient += -(1.0 / labeled_probability) * p * (phi_p - mu_f);
                    }
                    self.catch_up_regularization(feature, global_index);
                    *self.weights.entry(feature.clone()).or_insert(0.0) -= self.eta * gradient;
                }
            }

            let touched_features: Vec<String> = self.weights.keys().cloned().collect();
            for feature in touched_features {
                self.catch_up_regularization(&feature, global_index);
            }

            debug!("softmax ranker epoch {epoch}: loss = {epoch_loss}");
            if let Some(prev) = previous_loss {
                if (epoch_loss - prev).abs() <= self.tol {
                    break;
                }
            }
            previous_loss = Some(epoch_loss);
        }

        self.state = TrainingState::Ready;
        Ok(())
    }
}

impl Default for SoftmaxRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Clone + PartialEq> Ranker<D> for SoftmaxRanker {
    fn logit(&self, derivation: &Derivation<D>, featurizer: &dyn Featurizer<D>) -> f64 {
        self.dot(&featurizer.featurize(derivation))
    }

    /// Normalizes an utterance's raw logits into a softmax probability
    /// distribution, subtracting the maximum logit first for stability.
    fn normalize(&self, logits: Vec<f64>) -> Vec<f64> {
        let max_logit = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let unnormalized: Vec<f64> = logits.iter().map(|l| (l - max_logit).exp()).collect();
        let z: f64 = unnormalized.iter().sum();
        unnormalized.iter().map(|e| e / z).collect()
    }

    /// Equivalent denotations' probabilities add, rather than taking a max.
    fn combine(&self, scores: &[f64]) -> f64 {
        scores.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semparse_grammar::{GrammarBuilder, SimpleTokenizer};
    use semparse_rule::Rule;
    use std::rc::Rc;

    fn build_context() -> (
        semparse_grammar::NormalizedGrammar<i64>,
        Vec<Box<dyn semparse_chart::SubParser<i64>>>,
    ) {
        let one = Rule::new("one", "$Num", vec!["one".into()], Rc::new(|_: &[i64]| Ok(1))).unwrap();
        let two = Rule::new("two", "$Num", vec!["two".into()], Rc::new(|_: &[i64]| Ok(2))).unwrap();
        let grammar = GrammarBuilder::new()
            .rule(one)
            .rule(two)
            .root("$Num")
            .build(&SimpleTokenizer)
            .unwrap();
        (grammar, Vec::new())
    }

    /// An ambiguous grammar: "one" has two competing readings, one correct
    /// (1) and one a distractor (99), so training has something to do.
    fn build_ambiguous_context() -> (
        semparse_grammar::NormalizedGrammar<i64>,
        Vec<Box<dyn semparse_chart::SubParser<i64>>>,
    ) {
        let one_correct =
            Rule::new("one_lit", "$Num", vec!["one".into()], Rc::new(|_: &[i64]| Ok(1))).unwrap();
        let one_distractor =
            Rule::new("one_odd", "$Num", vec!["one".into()], Rc::new(|_: &[i64]| Ok(99))).unwrap();
        let grammar = GrammarBuilder::new()
            .rule(one_correct)
            .rule(one_distractor)
            .root("$Num")
            .build(&SimpleTokenizer)
            .unwrap();
        (grammar, Vec::new())
    }

    #[test]
    fn starts_fresh_and_scores_zero() {
        let (grammar, sub_parsers) = build_context();
        let featurizer = semparse_feature::ParseCounts;
        let ctx = ParsingContext {
            grammar: &grammar,
            tokenizer: &SimpleTokenizer,
            sub_parsers: &sub_parsers,
            featurizer: &featurizer,
        };
        let ranker = SoftmaxRanker::new();
        assert_eq!(ranker.state(), TrainingState::Fresh);
        let (score, _) = ranker.top_parse(&ctx, "one").unwrap().unwrap();
        // A single candidate parse always receives probability 1.
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fit_rejects_mismatched_lengths() {
        let (grammar, sub_parsers) = build_context();
        let featurizer = semparse_feature::ParseCounts;
        let ctx = ParsingContext {
            grammar: &grammar,
            tokenizer: &SimpleTokenizer,
            sub_parsers: &sub_parsers,
            featurizer: &featurizer,
        };
        let mut ranker = SoftmaxRanker::new();
        let err = ranker
            .fit(&ctx, &["one".to_string(), "two".to_string()], &[1_i64])
            .unwrap_err();
        assert!(matches!(err, RankError::LengthMismatch(_)));
    }

    #[test]
    fn fit_converges_and_prefers_the_labeled_denotation() {
        let (grammar, sub_parsers) = build_ambiguous_context();
        let featurizer = semparse_feature::ParseCounts;
        let ctx = ParsingContext {
            grammar: &grammar,
            tokenizer: &SimpleTokenizer,
            sub_parsers: &sub_parsers,
            featurizer: &featurizer,
        };
        let mut ranker = SoftmaxRanker::new().with_hyperparams(200, 1e-6, 0.5, 1e-3);
        ranker
            .fit(&ctx, &["one".to_string()], &[1_i64])
            .unwrap();
        assert_eq!(ranker.state(), TrainingState::Ready);
        let (_, top) = ranker.top_denotation(&ctx, "one").unwrap().unwrap();
        assert_eq!(top, 1);
    }
}
