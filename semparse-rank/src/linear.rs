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

/// Structured-margin linear ranker: scores a derivation as the dot product
/// of its featurization and a learned weight map (absent features treated
/// as 0), and trains by pushing the highest-scoring correct parse above
/// every near-miss by a margin.
///
/// Every field is plain data (no closures), so under the `serde` feature
/// this derives `Serialize`/`Deserialize` directly: a trained ranker's
/// weights are a snapshot a host can persist and restore between process
/// runs without this crate performing any file or network I/O itself.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearRanker {
    weights: HashMap<String, f64>,
    last_update: HashMap<String, usize>,
    state: TrainingState,
    max_epochs: usize,
    tol: f64,
    eta: f64,
    lambda: f64,
    alpha: f64,
}

impl LinearRanker {
    pub const DEFAULT_MAX_EPOCHS: usize = 100;
    pub const DEFAULT_TOL: f64 = 1e-2;
    pub const DEFAULT_ETA: f64 = 1e-2;
    pub const DEFAULT_LAMBDA: f64 = 1e-2;
    pub const DEFAULT_ALPHA: f64 = 1.0;

    pub fn new() -> Self {
        LinearRanker {
            weights: HashMap::new(),
            last_update: HashMap::new(),
            state: TrainingState::Fresh,
            max_epochs: Self::DEFAULT_MAX_EPOCHS,
            tol: Self::DEFAULT_TOL,
            eta: Self::DEFAULT_ETA,
            lambda: Self::DEFAULT_LAMBDA,
            alpha: Self::DEFAULT_ALPHA,
        }
    }

    /// Overrides the `maxEpochs`/`tol`/`eta`/`lambda`/`alpha` defaults.
    pub fn with_hyperparams(
        mut self,
        max_epochs: usize,
        tol: f64,
        eta: f64,
        lambda: f64,
        alpha: f64,
    ) -> Self {
        self.max_epochs = max_epochs;
        self.tol = tol;
        self.eta = eta;
        self.lambda = lambda;
        self.alpha = alpha;
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

    /// Applies pending L2 decay to `feature` up to `index`, then records
    /// `index` as its last-touched point. Lazy: a feature idle for many
    /// samples is decayed once, in one multiplication, the next time it is
    /// touched, rather than once per idle sample.
    fn catch_up_regularization(&mut self, feature: &str, index: usize) {
        let last = self.last_update.get(feature).copied().unwrap_or(0);
        if index > last {
            if let Some(w) = self.weights.get_mut(feature) {
                *w *= (1.0 - self.eta * self.lambda).powi((index - last) as i32);
            }
        }
        self.last_update.insert(feature.to_string(), index);
    }

    /// Trains on `(utterances[i], denotations[i])` pairs.
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
                let scores: Vec<f64> = featurized.iter().map(|f| self.dot(f)).collect();
                let correctness: Vec<bool> = parses
                    .iter()
                    .map(|p| {
                        p.compute_denotation()
                            .map(|d| d == denotations[sample])
                            .map_err(RankError::Evaluation)
                    })
                    .collect::<Result<_, _>>()?;

                let best_correct = correctness
                    .iter()
                    .enumerate()
                    .filter(|&(_, &correct)| correct)
                    .map(|(idx, _)| (idx, scores[idx]))
                    .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
                let Some((correct_idx, correct_score)) = best_correct else {
                    continue;
                };

                let violators: Vec<usize> = (0..parses.len())
                    .filter(|&idx| !correctness[idx] && correct_score - scores[idx] < self.alpha)
                    .collect();

                for &idx in &violators {
                    epoch_loss += (scores[idx] + self.alpha - correct_score).max(0.0);
                }

                for &idx in &violators {
                    let mut touched: Vec<String> = featurized[idx].keys().cloned().collect();
                    for key in featurized[correct_idx].keys() {
                        if !touched.iter().any(|t| t == key) {
                            touched.push(key.clone());
                        }
                    }
                    for feature in touched {
                        self.catch_up_regularization(&feature, global_index);
                        let phi_p = featurized[idx].get(&feature).copied().unwrap_or(0.0);
                        let phi_star = featurized[correct_idx].get(&feature).copied().unwrap_or(0.0);
                        let delta = self.eta * (phi_p - phi_star);
                        *self.weights.entry(feature).or_insert(0.0) -= delta;
                    }
                }
            }

            let touched_features: Vec<String> = self.weights.keys().cloned().collect();
            for feature in touched_features {
                self.catch_up_regularization(&feature, global_index);
            }

            debug!("linear ranker epoch {epoch}: loss = {epoch_loss}");
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

impl Default for LinearRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Clone + PartialEq> Ranker<D> for LinearRanker {
    fn logit(&self, derivation: &Derivation<D>, featurizer: &dyn Featurizer<D>) -> f64 {
        self.dot(&featurizer.featurize(derivation))
    }
}
