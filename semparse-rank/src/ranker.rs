use std::cmp::Ordering;
use std::rc::Rc;

use semparse_chart::{Derivation, Tokenizer};
use semparse_feature::Featurizer;

use crate::context::ParsingContext;
use crate::error::RankError;

/// A ranker's training lifecycle: `Fresh` (zero weights, scores as if
/// untrained), `Fitting` (a `fit` call is in progress), `Ready` (at least
/// one `fit` call has completed). Scoring never fails or behaves
/// differently in `Fresh`; it simply dots against an empty weight map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrainingState {
    Fresh,
    Fitting,
    Ready,
}

impl Default for TrainingState {
    fn default() -> Self {
        TrainingState::Fresh
    }
}

/// Scores derivations of a single utterance and aggregates by denotation.
/// `ConstantRanker`, `LinearRanker`, and `SoftmaxRanker` each implement
/// [`Ranker::logit`] (their own notion of a derivation's raw score) and
/// may override [`Ranker::normalize`] / [`Ranker::combine`] where their
/// scoring differs from "raw logit, aggregate by max" (only `SoftmaxRanker`
/// does: it normalizes logits into a probability distribution per
/// utterance and aggregates equivalent denotations by summing).
pub trait Ranker<D: Clone + PartialEq> {
    /// A single derivation's raw score, before any cross-parse
    /// normalization.
    fn logit(&self, derivation: &Derivation<D>, featurizer: &dyn Featurizer<D>) -> f64;

    /// Transforms one utterance's raw per-parse logits, in order, into the
    /// scores `scoresAndParses` reports. Identity for `ConstantRanker` and
    /// `LinearRanker`; softmax normalization for `SoftmaxRanker`.
    fn normalize(&self, logits: Vec<f64>) -> Vec<f64> {
        logits
    }

    /// Combines the scores of several parses that share a denotation into
    /// one denotation score. Maximum for `ConstantRanker`/`LinearRanker`;
    /// sum for `SoftmaxRanker` (probabilities of equivalent denotations
    /// add).
    fn combine(&self, scores: &[f64]) -> f64 {
        scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Every parse of `utterance`, scored and sorted descending.
    fn scores_and_parses<T: Tokenizer>(
        &self,
        ctx: &ParsingContext<D, T>,
        utterance: &str,
    ) -> Result<Vec<(f64, Rc<Derivation<D>>)>, RankError<T::Error>> {
        let parses = ctx.parse(utterance)?;
        let logits: Vec<f64> = parses
            .iter()
            .map(|p| self.logit(p, ctx.featurizer))
            .collect();
        let scores = self.normalize(logits);
        let mut scored: Vec<(f64, Rc<Derivation<D>>)> = scores.into_iter().zip(parses).collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        Ok(scored)
    }

    /// Every distinct denotation reachable from `utterance`, scored by
    /// [`Ranker::combine`] and sorted descending.
    fn scores_and_denotations<T: Tokenizer>(
        &self,
        ctx: &ParsingContext<D, T>,
        utterance: &str,
    ) -> Result<Vec<(f64, D)>, RankError<T::Error>> {
        let scored = self.scores_and_parses(ctx, utterance)?;
        let mut groups: Vec<(D, Vec<f64>)> = Vec::new();
        for (score, derivation) in scored {
            let denotation = derivation
                .compute_denotation()
                .map_err(RankError::Evaluation)?;
            match groups.iter_mut().find(|(d, _)| *d == denotation) {
                Some(group) => group.1.push(score),
                None => groups.push((denotation, vec![score])),
            }
        }
        let mut result: Vec<(f64, D)> = groups
            .into_iter()
            .map(|(denotation, scores)| (self.combine(&scores), denotation))
            .collect();
        result.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        Ok(result)
    }

    /// The single highest-scoring parse, if any.
    fn top_parse<T: Tokenizer>(
        &self,
        ctx: &ParsingContext<D, T>,
        utterance: &str,
    ) -> Result<Option<(f64, Rc<Derivation<D>>)>, RankError<T::Error>> {
        Ok(self.scores_and_parses(ctx, utterance)?.into_iter().next())
    }

    /// The single highest-scoring denotation, if any.
    fn top_denotation<T: Tokenizer>(
        &self,
        ctx: &ParsingContext<D, T>,
        utterance: &str,
    ) -> Result<Option<(f64, D)>, RankError<T::Error>> {
        Ok(self
            .scores_and_denotations(ctx, utterance)?
            .into_iter()
            .next())
    }
}
