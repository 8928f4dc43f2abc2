use semparse_chart::{Derivation, Tokenizer};
use semparse_feature::Featurizer;

use crate::context::ParsingContext;
use crate::error::{LengthMismatch, RankError};
use crate::ranker::{Ranker, TrainingState};

/// Scores every parse 0 and every denotation 0, preserving the parser's own
/// enumeration order (a stable sort over equal scores). `fit` only
/// validates its inputs; it never changes the ranker's behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConstantRanker {
    state: TrainingState,
}

impl ConstantRanker {
    pub fn new() -> Self {
        ConstantRanker {
            state: TrainingState::Fresh,
        }
    }

    pub fn state(&self) -> TrainingState {
        self.state
    }

    pub fn fit<D, T: Tokenizer>(
        &mut self,
        utterances: &[String],
        denotations: &[D],
    ) -> Result<(), RankError<T::Error>> {
        if utterances.len() != denotations.len() {
            return Err(RankError::LengthMismatch(LengthMismatch {
                utterances: utterances.len(),
                denotations: denotations.len(),
            }));
        }
        self.state = TrainingState::Ready;
        Ok(())
    }
}

impl<D: Clone + PartialEq> Ranker<D> for ConstantRanker {
    fn logit(&self, _derivation: &Derivation<D>, _featurizer: &dyn Featurizer<D>) -> f64 {
        0.0
    }
}
