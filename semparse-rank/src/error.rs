use std::fmt;

use semparse_chart::TokenizationError;
use semparse_rule::EvaluationError;

/// `fit` was given utterance and denotation lists of different lengths.
#[derive(Debug, Clone, Copy)]
pub struct LengthMismatch {
    pub utterances: usize,
    pub denotations: usize,
}

impl fmt::Display for LengthMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fit given {} utterances but {} denotations",
            self.utterances, self.denotations
        )
    }
}

impl std::error::Error for LengthMismatch {}

/// Every failure mode a ranker's scoring or training methods can raise.
#[derive(Debug)]
pub enum RankError<E> {
    LengthMismatch(LengthMismatch),
    Tokenization(TokenizationError<E>),
    Evaluation(EvaluationError),
}

impl<E: fmt::Display> fmt::Display for RankError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankError::LengthMismatch(e) => write!(f, "{e}"),
            RankError::Tokenization(e) => write!(f, "{e}"),
            RankError::Evaluation(e) => write!(f, "{e}"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RankError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RankError::LengthMismatch(e) => Some(e),
            RankError::Tokenization(e) => Some(e),
            RankError::Evaluation(e) => Some(e),
        }
    }
}
