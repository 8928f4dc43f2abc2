//! Scores and trains over competing parse derivations.
//!
//! Three learners share one [`Ranker`] trait: [`ConstantRanker`] (an
//! always-zero baseline), [`LinearRanker`] (structured-margin training over
//! a linear score), and [`SoftmaxRanker`] (marginal-likelihood training over
//! a softmax distribution). All three take a [`ParsingContext`] bundling the
//! grammar, tokenizer, sub-parsers, and featurizer an utterance needs to
//! become scored derivations.

mod constant;
mod context;
mod error;
mod linear;
mod ranker;
mod softmax;

pub use constant::ConstantRanker;
pub use context::ParsingContext;
pub use error::{LengthMismatch, RankError};
pub use linear::LinearRanker;
pub use ranker::{Ranker, TrainingState};
pub use softmax::SoftmaxRanker;
