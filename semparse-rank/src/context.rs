use std::rc::Rc;

use semparse_chart::{Derivation, SubParser, Tokenizer};
use semparse_feature::Featurizer;
use semparse_grammar::NormalizedGrammar;

use crate::error::RankError;

/// Everything a ranker needs to turn an utterance into candidate
/// derivations and feature vectors: the normalized grammar, a tokenizer,
/// any configured sub-parsers, and the featurizer used to score
/// derivations. Bundled so `fit`/`scoresAndParses`/etc. take one argument
/// instead of four.
pub struct ParsingContext<'a, D, T> {
    pub grammar: &'a NormalizedGrammar<D>,
    pub tokenizer: &'a T,
    pub sub_parsers: &'a [Box<dyn SubParser<D>>],
    pub featurizer: &'a dyn Featurizer<D>,
}

impl<'a, D, T> ParsingContext<'a, D, T>
where
    D: Clone,
    T: Tokenizer,
{
    pub fn parse(&self, utterance: &str) -> Result<Vec<Rc<Derivation<D>>>, RankError<T::Error>> {
        semparse_chart::parse(self.grammar, self.tokenizer, self.sub_parsers, utterance)
            .map_err(RankError::Tokenization)
    }
}
