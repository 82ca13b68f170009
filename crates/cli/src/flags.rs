use clap::ValueEnum;
use docseg_chunker::{CharRatioEstimator, TokenEstimator, WordEstimator};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum EstimatorFlag {
    /// About four bytes per token
    Chars,
    /// About four tokens per three words
    Words,
}

impl EstimatorFlag {
    pub(crate) fn build(self) -> Box<dyn TokenEstimator> {
        match self {
            EstimatorFlag::Chars => Box::new(CharRatioEstimator::default()),
            EstimatorFlag::Words => Box::new(WordEstimator),
        }
    }
}
