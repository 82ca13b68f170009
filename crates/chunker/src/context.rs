use crate::cancel::CancellationToken;
use crate::estimate::TokenEstimator;

/// Collaborators handed to every chunking call
#[derive(Clone, Copy)]
pub struct ChunkContext<'a> {
    pub cancel: &'a CancellationToken,
    pub estimator: &'a dyn TokenEstimator,
}

impl<'a> ChunkContext<'a> {
    #[must_use]
    pub const fn new(cancel: &'a CancellationToken, estimator: &'a dyn TokenEstimator) -> Self {
        Self { cancel, estimator }
    }
}

impl std::fmt::Debug for ChunkContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkContext")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("estimator", &self.estimator.name())
            .finish()
    }
}
