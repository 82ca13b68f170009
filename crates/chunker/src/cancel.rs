use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{ChunkerError, Result};

/// Cooperative cancellation signal shared between a caller and a running chunker.
///
/// Clones observe the same flag. Chunking loops call [`CancellationToken::check`]
/// once per input line or split piece.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns [`ChunkerError::Cancelled`] once the token has been cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(ChunkerError::Cancelled);
        }
        Ok(())
    }
}
