use unicode_segmentation::UnicodeSegmentation;

/// Produces a size estimate for a chunk.
///
/// Estimators are built once by the host and shared by reference with every
/// chunking call.
pub trait TokenEstimator: Send + Sync {
    fn estimate(&self, text: &str) -> usize;

    fn name(&self) -> &str;
}

/// Bytes-per-token heuristic, rounding up (4 bytes per token by default)
#[derive(Debug, Clone, Copy)]
pub struct CharRatioEstimator {
    bytes_per_token: usize,
}

impl CharRatioEstimator {
    #[must_use]
    pub const fn new(bytes_per_token: usize) -> Self {
        Self {
            bytes_per_token: if bytes_per_token == 0 { 1 } else { bytes_per_token },
        }
    }
}

impl Default for CharRatioEstimator {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TokenEstimator for CharRatioEstimator {
    fn estimate(&self, text: &str) -> usize {
        text.len().div_ceil(self.bytes_per_token)
    }

    fn name(&self) -> &str {
        "chars"
    }
}

/// Word-based heuristic: roughly four tokens per three Unicode words
#[derive(Debug, Clone, Copy, Default)]
pub struct WordEstimator;

impl TokenEstimator for WordEstimator {
    fn estimate(&self, text: &str) -> usize {
        let words = count_words(text);
        (words * 4).div_ceil(3)
    }

    fn name(&self) -> &str {
        "words"
    }
}

/// Count Unicode words (UAX #29), ignoring punctuation and whitespace
#[must_use]
pub fn count_words(text: &str) -> usize {
    text.unicode_words().count()
}
