use serde::{Deserialize, Serialize};

/// Default hard byte bound for a chunk
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 8000;

/// Default advisory token budget
pub const DEFAULT_MAX_TOKENS: usize = 2000;

/// Default overlap between consecutive cascade chunks, in bytes
pub const DEFAULT_OVERLAP: usize = 200;

/// Per-call chunking options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkOptions {
    /// Hard upper bound on chunk content length in bytes
    pub max_chunk_size: usize,

    /// Token budget; reported against, never used to split
    pub max_tokens: usize,

    /// Bytes of trailing context repeated at the start of the next cascade chunk
    pub overlap: usize,

    /// Language or file-name hint used for chunker selection
    pub language: String,

    /// MIME type used for chunker selection
    pub mime_type: String,

    /// Prefer structure-preserving chunkers when one accepts the content
    pub preserve_structure: bool,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            max_tokens: DEFAULT_MAX_TOKENS,
            overlap: DEFAULT_OVERLAP,
            language: String::new(),
            mime_type: String::new(),
            preserve_structure: true,
        }
    }
}

impl ChunkOptions {
    /// Smaller chunks sized for embedding models
    pub fn for_embeddings() -> Self {
        Self {
            max_chunk_size: 2000,
            max_tokens: 512,
            overlap: 100,
            ..Default::default()
        }
    }

    /// Larger chunks for feeding whole sections into an LLM prompt
    pub fn for_llm_context() -> Self {
        Self {
            max_chunk_size: 16000,
            max_tokens: 4000,
            overlap: 400,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub const fn with_max_chunk_size(mut self, max_chunk_size: usize) -> Self {
        self.max_chunk_size = max_chunk_size;
        self
    }

    #[must_use]
    pub const fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    /// Validate configuration. An overlap as large as the chunk is not an
    /// error; it is clamped by [`effective_overlap`](Self::effective_overlap).
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_size == 0 {
            return Err("max_chunk_size must be > 0".to_string());
        }

        if self.max_tokens == 0 {
            return Err("max_tokens must be > 0".to_string());
        }

        Ok(())
    }

    /// Byte bound actually used for splitting; zero falls back to the default.
    #[must_use]
    pub const fn effective_max_chunk_size(&self) -> usize {
        if self.max_chunk_size == 0 {
            DEFAULT_MAX_CHUNK_SIZE
        } else {
            self.max_chunk_size
        }
    }

    /// Overlap actually used for splitting, see [`clamp_overlap`].
    #[must_use]
    pub const fn effective_overlap(&self) -> usize {
        clamp_overlap(self.overlap, self.effective_max_chunk_size())
    }
}

/// An overlap that would swallow the whole chunk is reduced to a quarter of it.
#[must_use]
pub const fn clamp_overlap(overlap: usize, max_size: usize) -> usize {
    if overlap >= max_size {
        max_size / 4
    } else {
        overlap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let options = ChunkOptions::default();
        assert_eq!(options.max_chunk_size, 8000);
        assert_eq!(options.max_tokens, 2000);
        assert_eq!(options.overlap, 200);
        assert!(options.preserve_structure);
        assert!(options.validate().is_ok());
        assert!(ChunkOptions::for_embeddings().validate().is_ok());
        assert!(ChunkOptions::for_llm_context().validate().is_ok());
    }

    #[test]
    fn validate_rejects_degenerate_sizes() {
        let zero = ChunkOptions::default().with_max_chunk_size(0);
        assert!(zero.validate().is_err());

        let no_tokens = ChunkOptions {
            max_tokens: 0,
            ..ChunkOptions::default()
        };
        assert!(no_tokens.validate().is_err());
    }

    #[test]
    fn swallowing_overlap_is_clamped_not_rejected() {
        let options = ChunkOptions::default()
            .with_max_chunk_size(100)
            .with_overlap(100);
        assert!(options.validate().is_ok());
        assert_eq!(options.effective_overlap(), 25);
    }

    #[test]
    fn effective_values_recover_from_bad_input() {
        let options = ChunkOptions::default()
            .with_max_chunk_size(0)
            .with_overlap(9000);
        assert_eq!(options.effective_max_chunk_size(), DEFAULT_MAX_CHUNK_SIZE);
        assert_eq!(options.effective_overlap(), DEFAULT_MAX_CHUNK_SIZE / 4);
        assert_eq!(clamp_overlap(10, 100), 10);
    }

    #[test]
    fn missing_fields_take_defaults_when_deserializing() {
        let options: ChunkOptions =
            serde_json::from_str(r#"{"max_chunk_size": 512, "mime_type": "text/markdown"}"#)
                .unwrap();
        assert_eq!(options.max_chunk_size, 512);
        assert_eq!(options.mime_type, "text/markdown");
        assert_eq!(options.overlap, DEFAULT_OVERLAP);
    }
}
