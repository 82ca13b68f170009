use docseg_chunker::{
    count_words, CascadeSplitter, Chunk, ChunkContext, ChunkKind, ChunkMetadata, ChunkOptions,
    ChunkResult, ChunkerError, DocumentMetadata, MetadataDetails, Result,
};

use crate::chunker::{normalize_mime, Chunker};

/// Plain text split with the full separator cascade and overlap
#[derive(Debug, Clone, Default)]
pub struct RecursiveChunker {
    splitter: CascadeSplitter,
}

impl RecursiveChunker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_splitter(splitter: CascadeSplitter) -> Self {
        Self { splitter }
    }
}

impl Chunker for RecursiveChunker {
    fn name(&self) -> &str {
        "recursive"
    }

    fn can_handle(&self, mime_type: &str, _language: &str) -> bool {
        let mime = normalize_mime(mime_type);
        mime.is_empty() || mime.starts_with("text/")
    }

    fn priority(&self) -> i32 {
        10
    }

    fn chunk(
        &self,
        content: &[u8],
        options: &ChunkOptions,
        ctx: &ChunkContext<'_>,
    ) -> Result<ChunkResult> {
        if content.is_empty() {
            return Ok(ChunkResult::empty(self.name()));
        }

        let text = std::str::from_utf8(content).map_err(|err| {
            ChunkerError::parse(format!("recursive input is not valid UTF-8: {err}"))
        })?;

        let pieces = self.splitter.split(
            text,
            options.effective_max_chunk_size(),
            options.effective_overlap(),
            ctx.cancel,
        )?;

        let chunks = pieces
            .into_iter()
            .enumerate()
            .map(|(index, piece)| {
                let details = MetadataDetails::Document(DocumentMetadata {
                    word_count: count_words(piece.text),
                    ..Default::default()
                });
                let metadata =
                    ChunkMetadata::new(ChunkKind::Prose, ctx.estimator.estimate(piece.text), details);
                Chunk::new(index, piece.text.to_string(), piece.start, piece.end, metadata)
            })
            .collect();

        Ok(ChunkResult::new(self.name(), content.len(), chunks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docseg_chunker::{CancellationToken, CharRatioEstimator};

    #[test]
    fn splits_prose_with_overlap_within_bounds() {
        let text = "First sentence here. Second sentence follows. Third one ends it.\n\n".repeat(20);
        let cancel = CancellationToken::new();
        let estimator = CharRatioEstimator::default();
        let ctx = ChunkContext::new(&cancel, &estimator);
        let options = ChunkOptions::default()
            .with_max_chunk_size(200)
            .with_overlap(30);

        let result = RecursiveChunker::new()
            .chunk(text.as_bytes(), &options, &ctx)
            .unwrap();

        result.validate().unwrap();
        assert_eq!(result.chunker_used, "recursive");
        assert_eq!(result.original_size, text.len());
        assert!(result.total_chunks > 1);
        for chunk in &result.chunks {
            assert!(chunk.content.len() <= 200);
            assert_eq!(chunk.content, &text[chunk.start_offset..chunk.end_offset]);
            assert_eq!(chunk.metadata.kind, ChunkKind::Prose);
            assert_eq!(chunk.heading(), "");
        }
    }

    #[test]
    fn accepts_text_and_unknown_mime_types() {
        let chunker = RecursiveChunker::new();
        assert!(chunker.can_handle("", "anything"));
        assert!(chunker.can_handle("text/plain", ""));
        assert!(chunker.can_handle("text/x-python; charset=utf-8", ""));
        assert!(!chunker.can_handle("application/pdf", ""));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let cancel = CancellationToken::new();
        let estimator = CharRatioEstimator::default();
        let ctx = ChunkContext::new(&cancel, &estimator);
        let result = RecursiveChunker::new().chunk(&[0xff, 0xfe, b'a'], &ChunkOptions::default(), &ctx);
        assert!(matches!(result, Err(ChunkerError::ParseError(_))));
    }
}
