use std::borrow::Cow;
use std::path::Path;

use docseg_chunker::{
    Chunk, ChunkContext, ChunkKind, ChunkMetadata, ChunkOptions, ChunkResult, ChunkWarning,
    CodeMetadata, MetadataDetails, Result,
};

use crate::chunker::Chunker;

/// How far back from a window end to look for whitespace to break on
const BREAK_SEARCH_WINDOW: usize = 100;

/// Stands in for each byte of an invalid UTF-8 sequence
const SUBSTITUTE: char = '?';

/// Fixed-size windows for content no other chunker accepts
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSizeChunker;

impl FixedSizeChunker {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Chunker for FixedSizeChunker {
    fn name(&self) -> &str {
        "fallback"
    }

    fn can_handle(&self, _mime_type: &str, _language: &str) -> bool {
        true
    }

    fn priority(&self) -> i32 {
        0
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

        let decoded = decode_bytewise(content);
        let lossy = matches!(decoded, Cow::Owned(_));
        let text = decoded.as_ref();

        let max_size = options.effective_max_chunk_size();
        let overlap = options.effective_overlap();
        let language = language_label(&options.language);

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < text.len() {
            ctx.cancel.check()?;

            let end = window_end(text, start, max_size);
            let piece = &text[start..end];
            if !piece.trim().is_empty() {
                chunks.push(Chunk::new(
                    chunks.len(),
                    piece.to_string(),
                    start,
                    end,
                    metadata(piece, language, ctx),
                ));
            }
            if end >= text.len() {
                break;
            }

            let next = ceil_char_boundary(text, end.saturating_sub(overlap));
            start = if next > start { next } else { end };
        }

        let mut result = ChunkResult::new(self.name(), content.len(), chunks);
        if lossy {
            result.push_warning(ChunkWarning::new(
                0,
                "LOSSY_DECODE",
                format!("input is not valid UTF-8; invalid bytes were replaced with '{SUBSTITUTE}'"),
            ));
        }
        Ok(result)
    }
}

fn metadata(piece: &str, language: Option<&str>, ctx: &ChunkContext<'_>) -> ChunkMetadata {
    let estimate = ctx.estimator.estimate(piece);
    match language {
        Some(language) => ChunkMetadata::new(
            ChunkKind::Code,
            estimate,
            MetadataDetails::Code(CodeMetadata {
                language: language.to_string(),
                symbol_name: None,
            }),
        ),
        None => ChunkMetadata::new(ChunkKind::Unknown, estimate, MetadataDetails::None),
    }
}

/// Decode `content`, replacing every byte of an invalid sequence with one
/// ASCII substitute so byte offsets in the result match the input exactly.
fn decode_bytewise(content: &[u8]) -> Cow<'_, str> {
    let mut rest = match std::str::from_utf8(content) {
        Ok(text) => return Cow::Borrowed(text),
        Err(_) => content,
    };

    let mut decoded = String::with_capacity(content.len());
    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(text) => {
                decoded.push_str(text);
                break;
            }
            Err(error) => {
                let (valid, after) = rest.split_at(error.valid_up_to());
                if let Ok(text) = std::str::from_utf8(valid) {
                    decoded.push_str(text);
                }
                let invalid = error.error_len().unwrap_or(after.len());
                decoded.extend(std::iter::repeat(SUBSTITUTE).take(invalid));
                rest = &after[invalid..];
            }
        }
    }
    debug_assert_eq!(decoded.len(), content.len());
    Cow::Owned(decoded)
}

/// Language name from a hint that may be a file name (`main.go` -> `go`)
fn language_label(hint: &str) -> Option<&str> {
    let hint = hint.trim();
    let label = Path::new(hint)
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or(hint);
    (!label.is_empty()).then_some(label)
}

/// End of the window starting at `start`, preferring to stop just after whitespace
fn window_end(text: &str, start: usize, max_size: usize) -> usize {
    let limit = start + max_size;
    if limit >= text.len() {
        return text.len();
    }

    let mut end = floor_char_boundary(text, limit);
    if end <= start {
        return ceil_char_boundary(text, start + 1);
    }

    let search_from = ceil_char_boundary(text, end.saturating_sub(BREAK_SEARCH_WINDOW).max(start + 1));
    if search_from < end {
        if let Some((offset, c)) = text[search_from..end]
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
        {
            end = search_from + offset + c.len_utf8();
        }
    }
    end
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index.min(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docseg_chunker::{CancellationToken, CharRatioEstimator, ChunkerError};
    use pretty_assertions::assert_eq;

    fn run(content: &[u8], options: &ChunkOptions) -> ChunkResult {
        let cancel = CancellationToken::new();
        let estimator = CharRatioEstimator::default();
        let ctx = ChunkContext::new(&cancel, &estimator);
        FixedSizeChunker::new().chunk(content, options, &ctx).unwrap()
    }

    #[test]
    fn windows_break_on_whitespace_and_overlap() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let options = ChunkOptions::default().with_max_chunk_size(20).with_overlap(5);
        let result = run(text.as_bytes(), &options);

        result.validate().unwrap();
        assert!(result.total_chunks > 2);
        for chunk in &result.chunks {
            assert!(chunk.content.len() <= 20);
            assert_eq!(chunk.content, &text[chunk.start_offset..chunk.end_offset]);
        }
        assert_eq!(result.chunks[0].content, "alpha beta gamma ");
        for pair in result.chunks.windows(2) {
            assert!(pair[1].start_offset < pair[0].end_offset);
        }
        assert_eq!(result.chunks.last().unwrap().end_offset, text.len());
    }

    #[test]
    fn language_hint_marks_chunks_as_code() {
        let options = ChunkOptions::default().with_language("src/main.go");
        let result = run(b"package main\n", &options);
        assert_eq!(result.chunks[0].metadata.kind, ChunkKind::Code);
        assert_eq!(
            result.chunks[0].metadata.details,
            MetadataDetails::Code(CodeMetadata {
                language: "go".to_string(),
                symbol_name: None,
            })
        );

        let unknown = run(b"data", &ChunkOptions::default());
        assert_eq!(unknown.chunks[0].metadata.kind, ChunkKind::Unknown);
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily_with_warning() {
        let result = run(&[b'o', b'k', 0xff, b'!'], &ChunkOptions::default());
        assert_eq!(result.chunks[0].content, "ok?!");
        assert_eq!(result.warnings[0].code, "LOSSY_DECODE");
        result.validate().unwrap();
    }

    #[test]
    fn lossy_offsets_refer_to_input_bytes() {
        let input = [0xff, 0xfe, b'a', b'b'];
        let result = run(&input, &ChunkOptions::default());

        result.validate().unwrap();
        assert_eq!(result.original_size, input.len());
        assert_eq!(result.chunks[0].end_offset, input.len());
        assert_eq!(result.chunks[0].content, "??ab");
    }

    #[test]
    fn truncated_sequence_keeps_valid_neighbours() {
        let mut input = "é".as_bytes().to_vec();
        input.push(0xe6);
        input.extend_from_slice("日".as_bytes());
        let decoded = decode_bytewise(&input);
        assert_eq!(decoded, "é?日");
        assert_eq!(decoded.len(), input.len());
    }

    #[test]
    fn multibyte_text_never_splits_a_character() {
        let text = "日本語のテキスト".repeat(10);
        let options = ChunkOptions::default().with_max_chunk_size(10).with_overlap(0);
        let result = run(text.as_bytes(), &options);
        let rebuilt: String = result.chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn cancellation_is_observed() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let estimator = CharRatioEstimator::default();
        let ctx = ChunkContext::new(&cancel, &estimator);
        let result = FixedSizeChunker::new().chunk(b"abc", &ChunkOptions::default(), &ctx);
        assert!(matches!(result, Err(ChunkerError::Cancelled)));
    }
}
