use docseg_chunker::{
    assemble_chunks, build_sections, ChunkContext, ChunkKind, ChunkOptions, ChunkResult,
    ChunkerError, LevelMode, Result, Token,
};

use crate::chunker::Chunker;

/// Turns document text into a token stream for the section builder.
///
/// Implementations only recognize syntax; nesting, region suppression and
/// size limits are handled by the shared pipeline in [`StructuralChunker`].
pub trait Grammar: Send + Sync {
    fn name(&self) -> &'static str;

    fn priority(&self) -> i32;

    fn can_handle(&self, mime_type: &str, language: &str) -> bool;

    fn level_mode(&self) -> LevelMode;

    fn chunk_kind(&self) -> ChunkKind {
        ChunkKind::Prose
    }

    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// Chunker that drives the section builder with a format grammar
#[derive(Debug, Default)]
pub struct StructuralChunker<G> {
    grammar: G,
}

impl<G: Grammar> StructuralChunker<G> {
    pub const fn new(grammar: G) -> Self {
        Self { grammar }
    }

    pub const fn grammar(&self) -> &G {
        &self.grammar
    }
}

impl<G: Grammar> Chunker for StructuralChunker<G> {
    fn name(&self) -> &str {
        self.grammar.name()
    }

    fn can_handle(&self, mime_type: &str, language: &str) -> bool {
        self.grammar.can_handle(mime_type, language)
    }

    fn priority(&self) -> i32 {
        self.grammar.priority()
    }

    fn preserves_structure(&self) -> bool {
        true
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
            ChunkerError::parse(format!("{} input is not valid UTF-8: {err}", self.name()))
        })?;

        let tokens = self.grammar.tokenize(text);
        let sections = build_sections(tokens, self.grammar.level_mode(), ctx.cancel)?;
        let chunks = assemble_chunks(&sections, options, self.grammar.chunk_kind(), ctx)?;

        log::debug!(
            "{}: {} sections -> {} chunks from {} bytes",
            self.name(),
            sections.len(),
            chunks.len(),
            content.len()
        );

        Ok(ChunkResult::new(self.name(), content.len(), chunks))
    }
}

/// Line content without its terminator
pub(crate) fn strip_newline(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}
