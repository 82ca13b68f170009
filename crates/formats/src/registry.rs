use std::cmp::Reverse;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use docseg_chunker::{ChunkContext, ChunkOptions, ChunkResult, ChunkWarning, ChunkerError, Result};

use crate::asciidoc::{AsciiDocChunker, AsciiDocGrammar};
use crate::chunker::Chunker;
use crate::fallback::FixedSizeChunker;
use crate::latex::{LatexChunker, LatexGrammar};
use crate::markdown::{MarkdownChunker, MarkdownGrammar};
use crate::recursive::RecursiveChunker;
use crate::rst::{RstChunker, RstGrammar};

/// Warning code for a candidate that failed before another one succeeded
pub const CHUNKER_FAILED: &str = "CHUNKER_FAILED";

/// Warning code for chunks whose estimate exceeds `max_tokens`
pub const TOKEN_BUDGET_EXCEEDED: &str = "TOKEN_BUDGET_EXCEEDED";

#[derive(Default)]
struct RegistryState {
    /// Sorted by descending priority, registration order among equals
    chunkers: Vec<Arc<dyn Chunker>>,
    fallback: Option<Arc<dyn Chunker>>,
}

/// Priority-ordered set of chunkers with an optional fallback.
///
/// Safe to share between threads; registration takes a write lock, chunking
/// only holds the read lock long enough to pick candidates.
#[derive(Default)]
pub struct ChunkerRegistry {
    state: RwLock<RegistryState>,
}

impl ChunkerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<C: Chunker + 'static>(&self, chunker: C) {
        self.register_shared(Arc::new(chunker));
    }

    pub fn register_shared(&self, chunker: Arc<dyn Chunker>) {
        log::debug!(
            "Registering chunker '{}' (priority {})",
            chunker.name(),
            chunker.priority()
        );
        let mut state = self.write();
        state.chunkers.push(chunker);
        state.chunkers.sort_by_key(|c| Reverse(c.priority()));
    }

    pub fn set_fallback<C: Chunker + 'static>(&self, chunker: C) {
        self.write().fallback = Some(Arc::new(chunker));
    }

    /// Highest-priority chunker accepting the hints, ignoring the fallback
    #[must_use]
    pub fn get(&self, mime_type: &str, language: &str) -> Option<Arc<dyn Chunker>> {
        self.read()
            .chunkers
            .iter()
            .find(|c| c.can_handle(mime_type, language))
            .cloned()
    }

    /// Registered chunkers in priority order
    #[must_use]
    pub fn list(&self) -> Vec<Arc<dyn Chunker>> {
        self.read().chunkers.clone()
    }

    #[must_use]
    pub fn fallback(&self) -> Option<Arc<dyn Chunker>> {
        self.read().fallback.clone()
    }

    /// Chunk `content` with the best accepting chunker.
    ///
    /// Candidates are tried in priority order; a failure, or output that breaks
    /// the offset contract, is recorded as a `CHUNKER_FAILED` warning and the
    /// next candidate runs. The fallback runs last. Cancellation stops the
    /// whole call.
    pub fn chunk(
        &self,
        content: &[u8],
        options: &ChunkOptions,
        ctx: &ChunkContext<'_>,
    ) -> Result<ChunkResult> {
        let (candidates, fallback) = self.candidates(options);
        if candidates.is_empty() && fallback.is_none() {
            return Err(ChunkerError::NoChunker {
                mime_type: options.mime_type.clone(),
                language: options.language.clone(),
            });
        }

        let mut warnings = Vec::new();
        let mut attempts = 0;
        let mut last_error = String::new();

        for chunker in candidates.iter().chain(fallback.iter()) {
            attempts += 1;
            match attempt(chunker.as_ref(), content, options, ctx) {
                Ok(mut result) => {
                    warnings.append(&mut result.warnings);
                    result.warnings = warnings;
                    flag_token_overruns(&mut result, options.max_tokens);
                    return Ok(result);
                }
                Err(err) if err.is_cancelled() => return Err(err),
                Err(err) => {
                    log::warn!("Chunker '{}' failed: {err}", chunker.name());
                    warnings.push(ChunkWarning::new(
                        0,
                        CHUNKER_FAILED,
                        format!("{} failed: {err}", chunker.name()),
                    ));
                    last_error = err.to_string();
                }
            }
        }

        Err(ChunkerError::AllChunkersFailed {
            attempts,
            last_error,
        })
    }

    fn candidates(
        &self,
        options: &ChunkOptions,
    ) -> (Vec<Arc<dyn Chunker>>, Option<Arc<dyn Chunker>>) {
        let state = self.read();
        let candidates = state
            .chunkers
            .iter()
            .filter(|c| c.can_handle(&options.mime_type, &options.language))
            .filter(|c| options.preserve_structure || !c.preserves_structure())
            .cloned()
            .collect();
        (candidates, state.fallback.clone())
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn attempt(
    chunker: &dyn Chunker,
    content: &[u8],
    options: &ChunkOptions,
    ctx: &ChunkContext<'_>,
) -> Result<ChunkResult> {
    let result = chunker.chunk(content, options, ctx)?;
    result.validate()?;
    Ok(result)
}

fn flag_token_overruns(result: &mut ChunkResult, max_tokens: usize) {
    if max_tokens == 0 {
        return;
    }
    let over: Vec<_> = result
        .chunks
        .iter()
        .filter(|chunk| chunk.metadata.token_estimate > max_tokens)
        .collect();
    let Some(first) = over.first() else {
        return;
    };
    let largest = over
        .iter()
        .map(|chunk| chunk.metadata.token_estimate)
        .max()
        .unwrap_or_default();
    let warning = ChunkWarning::new(
        first.start_offset,
        TOKEN_BUDGET_EXCEEDED,
        format!(
            "{} chunks exceed max_tokens {max_tokens} (largest estimate {largest})",
            over.len()
        ),
    );
    result.push_warning(warning);
}

/// Registry with every built-in chunker and the fixed-size fallback
#[must_use]
pub fn default_registry() -> ChunkerRegistry {
    let registry = ChunkerRegistry::new();
    registry.register(RstChunker::new(RstGrammar));
    registry.register(AsciiDocChunker::new(AsciiDocGrammar));
    registry.register(LatexChunker::new(LatexGrammar));
    registry.register(MarkdownChunker::new(MarkdownGrammar));
    registry.register(RecursiveChunker::new());
    registry.set_fallback(FixedSizeChunker::new());
    registry
}
