use docseg_chunker::{ChunkContext, ChunkOptions, ChunkResult, Result};

/// A format-specific chunking strategy known to the registry.
pub trait Chunker: Send + Sync {
    /// Stable name reported as `chunker_used`
    fn name(&self) -> &str;

    /// Whether this chunker accepts content with the given MIME type and language hint
    fn can_handle(&self, mime_type: &str, language: &str) -> bool;

    /// Higher values are tried first
    fn priority(&self) -> i32;

    /// Whether output follows document structure (headings, sections)
    fn preserves_structure(&self) -> bool {
        false
    }

    fn chunk(
        &self,
        content: &[u8],
        options: &ChunkOptions,
        ctx: &ChunkContext<'_>,
    ) -> Result<ChunkResult>;
}

/// MIME types, file suffixes and language names a chunker accepts
#[derive(Debug, Clone, Copy)]
pub struct FormatHints {
    pub mime_types: &'static [&'static str],
    pub extensions: &'static [&'static str],
    pub names: &'static [&'static str],
}

impl FormatHints {
    /// MIME parameters (`; charset=...`) and case are ignored; the language hint
    /// matches a known name or ends with a known suffix.
    #[must_use]
    pub fn matches(&self, mime_type: &str, language: &str) -> bool {
        let mime = normalize_mime(mime_type);
        if !mime.is_empty() && self.mime_types.iter().any(|known| *known == mime) {
            return true;
        }

        let language = language.trim().to_ascii_lowercase();
        if language.is_empty() {
            return false;
        }
        self.names.iter().any(|name| *name == language)
            || self.extensions.iter().any(|ext| language.ends_with(ext))
    }
}

/// Lowercased MIME type without parameters
#[must_use]
pub fn normalize_mime(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
