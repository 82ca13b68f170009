use serde::{Deserialize, Serialize};

use crate::error::{ChunkerError, Result};

/// A contiguous piece of a document with its source position and metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based position in the output sequence
    pub index: usize,

    /// The chunk text
    pub content: String,

    /// Byte offset of the first byte in the original input
    pub start_offset: usize,

    /// Byte offset one past the last byte in the original input
    pub end_offset: usize,

    pub metadata: ChunkMetadata,
}

impl Chunk {
    #[must_use]
    pub const fn new(
        index: usize,
        content: String,
        start_offset: usize,
        end_offset: usize,
        metadata: ChunkMetadata,
    ) -> Self {
        Self {
            index,
            content,
            start_offset,
            end_offset,
            metadata,
        }
    }

    /// Length of the covered source range in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end_offset.saturating_sub(self.start_offset)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Heading attached to this chunk, empty for unstructured chunks
    #[must_use]
    pub fn heading(&self) -> &str {
        match &self.metadata.details {
            MetadataDetails::Document(doc) => &doc.heading,
            _ => "",
        }
    }
}

/// Metadata shared by every chunk plus format-specific details
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    pub kind: ChunkKind,

    /// Size estimate from the caller-supplied token estimator
    pub token_estimate: usize,

    pub details: MetadataDetails,
}

impl ChunkMetadata {
    #[must_use]
    pub const fn new(kind: ChunkKind, token_estimate: usize, details: MetadataDetails) -> Self {
        Self {
            kind,
            token_estimate,
            details,
        }
    }
}

/// Content category of a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    /// Plain prose or generic text
    Prose,
    Markdown,
    Code,
    /// One or more records of a structured file
    Structured,
    BuildTarget,
    SqlStatement,
    LogGroup,
    Unknown,
}

impl ChunkKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Prose => "prose",
            Self::Markdown => "markdown",
            Self::Code => "code",
            Self::Structured => "structured",
            Self::BuildTarget => "build_target",
            Self::SqlStatement => "sql_statement",
            Self::LogGroup => "log_group",
            Self::Unknown => "unknown",
        }
    }
}

/// Format-specific metadata, tagged by category
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetadataDetails {
    Document(DocumentMetadata),
    Code(CodeMetadata),
    Record(RecordMetadata),
    BuildTarget(BuildTargetMetadata),
    Statement(StatementMetadata),
    LogGroup(LogGroupMetadata),
    #[default]
    None,
}

/// Structural position of a document chunk
///
/// `heading_level == 0` means the chunk precedes every heading; heading and
/// section path are then empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub heading: String,
    pub heading_level: usize,

    /// Ancestor titles joined with `" > "`
    pub section_path: String,

    /// Short title when the format distinguishes one (LaTeX `\section[short]{long}`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_title: Option<String>,

    /// Explicit section id (AsciiDoc `[[id]]`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,

    /// Section contained a code fence, verbatim block or similar region
    pub has_code_block: bool,

    pub word_count: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_quality: Option<ExtractionQuality>,
}

/// Confidence in text recovered from a lossy source (scans, PDFs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionQuality {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeMetadata {
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordMetadata {
    pub first_record: usize,
    pub record_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildTargetMetadata {
    pub target_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatementMetadata {
    pub statement_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogGroupMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub entry_count: usize,
}

/// Non-fatal condition recorded while chunking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkWarning {
    /// Byte offset the warning refers to
    pub offset: usize,
    pub message: String,
    /// Stable machine-readable code, e.g. `CHUNKER_FAILED`
    pub code: String,
}

impl ChunkWarning {
    pub fn new(offset: usize, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
            code: code.into(),
        }
    }
}

/// Outcome of one chunking call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkResult {
    pub chunks: Vec<Chunk>,
    pub warnings: Vec<ChunkWarning>,
    pub total_chunks: usize,
    /// Name of the chunker that produced `chunks`
    pub chunker_used: String,
    /// Input length in bytes
    pub original_size: usize,
}

impl ChunkResult {
    pub fn new(chunker_used: impl Into<String>, original_size: usize, chunks: Vec<Chunk>) -> Self {
        Self {
            total_chunks: chunks.len(),
            chunks,
            warnings: Vec::new(),
            chunker_used: chunker_used.into(),
            original_size,
        }
    }

    /// Empty result for empty input
    pub fn empty(chunker_used: impl Into<String>) -> Self {
        Self::new(chunker_used, 0, Vec::new())
    }

    pub fn push_warning(&mut self, warning: ChunkWarning) {
        self.warnings.push(warning);
    }

    /// Check the output contract: contiguous indices, ordered offsets within
    /// `original_size`, and content length matching the covered range.
    pub fn validate(&self) -> Result<()> {
        if self.total_chunks != self.chunks.len() {
            return Err(ChunkerError::Other(format!(
                "total_chunks ({}) does not match chunk count ({})",
                self.total_chunks,
                self.chunks.len()
            )));
        }

        let mut previous_start = 0;
        for (position, chunk) in self.chunks.iter().enumerate() {
            if chunk.index != position {
                return Err(ChunkerError::Other(format!(
                    "chunk index {} found at position {position}",
                    chunk.index
                )));
            }
            if chunk.start_offset > chunk.end_offset
                || chunk.end_offset > self.original_size
                || chunk.start_offset < previous_start
                || chunk.end_offset - chunk.start_offset != chunk.content.len()
            {
                return Err(ChunkerError::InvalidBoundaries {
                    start: chunk.start_offset,
                    end: chunk.end_offset,
                });
            }
            previous_start = chunk.start_offset;
        }

        Ok(())
    }
}
