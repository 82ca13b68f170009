//! # Docseg Chunker
//!
//! Structure-aware splitting of documents into retrieval-sized chunks.
//!
//! ## Philosophy
//!
//! Chunks should follow the author's own structure:
//! - Headings open sections, and each chunk knows its heading path
//! - Code fences, verbatim blocks and math are never read as headings
//! - Size limits are hard, but paragraphs are only broken when they must be
//! - Every chunk points back to an exact byte range of the input
//!
//! ## Architecture
//!
//! ```text
//! Format grammar (Markdown, AsciiDoc, LaTeX, reStructuredText, ...)
//!     │
//!     └──> Token stream: Text | Boundary | Region
//!              │
//!              ├──> OpaqueRegionTracker  (suppress boundaries inside regions)
//!              ├──> LevelResolver        (fixed depth or first-seen styles)
//!              │
//!              └──> SectionBuilder → Section[]
//!                       │
//!                       └──> assemble_chunks
//!                                ├─> fits: one chunk per section
//!                                └─> too big: CascadeSplitter on paragraphs
//! ```
//!
//! Plain text skips the grammar and goes straight to [`CascadeSplitter`]
//! with the full separator cascade.
//!
//! ## Example
//!
//! ```rust
//! use docseg_chunker::{
//!     assemble_chunks, build_sections, Boundary, CancellationToken, CharRatioEstimator,
//!     ChunkContext, ChunkKind, ChunkOptions, LevelMode, MarkerIdentity, Token,
//! };
//!
//! let tokens = vec![
//!     Token::Boundary(Boundary::new(MarkerIdentity::Depth(1), "Intro", "# Intro\n")),
//!     Token::text("Hello.\n"),
//! ];
//! let cancel = CancellationToken::new();
//! let sections = build_sections(tokens, LevelMode::Fixed { base: 0 }, &cancel).unwrap();
//!
//! let estimator = CharRatioEstimator::default();
//! let ctx = ChunkContext::new(&cancel, &estimator);
//! let chunks = assemble_chunks(&sections, &ChunkOptions::default(), ChunkKind::Markdown, &ctx).unwrap();
//! assert_eq!(chunks[0].heading(), "Intro");
//! ```

mod assemble;
mod builder;
mod cancel;
mod cascade;
mod config;
mod context;
mod error;
mod estimate;
mod levels;
mod opaque;
mod token;
mod types;

pub use assemble::assemble_chunks;
pub use builder::{build_sections, Section, SectionBuilder, PATH_SEPARATOR};
pub use cancel::CancellationToken;
pub use cascade::{CascadeSplitter, Piece, DEFAULT_SEPARATORS, PARAGRAPH_SEPARATORS};
pub use config::{
    clamp_overlap, ChunkOptions, DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MAX_TOKENS, DEFAULT_OVERLAP,
};
pub use context::ChunkContext;
pub use error::{ChunkerError, Result};
pub use estimate::{count_words, CharRatioEstimator, TokenEstimator, WordEstimator};
pub use levels::{LevelMode, LevelResolver};
pub use opaque::{OpaqueRegionTracker, RegionKind};
pub use token::{Boundary, MarkerIdentity, RegionEdge, RegionSignal, Token};
pub use types::{
    BuildTargetMetadata, Chunk, ChunkKind, ChunkMetadata, ChunkResult, ChunkWarning,
    CodeMetadata, DocumentMetadata, ExtractionQuality, LogGroupMetadata, MetadataDetails,
    RecordMetadata, StatementMetadata,
};
