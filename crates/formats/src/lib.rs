//! # Docseg Formats
//!
//! Format grammars and the chunker registry built on `docseg-chunker`.
//!
//! ## Architecture
//!
//! ```text
//! bytes + ChunkOptions (mime type, language hint)
//!     │
//!     └──> ChunkerRegistry (priority order)
//!          ├─> rst       (55)  StructuralChunker<RstGrammar>
//!          ├─> asciidoc  (54)  StructuralChunker<AsciiDocGrammar>
//!          ├─> latex     (53)  StructuralChunker<LatexGrammar>
//!          ├─> markdown  (50)  StructuralChunker<MarkdownGrammar>
//!          ├─> recursive (10)  full separator cascade
//!          └─> fallback   (0)  fixed-size windows
//! ```
//!
//! A failing candidate is recorded as a warning and the next one runs.
//!
//! ## Example
//!
//! ```rust
//! use docseg_chunker::{CancellationToken, CharRatioEstimator, ChunkContext, ChunkOptions};
//! use docseg_formats::default_registry;
//!
//! let registry = default_registry();
//! let cancel = CancellationToken::new();
//! let estimator = CharRatioEstimator::default();
//! let ctx = ChunkContext::new(&cancel, &estimator);
//!
//! let options = ChunkOptions::default().with_mime_type("text/markdown");
//! let result = registry
//!     .chunk(b"# Intro\n\nHello.\n\n## Details\n\nMore.\n", &options, &ctx)
//!     .unwrap();
//! assert_eq!(result.chunker_used, "markdown");
//! assert_eq!(result.chunks[1].heading(), "Details");
//! ```

mod asciidoc;
mod chunker;
mod fallback;
mod latex;
mod markdown;
mod recursive;
mod registry;
mod rst;
mod structural;

pub use asciidoc::{AsciiDocChunker, AsciiDocGrammar};
pub use chunker::{normalize_mime, Chunker, FormatHints};
pub use fallback::FixedSizeChunker;
pub use latex::{LatexChunker, LatexGrammar};
pub use markdown::{MarkdownChunker, MarkdownGrammar};
pub use recursive::RecursiveChunker;
pub use registry::{default_registry, ChunkerRegistry, CHUNKER_FAILED, TOKEN_BUDGET_EXCEEDED};
pub use rst::{RstChunker, RstGrammar};
pub use structural::{Grammar, StructuralChunker};
