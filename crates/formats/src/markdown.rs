use docseg_chunker::{
    Boundary, ChunkKind, LevelMode, MarkerIdentity, RegionEdge, RegionKind, RegionSignal, Token,
};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::chunker::FormatHints;
use crate::structural::{strip_newline, Grammar, StructuralChunker};

static ATX_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$").expect("valid heading regex")
});

static FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})").expect("valid fence regex"));

const HINTS: FormatHints = FormatHints {
    mime_types: &["text/markdown", "text/x-markdown"],
    extensions: &[".md", ".markdown"],
    names: &["markdown", "md"],
};

/// ATX headings with fenced code and HTML comments as opaque regions
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownGrammar;

pub type MarkdownChunker = StructuralChunker<MarkdownGrammar>;

impl Grammar for MarkdownGrammar {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn can_handle(&self, mime_type: &str, language: &str) -> bool {
        HINTS.matches(mime_type, language)
    }

    fn level_mode(&self) -> LevelMode {
        LevelMode::Fixed { base: 0 }
    }

    fn chunk_kind(&self) -> ChunkKind {
        ChunkKind::Markdown
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        text.split_inclusive('\n').map(classify_line).collect()
    }
}

fn classify_line(line: &str) -> Token {
    let content = strip_newline(line);

    if let Some(caps) = FENCE.captures(content) {
        let kind = if caps[1].starts_with('`') {
            "fence-backtick"
        } else {
            "fence-tilde"
        };
        return Token::Region(RegionSignal::new(
            RegionKind::new(kind),
            RegionEdge::Toggle,
            line,
        ));
    }

    let trimmed = content.trim_start();
    if trimmed.starts_with("<!--") && !trimmed.contains("-->") {
        return Token::Region(RegionSignal::new(comment_kind(), RegionEdge::Begin, line));
    }
    if !trimmed.starts_with("<!--") && trimmed.contains("-->") {
        return Token::Region(RegionSignal::new(comment_kind(), RegionEdge::End, line));
    }

    if let Some(caps) = ATX_HEADING.captures(content) {
        let depth = caps[1].len();
        // A bare `#` is an empty heading; it still opens a section.
        let title = caps.get(2).map_or("", |title| title.as_str().trim());
        return Token::Boundary(Boundary::new(MarkerIdentity::Depth(depth), title, line));
    }

    Token::text(line)
}

fn comment_kind() -> RegionKind {
    RegionKind::new("html-comment")
}
