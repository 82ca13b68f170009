use docseg_chunker::{
    Boundary, LevelMode, MarkerIdentity, RegionEdge, RegionKind, RegionSignal, Token,
};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::chunker::FormatHints;
use crate::structural::{strip_newline, Grammar, StructuralChunker};

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(={1,6})[ \t]+(.+?)[ \t]*$").expect("valid heading regex"));

static ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\[\[([^\],\s]+)(?:,[^\]]*)?\]\]|\[#([^\].,\s]+)[^\]]*\])[ \t]*$")
        .expect("valid anchor regex")
});

const DELIMITER_CHARS: &[char] = &['-', '.', '/', '+', '*', '_'];

const HINTS: FormatHints = FormatHints {
    mime_types: &["text/asciidoc", "text/x-asciidoc"],
    extensions: &[".adoc", ".asciidoc", ".asc"],
    names: &["asciidoc", "adoc"],
};

/// `=` headings, `[[id]]` anchors and delimited blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiDocGrammar;

pub type AsciiDocChunker = StructuralChunker<AsciiDocGrammar>;

impl Grammar for AsciiDocGrammar {
    fn name(&self) -> &'static str {
        "asciidoc"
    }

    fn priority(&self) -> i32 {
        54
    }

    fn can_handle(&self, mime_type: &str, language: &str) -> bool {
        HINTS.matches(mime_type, language)
    }

    fn level_mode(&self) -> LevelMode {
        LevelMode::Fixed { base: 0 }
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        // anchor line waiting to see whether a heading follows
        let mut pending: Option<(&str, String)> = None;

        for line in text.split_inclusive('\n') {
            let content = strip_newline(line);

            if let Some(caps) = ANCHOR.captures(content) {
                if let Some((previous, _)) = pending.take() {
                    tokens.push(Token::text(previous));
                }
                let id = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
                pending = Some((line, id.to_string()));
                continue;
            }

            if let Some(caps) = HEADING.captures(content) {
                let depth = caps[1].len();
                let title = caps[2].trim();
                let boundary = match pending.take() {
                    Some((anchor_line, id)) => Boundary::new(
                        MarkerIdentity::Depth(depth),
                        title,
                        format!("{anchor_line}{line}"),
                    )
                    .with_anchor(id),
                    None => Boundary::new(MarkerIdentity::Depth(depth), title, line),
                };
                tokens.push(Token::Boundary(boundary));
                continue;
            }

            if let Some((previous, _)) = pending.take() {
                tokens.push(Token::text(previous));
            }

            if is_delimiter(content) {
                tokens.push(Token::Region(RegionSignal::new(
                    RegionKind::new(content.trim_end()),
                    RegionEdge::Toggle,
                    line,
                )));
            } else {
                tokens.push(Token::text(line));
            }
        }

        if let Some((previous, _)) = pending {
            tokens.push(Token::text(previous));
        }
        tokens
    }
}

/// A line of four or more identical block delimiter characters
fn is_delimiter(content: &str) -> bool {
    let content = content.trim_end();
    let mut chars = content.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    DELIMITER_CHARS.contains(&first) && content.len() >= 4 && chars.all(|c| c == first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::Chunker;
    use docseg_chunker::{
        CancellationToken, CharRatioEstimator, ChunkContext, ChunkOptions, DocumentMetadata,
        MetadataDetails,
    };
    use pretty_assertions::assert_eq;

    fn documents(text: &str) -> Vec<(String, DocumentMetadata)> {
        let cancel = CancellationToken::new();
        let estimator = CharRatioEstimator::default();
        let ctx = ChunkContext::new(&cancel, &estimator);
        let result = AsciiDocChunker::new(AsciiDocGrammar)
            .chunk(text.as_bytes(), &ChunkOptions::default(), &ctx)
            .unwrap();
        result.validate().unwrap();
        result
            .chunks
            .into_iter()
            .map(|chunk| match chunk.metadata.details {
                MetadataDetails::Document(doc) => (chunk.content, doc),
                other => panic!("unexpected metadata {other:?}"),
            })
            .collect()
    }

    #[test]
    fn equals_signs_map_to_levels() {
        let docs = documents("= Title\n\nintro\n\n== Part\n\ntext\n\n=== Detail\n\nmore\n");
        let summary: Vec<_> = docs
            .iter()
            .map(|(_, doc)| (doc.heading_level, doc.section_path.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![(1, "Title"), (2, "Title > Part"), (3, "Title > Part > Detail")]
        );
    }

    #[test]
    fn sibling_sections_share_the_document_root() {
        let docs = documents("= Doc\n\nIntro.\n\n== Sec A\n\nBody A.\n\n== Sec B\n\nBody B.\n");
        let paths: Vec<_> = docs.iter().map(|(_, doc)| doc.section_path.as_str()).collect();
        assert_eq!(paths, vec!["Doc", "Doc > Sec A", "Doc > Sec B"]);
    }

    #[test]
    fn anchor_moves_into_the_following_section() {
        let docs = documents("== First\n\nbody\n\n[[setup]]\n== Setup\n\nsteps\n");
        assert_eq!(docs.len(), 2);
        assert!(!docs[0].0.contains("[[setup]]"));
        assert!(docs[1].0.starts_with("[[setup]]\n== Setup\n"));
        assert_eq!(docs[1].1.anchor.as_deref(), Some("setup"));
    }

    #[test]
    fn block_id_syntax_is_an_anchor_too() {
        let docs = documents("[#intro]\n== Intro\n\nhi\n");
        assert_eq!(docs[0].1.anchor.as_deref(), Some("intro"));
    }

    #[test]
    fn delimited_blocks_hide_headings() {
        let text = "== Real\n\n----\n== inside listing\n....\n== still inside\n----\n\nafter\n";
        let docs = documents(text);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].1.heading, "Real");
        assert!(docs[0].1.has_code_block);
    }

    #[test]
    fn stray_anchor_stays_text() {
        let tokens = AsciiDocGrammar.tokenize("[[orphan]]\nplain\n");
        assert_eq!(
            tokens,
            vec![Token::text("[[orphan]]\n"), Token::text("plain\n")]
        );
    }

    #[test]
    fn delimiter_detection() {
        assert!(is_delimiter("----"));
        assert!(is_delimiter("________"));
        assert!(!is_delimiter("---"));
        assert!(!is_delimiter("--=-"));
        assert!(!is_delimiter("===="));
    }
}
