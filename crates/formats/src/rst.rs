use docseg_chunker::{
    Boundary, LevelMode, MarkerIdentity, RegionEdge, RegionKind, RegionSignal, Token,
};

use crate::chunker::FormatHints;
use crate::structural::{strip_newline, Grammar, StructuralChunker};

/// Punctuation allowed in section adornments
const ADORNMENT_CHARS: &str = "=-~^\"'+`#*:._";

const LITERAL_DIRECTIVES: &[&str] = &[".. code-block::", ".. code::", ".. sourcecode::"];

const HINTS: FormatHints = FormatHints {
    mime_types: &["text/x-rst", "text/restructuredtext"],
    extensions: &[".rst", ".rest"],
    names: &["rst", "restructuredtext"],
};

/// Underlined and overlined section titles, levels learned from document order
#[derive(Debug, Clone, Copy, Default)]
pub struct RstGrammar;

pub type RstChunker = StructuralChunker<RstGrammar>;

impl Grammar for RstGrammar {
    fn name(&self) -> &'static str {
        "rst"
    }

    fn priority(&self) -> i32 {
        55
    }

    fn can_handle(&self, mime_type: &str, language: &str) -> bool {
        HINTS.matches(mime_type, language)
    }

    fn level_mode(&self) -> LevelMode {
        LevelMode::Dynamic
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        let lines: Vec<&str> = text.split_inclusive('\n').collect();
        let mut tokens = Vec::with_capacity(lines.len());
        let mut in_literal = false;
        let mut index = 0;

        while index < lines.len() {
            let line = lines[index];
            let content = strip_newline(line);

            if in_literal {
                if content.trim().is_empty() || content.starts_with([' ', '\t']) {
                    tokens.push(Token::text(line));
                    index += 1;
                    continue;
                }
                tokens.push(Token::Region(RegionSignal::new(
                    literal_kind(),
                    RegionEdge::End,
                    "",
                )));
                in_literal = false;
            }

            let after_blank = index == 0 || strip_newline(lines[index - 1]).trim().is_empty();
            if after_blank {
                if let Some((boundary, consumed)) = title_at(&lines[index..]) {
                    tokens.push(Token::Boundary(boundary));
                    index += consumed;
                    continue;
                }
            }

            if opens_literal(content) {
                tokens.push(Token::Region(RegionSignal::new(
                    literal_kind(),
                    RegionEdge::Begin,
                    line,
                )));
                in_literal = true;
            } else {
                tokens.push(Token::text(line));
            }
            index += 1;
        }

        tokens
    }
}

fn literal_kind() -> RegionKind {
    RegionKind::new("literal-block")
}

fn opens_literal(content: &str) -> bool {
    let trimmed = content.trim_end();
    trimmed.ends_with("::") || LITERAL_DIRECTIVES.iter().any(|d| trimmed.starts_with(d))
}

/// Title with overline and underline, or title with underline, at the start of `lines`
fn title_at(lines: &[&str]) -> Option<(Boundary, usize)> {
    if let [over, title, under, ..] = lines {
        if let (Some(top), Some(bottom)) = (adornment(over), adornment(under)) {
            let text = strip_newline(title).trim();
            if top.symbol == bottom.symbol
                && is_title_text(text)
                && top.width >= width(text)
                && bottom.width >= width(text)
            {
                let marker = MarkerIdentity::Style {
                    symbol: top.symbol,
                    overlined: true,
                };
                let raw = format!("{over}{title}{under}");
                return Some((Boundary::new(marker, text, raw), 3));
            }
        }
    }

    if let [title, under, ..] = lines {
        let text = strip_newline(title);
        if text.starts_with([' ', '\t']) {
            return None;
        }
        let text = text.trim_end();
        let bottom = adornment(under)?;
        if is_title_text(text) && bottom.width >= width(text) {
            let marker = MarkerIdentity::Style {
                symbol: bottom.symbol,
                overlined: false,
            };
            let raw = format!("{title}{under}");
            return Some((Boundary::new(marker, text, raw), 2));
        }
    }

    None
}

struct Adornment {
    symbol: char,
    width: usize,
}

/// A line of at least two identical adornment characters
fn adornment(line: &str) -> Option<Adornment> {
    let content = strip_newline(line).trim_end();
    let symbol = content.chars().next()?;
    if !ADORNMENT_CHARS.contains(symbol) || !content.chars().all(|c| c == symbol) {
        return None;
    }
    let width = content.chars().count();
    (width >= 2).then_some(Adornment { symbol, width })
}

fn is_title_text(text: &str) -> bool {
    !text.is_empty() && !text.starts_with("..") && adornment(text).is_none()
}

fn width(text: &str) -> usize {
    text.chars().count()
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

    fn documents(text: &str) -> Vec<DocumentMetadata> {
        let cancel = CancellationToken::new();
        let estimator = CharRatioEstimator::default();
        let ctx = ChunkContext::new(&cancel, &estimator);
        let result = RstChunker::new(RstGrammar)
            .chunk(text.as_bytes(), &ChunkOptions::default(), &ctx)
            .unwrap();
        result.validate().unwrap();
        result
            .chunks
            .into_iter()
            .map(|chunk| match chunk.metadata.details {
                MetadataDetails::Document(doc) => doc,
                other => panic!("unexpected metadata {other:?}"),
            })
            .collect()
    }

    fn levels(text: &str) -> Vec<(usize, String)> {
        documents(text)
            .into_iter()
            .map(|doc| (doc.heading_level, doc.heading))
            .collect()
    }

    #[test]
    fn levels_follow_first_appearance() {
        let text = "One\n===\n\nfirst\n\nTwo\n---\n\nsecond\n\nThree\n=====\n\nthird\n";
        assert_eq!(
            levels(text),
            vec![
                (1, "One".to_string()),
                (2, "Two".to_string()),
                (1, "Three".to_string()),
            ]
        );
    }

    #[test]
    fn overline_is_a_distinct_style() {
        let text = "=====\nTitle\n=====\n\nintro\n\nSection\n=======\n\nbody\n\nSub\n---\n\nmore\n";
        let docs = documents(text);
        let summary: Vec<_> = docs
            .iter()
            .map(|doc| (doc.heading_level, doc.section_path.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, "Title"),
                (2, "Title > Section"),
                (3, "Title > Section > Sub"),
            ]
        );
    }

    #[test]
    fn short_underline_is_not_a_title() {
        let tokens = RstGrammar.tokenize("A long title\n===\n");
        assert_eq!(
            tokens,
            vec![Token::text("A long title\n"), Token::text("===\n")]
        );
    }

    #[test]
    fn mixed_adornment_is_not_a_title() {
        assert!(adornment("=-=-=-\n").is_none());
        assert!(adornment("=\n").is_none());
        assert_eq!(adornment("~~~~ \n").map(|a| a.width), Some(4));
    }

    #[test]
    fn directives_and_indented_text_are_not_titles() {
        let tokens = RstGrammar.tokenize(".. note\n=======\n");
        assert!(tokens.iter().all(|token| matches!(token, Token::Text(_))));

        let tokens = RstGrammar.tokenize("  Indented\n  ==========\n");
        assert!(tokens.iter().all(|token| matches!(token, Token::Text(_))));
    }

    #[test]
    fn literal_blocks_are_opaque() {
        let text = "Usage\n=====\n\nExample::\n\n    Fake\n    ====\n\nafter\n";
        let docs = documents(text);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].heading, "Usage");
        assert!(docs[0].has_code_block);
    }

    #[test]
    fn title_needs_a_blank_line_before_it() {
        let tokens = RstGrammar.tokenize("para line\nnext line\n---------\n");
        assert!(tokens.iter().all(|token| matches!(token, Token::Text(_))));
    }
}
