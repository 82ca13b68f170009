use docseg_chunker::{
    Boundary, LevelMode, MarkerIdentity, RegionEdge, RegionKind, RegionSignal, Token,
};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::chunker::FormatHints;
use crate::structural::{Grammar, StructuralChunker};

static SECTIONING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\\(part|chapter|section|subsection|subsubsection|paragraph|subparagraph)\b\*?",
    )
    .expect("valid sectioning regex")
});

static ENVIRONMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(begin|end)[ \t]*\{([A-Za-z]+\*?)\}").expect("valid environment regex")
});

/// Environments whose contents are never scanned for sectioning commands
const OPAQUE_ENVIRONMENTS: &[&str] = &[
    "verbatim",
    "Verbatim",
    "lstlisting",
    "minted",
    "comment",
    "equation",
    "align",
    "gather",
    "multline",
    "eqnarray",
    "displaymath",
    "math",
];

const HINTS: FormatHints = FormatHints {
    mime_types: &[
        "text/x-latex",
        "text/x-tex",
        "application/x-latex",
        "application/x-tex",
    ],
    extensions: &[".tex", ".latex", ".ltx"],
    names: &["latex", "tex"],
};

/// Sectioning commands from `\part` down to `\subparagraph`
#[derive(Debug, Clone, Copy, Default)]
pub struct LatexGrammar;

pub type LatexChunker = StructuralChunker<LatexGrammar>;

impl Grammar for LatexGrammar {
    fn name(&self) -> &'static str {
        "latex"
    }

    fn priority(&self) -> i32 {
        53
    }

    fn can_handle(&self, mime_type: &str, language: &str) -> bool {
        HINTS.matches(mime_type, language)
    }

    /// `\part` is depth 0, so levels start at 1 with a base of 1.
    fn level_mode(&self) -> LevelMode {
        LevelMode::Fixed { base: 1 }
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        for line in text.split_inclusive('\n') {
            let code = strip_comment(line);

            let signals = environment_signals(code);
            if !signals.is_empty() {
                for (position, (kind, edge)) in signals.into_iter().enumerate() {
                    let raw = if position == 0 { line } else { "" };
                    tokens.push(Token::Region(RegionSignal::new(kind, edge, raw)));
                }
                continue;
            }

            match sectioning_boundary(code, line) {
                Some(boundary) => tokens.push(Token::Boundary(boundary)),
                None => tokens.push(Token::text(line)),
            }
        }
        tokens
    }
}

fn command_depth(command: &str) -> usize {
    match command {
        "part" => 0,
        "chapter" => 1,
        "section" => 2,
        "subsection" => 3,
        "subsubsection" => 4,
        "paragraph" => 5,
        _ => 6,
    }
}

/// Everything before the first unescaped `%`
fn strip_comment(line: &str) -> &str {
    let mut backslashes = 0usize;
    for (index, byte) in line.bytes().enumerate() {
        match byte {
            b'\\' => backslashes += 1,
            b'%' if backslashes % 2 == 0 => return &line[..index],
            _ => backslashes = 0,
        }
    }
    line
}

fn environment_signals(code: &str) -> Vec<(RegionKind, RegionEdge)> {
    ENVIRONMENT
        .captures_iter(code)
        .filter(|caps| OPAQUE_ENVIRONMENTS.contains(&caps[2].trim_end_matches('*')))
        .map(|caps| {
            let edge = if &caps[1] == "begin" {
                RegionEdge::Begin
            } else {
                RegionEdge::End
            };
            (RegionKind::new(&caps[2]), edge)
        })
        .collect()
}

fn sectioning_boundary(code: &str, line: &str) -> Option<Boundary> {
    let caps = SECTIONING.captures(code)?;
    let command = caps.get(0)?;
    let depth = command_depth(&caps[1]);

    let mut rest = code[command.end()..].trim_start();
    let mut short_title = None;
    if let Some(after) = rest.strip_prefix('[') {
        let close = after.find(']')?;
        short_title = Some(after[..close].trim().to_string());
        rest = after[close + 1..].trim_start();
    }

    let title = balanced_group(rest)?;
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");

    let boundary = Boundary::new(MarkerIdentity::Depth(depth), title, line);
    Some(match short_title {
        Some(short) => boundary.with_short_title(short),
        None => boundary,
    })
}

/// Contents of a leading `{...}` group, honoring nested braces
fn balanced_group(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('{')?;
    let mut depth = 1usize;
    let mut escaped = false;
    for (index, c) in inner.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&inner[..index]);
                }
            }
            _ => {}
        }
    }
    None
}
