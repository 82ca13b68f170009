//! Token stream handed from a format grammar to the section builder.
//!
//! Grammars emit one token per source line (or per multi-line construct such
//! as an underlined title). When every token carries its raw source text, the
//! concatenated `raw` fields reproduce the input and section offsets are exact.

use crate::opaque::RegionKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Ordinary text, including its line terminator
    Text(String),
    /// A candidate heading
    Boundary(Boundary),
    /// Start or end of an opaque region
    Region(RegionSignal),
}

impl Token {
    pub fn text(line: impl Into<String>) -> Self {
        Self::Text(line.into())
    }

    /// Source text consumed by this token
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Boundary(boundary) => &boundary.raw,
            Self::Region(signal) => &signal.raw,
        }
    }
}

/// How a heading marker identifies its nesting depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerIdentity {
    /// Depth fixed by the marker itself (`##`, `==`, `\subsection`)
    Depth(usize),
    /// Adornment style whose depth is learned from document order (reStructuredText)
    Style { symbol: char, overlined: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    pub marker: MarkerIdentity,
    /// Display title used as heading and path element
    pub title: String,
    pub short_title: Option<String>,
    pub anchor: Option<String>,
    /// Source text of the marker; empty when the grammar has no source to point at
    pub raw: String,
}

impl Boundary {
    pub fn new(marker: MarkerIdentity, title: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            marker,
            title: title.into(),
            short_title: None,
            anchor: None,
            raw: raw.into(),
        }
    }

    #[must_use]
    pub fn with_short_title(mut self, short_title: impl Into<String>) -> Self {
        self.short_title = Some(short_title.into());
        self
    }

    #[must_use]
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionEdge {
    Begin,
    End,
    /// Same delimiter opens and closes (code fences)
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSignal {
    pub kind: RegionKind,
    pub edge: RegionEdge,
    pub raw: String,
}

impl RegionSignal {
    pub fn new(kind: RegionKind, edge: RegionEdge, raw: impl Into<String>) -> Self {
        Self {
            kind,
            edge,
            raw: raw.into(),
        }
    }
}
