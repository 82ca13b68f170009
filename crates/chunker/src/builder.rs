use std::mem;

use crate::cancel::CancellationToken;
use crate::error::Result;
use crate::levels::{LevelMode, LevelResolver};
use crate::opaque::OpaqueRegionTracker;
use crate::token::{Boundary, RegionEdge, Token};

/// Joins ancestor titles in a section path
pub const PATH_SEPARATOR: &str = " > ";

/// A heading plus the text up to the next heading at the same or a shallower level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Empty for the implicit section before the first heading
    pub heading: String,
    /// 0 for the implicit section, otherwise 1-based depth
    pub level: usize,
    pub section_path: String,
    pub short_title: Option<String>,
    pub anchor: Option<String>,
    pub text: String,
    pub start_offset: usize,
    pub end_offset: usize,
    /// An opaque region was open at some point inside this section
    pub has_opaque_region: bool,
}

impl Section {
    fn root() -> Self {
        Self::opening(String::new(), 0, String::new(), 0)
    }

    fn opening(heading: String, level: usize, section_path: String, start_offset: usize) -> Self {
        Self {
            heading,
            level,
            section_path,
            short_title: None,
            anchor: None,
            text: String::new(),
            start_offset,
            end_offset: start_offset,
            has_opaque_region: false,
        }
    }
}

/// Turns a token stream into sections, one builder per document.
///
/// Boundaries inside an opaque region, or with a marker the level mode cannot
/// resolve, are kept as plain text of the current section. Sections whose text
/// is only whitespace are dropped.
pub struct SectionBuilder<'a> {
    resolver: LevelResolver,
    tracker: OpaqueRegionTracker,
    headings: Vec<(usize, String)>,
    current: Section,
    sections: Vec<Section>,
    cursor: usize,
    cancel: &'a CancellationToken,
}

impl<'a> SectionBuilder<'a> {
    #[must_use]
    pub fn new(mode: LevelMode, cancel: &'a CancellationToken) -> Self {
        Self {
            resolver: LevelResolver::new(mode),
            tracker: OpaqueRegionTracker::new(),
            headings: Vec::new(),
            current: Section::root(),
            sections: Vec::new(),
            cursor: 0,
            cancel,
        }
    }

    pub fn push(&mut self, token: Token) -> Result<()> {
        self.cancel.check()?;

        match token {
            Token::Text(text) => self.append(&text),
            Token::Region(signal) => {
                let was_active = self.tracker.is_active();
                match signal.edge {
                    RegionEdge::Begin => self.tracker.enter(&signal.kind),
                    RegionEdge::End => self.tracker.exit(&signal.kind),
                    RegionEdge::Toggle => self.tracker.toggle(&signal.kind),
                }
                if was_active || self.tracker.is_active() {
                    self.current.has_opaque_region = true;
                }
                self.append(&signal.raw);
            }
            Token::Boundary(boundary) => {
                if self.tracker.is_active() {
                    log::debug!(
                        "Ignoring heading '{}' inside opaque region at offset {}",
                        boundary.title,
                        self.cursor
                    );
                    self.append_as_text(&boundary);
                    return Ok(());
                }
                match self.resolver.resolve(boundary.marker) {
                    Some(level) => self.open_section(level, boundary),
                    None => {
                        log::debug!(
                            "Unresolvable heading marker {:?} at offset {}",
                            boundary.marker,
                            self.cursor
                        );
                        self.append_as_text(&boundary);
                    }
                }
            }
        }

        Ok(())
    }

    /// Close the last section and return every non-empty section in order.
    #[must_use]
    pub fn finish(mut self) -> Vec<Section> {
        if let Some(kind) = self.tracker.active_kind() {
            log::debug!("Opaque region '{kind}' still open at end of input");
        }
        self.close_current();
        self.sections
    }

    fn open_section(&mut self, level: usize, boundary: Boundary) {
        self.close_current();

        while self
            .headings
            .last()
            .is_some_and(|(depth, _)| *depth >= level)
        {
            self.headings.pop();
        }
        self.headings.push((level, boundary.title.clone()));
        let path = self
            .headings
            .iter()
            .map(|(_, title)| title.as_str())
            .collect::<Vec<_>>()
            .join(PATH_SEPARATOR);

        let mut section = Section::opening(boundary.title, level, path, self.cursor);
        section.short_title = boundary.short_title;
        section.anchor = boundary.anchor;
        self.current = section;
        if boundary.raw.is_empty() {
            let seed = format!("{}\n\n", self.current.heading);
            self.append(&seed);
        } else {
            self.append(&boundary.raw);
        }
    }

    fn close_current(&mut self) {
        let replacement = Section::opening(String::new(), 0, String::new(), self.cursor);
        let mut section = mem::replace(&mut self.current, replacement);
        if section.text.trim().is_empty() {
            return;
        }
        section.end_offset = self.cursor;
        self.sections.push(section);
    }

    fn append(&mut self, text: &str) {
        self.current.text.push_str(text);
        self.cursor += text.len();
        self.current.end_offset = self.cursor;
    }

    /// Raw-less boundaries are synthesized text, so they advance the cursor like any other.
    fn append_as_text(&mut self, boundary: &Boundary) {
        if boundary.raw.is_empty() {
            let line = format!("{}\n", boundary.title);
            self.append(&line);
        } else {
            self.append(&boundary.raw);
        }
    }
}

/// Run a whole token stream through a fresh [`SectionBuilder`].
pub fn build_sections<I>(tokens: I, mode: LevelMode, cancel: &CancellationToken) -> Result<Vec<Section>>
where
    I: IntoIterator<Item = Token>,
{
    let mut builder = SectionBuilder::new(mode, cancel);
    for token in tokens {
        builder.push(token)?;
    }
    Ok(builder.finish())
}
