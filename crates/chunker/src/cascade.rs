//! Boundary-cascade splitting of text into size-bounded pieces.
//!
//! Text longer than the limit is split on the first separator of the cascade
//! that occurs in it; pieces still too long descend to the next separator.
//! Separators stay attached to the piece they terminate, so the pieces tile the
//! input and every piece is an exact byte range of it. Adjacent pieces are then
//! merged greedily up to the limit.

use std::ops::Range;

use crate::cancel::CancellationToken;
use crate::config::clamp_overlap;
use crate::error::Result;

/// Full cascade, coarsest first; `""` means "cut between characters".
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", ". ", "? ", "! ", "; ", ", ", " ", ""];

/// Paragraph-only cascade used to re-split oversized sections
pub const PARAGRAPH_SEPARATORS: &[&str] = &["\n\n"];

/// A piece of the input with its byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct CascadeSplitter {
    separators: Vec<String>,
}

impl Default for CascadeSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATORS.iter().copied())
    }
}

impl CascadeSplitter {
    pub fn new<I, S>(separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            separators: separators.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn paragraphs() -> Self {
        Self::new(PARAGRAPH_SEPARATORS.iter().copied())
    }

    #[must_use]
    pub fn separators(&self) -> &[String] {
        &self.separators
    }

    /// Split `text` into pieces of at most `max_size` bytes.
    ///
    /// A piece exceeds `max_size` only when it is a unit no separator in the
    /// cascade can break (no `""` separator, or a single wide character).
    /// Whitespace-only pieces are dropped. Each piece after the first starts
    /// with up to `overlap` bytes of the previous one, reduced as needed to stay
    /// within `max_size`.
    pub fn split<'a>(
        &self,
        text: &'a str,
        max_size: usize,
        overlap: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<Piece<'a>>> {
        let max_size = max_size.max(1);
        let overlap = clamp_overlap(overlap, max_size);
        let units = self.atomic_units(text, max_size, cancel)?;
        merge_units(text, &units, max_size, overlap, cancel)
    }

    fn atomic_units(
        &self,
        text: &str,
        max_size: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<Range<usize>>> {
        let mut units = Vec::new();
        let mut pending = vec![(0..text.len(), 0usize)];

        while let Some((range, level)) = pending.pop() {
            cancel.check()?;
            let slice = &text[range.clone()];
            if slice.len() <= max_size {
                if !slice.is_empty() {
                    units.push(range);
                }
                continue;
            }

            let next = self.separators[level..]
                .iter()
                .position(|sep| sep.is_empty() || slice.contains(sep.as_str()));
            let Some(offset) = next else {
                units.push(range);
                continue;
            };

            let depth = level + offset;
            let separator = &self.separators[depth];
            if separator.is_empty() {
                units.extend(char_cuts(text, range, max_size));
                continue;
            }

            let parts = split_keeping_separator(slice, separator);
            for part in parts.into_iter().rev() {
                pending.push((range.start + part.start..range.start + part.end, depth + 1));
            }
        }

        Ok(units)
    }
}

fn split_keeping_separator(text: &str, separator: &str) -> Vec<Range<usize>> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (position, matched) in text.match_indices(separator) {
        let end = position + matched.len();
        parts.push(start..end);
        start = end;
    }
    if start < text.len() {
        parts.push(start..text.len());
    }
    parts
}

fn char_cuts(text: &str, range: Range<usize>, max_size: usize) -> Vec<Range<usize>> {
    let mut cuts = Vec::new();
    let mut start = range.start;
    while start < range.end {
        let mut end = (start + max_size).min(range.end);
        while end > start && !text.is_char_boundary(end) {
            end -= 1;
        }
        if end == start {
            // a single character wider than the limit
            end = start + 1;
            while end < range.end && !text.is_char_boundary(end) {
                end += 1;
            }
        }
        cuts.push(start..end);
        start = end;
    }
    cuts
}

fn merge_units<'a>(
    text: &'a str,
    units: &[Range<usize>],
    max_size: usize,
    overlap: usize,
    cancel: &CancellationToken,
) -> Result<Vec<Piece<'a>>> {
    let mut pieces = Vec::new();
    let mut open: Option<Range<usize>> = None;

    for unit in units {
        cancel.check()?;
        open = Some(match open.take() {
            None => unit.clone(),
            Some(current) if unit.end - current.start <= max_size => current.start..unit.end,
            Some(current) => {
                let carried = overlap.min(max_size.saturating_sub(unit.len()));
                let start = overlap_start(text, &current, carried);
                push_piece(&mut pieces, text, current);
                start..unit.end
            }
        });
    }

    if let Some(current) = open {
        push_piece(&mut pieces, text, current);
    }
    Ok(pieces)
}

/// Start of the carried tail: at most `carried` bytes before `previous.end`, on a char boundary.
fn overlap_start(text: &str, previous: &Range<usize>, carried: usize) -> usize {
    let mut start = previous.end - carried.min(previous.len());
    while start < previous.end && !text.is_char_boundary(start) {
        start += 1;
    }
    start
}

fn push_piece<'a>(pieces: &mut Vec<Piece<'a>>, text: &'a str, range: Range<usize>) {
    let slice = &text[range.clone()];
    if slice.trim().is_empty() {
        return;
    }
    pieces.push(Piece {
        text: slice,
        start: range.start,
        end: range.end,
    });
}
