use indexmap::IndexMap;

use crate::token::MarkerIdentity;

/// How heading markers map to nesting levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelMode {
    /// Marker depth plus a per-grammar base
    Fixed { base: usize },
    /// Levels assigned to adornment styles in order of first appearance
    Dynamic,
}

/// Resolves marker identities to 1-based section levels.
///
/// A resolver lives for one builder invocation, so dynamic assignments never
/// leak between documents.
#[derive(Debug)]
pub struct LevelResolver {
    mode: LevelMode,
    seen: IndexMap<(char, bool), usize>,
}

impl LevelResolver {
    #[must_use]
    pub fn new(mode: LevelMode) -> Self {
        Self {
            mode,
            seen: IndexMap::new(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> LevelMode {
        self.mode
    }

    /// `None` when the marker does not fit the mode or resolves below level 1.
    pub fn resolve(&mut self, marker: MarkerIdentity) -> Option<usize> {
        match (self.mode, marker) {
            (LevelMode::Fixed { base }, MarkerIdentity::Depth(depth)) => {
                let level = depth + base;
                (level >= 1).then_some(level)
            }
            (LevelMode::Dynamic, MarkerIdentity::Style { symbol, overlined }) => {
                let next = self.seen.values().copied().max().unwrap_or(0) + 1;
                Some(*self.seen.entry((symbol, overlined)).or_insert(next))
            }
            _ => None,
        }
    }

    /// Styles seen so far with their levels, in first-seen order
    pub fn assignments(&self) -> impl Iterator<Item = (char, bool, usize)> + '_ {
        self.seen
            .iter()
            .map(|(&(symbol, overlined), &level)| (symbol, overlined, level))
    }
}
