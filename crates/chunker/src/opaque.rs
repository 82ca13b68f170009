//! Tracking of regions whose contents must never be read as structure.

use std::fmt;

/// Identity of an opaque region, e.g. a fence style or an environment name.
///
/// Only the same kind can nest or close an active region.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionKind(String);

impl RegionKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Region tracker for one builder invocation.
///
/// The first region entered owns the tracker: entering or exiting any other
/// kind while it is active changes nothing. Re-entering the active kind nests,
/// and the region ends when its depth drops back to zero.
#[derive(Debug, Default)]
pub struct OpaqueRegionTracker {
    active: Option<ActiveRegion>,
}

#[derive(Debug)]
struct ActiveRegion {
    kind: RegionKind,
    depth: usize,
}

impl OpaqueRegionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, kind: &RegionKind) {
        if let Some(region) = &mut self.active {
            if region.kind == *kind {
                region.depth += 1;
            }
            return;
        }
        self.active = Some(ActiveRegion {
            kind: kind.clone(),
            depth: 1,
        });
    }

    pub fn exit(&mut self, kind: &RegionKind) {
        let Some(region) = &mut self.active else {
            return;
        };
        if region.kind != *kind {
            return;
        }
        region.depth -= 1;
        if region.depth == 0 {
            self.active = None;
        }
    }

    /// Symmetric delimiters (fences): closes the region if `kind` owns it, opens one otherwise.
    pub fn toggle(&mut self, kind: &RegionKind) {
        if self.active_kind() == Some(kind) {
            self.exit(kind);
        } else {
            self.enter(kind);
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn active_kind(&self) -> Option<&RegionKind> {
        self.active.as_ref().map(|region| &region.kind)
    }
}
