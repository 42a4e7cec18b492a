//! Marker counts.

use std::fmt;

use crate::registry::MarkerEntry;

/// Total and visible marker counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub visible: usize,
}

impl Stats {
    /// Number of entries hidden by the current filter.
    pub fn hidden(&self) -> usize {
        self.total - self.visible
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.visible, self.total)
    }
}

/// Derives counts from the entries. Always recomputed, never cached.
pub fn compute_stats(entries: &[MarkerEntry]) -> Stats {
    Stats {
        total: entries.len(),
        visible: entries.iter().filter(|e| e.is_visible()).count(),
    }
}
