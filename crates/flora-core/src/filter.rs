//! Search filter over marker entries.
//!
//! Matching is a plain substring test on a per-record haystack. Every query
//! re-evaluates every entry; datasets are small enough that no incremental
//! bookkeeping is worth its staleness risk.

use std::fmt;

use crate::record::Record;
use crate::registry::MarkerRegistry;
use crate::surface::VisualSurface;

/// A normalized (trimmed, lower-cased) search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// The empty query, matching everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a record's haystack contains this query.
    pub fn matches(&self, record: &Record) -> bool {
        self.is_empty() || haystack(record).contains(&self.0)
    }
}

impl From<&str> for SearchQuery {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of applying a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOutcome {
    pub visible_count: usize,
    /// Whether at least one entry matched
    pub matched: bool,
}

/// Lower-cased, space-joined searchable text of a record.
///
/// Fields, in order: state, county, id, uuid, scientific name, common name.
/// Blank fields are left out.
pub fn haystack(record: &Record) -> String {
    [
        record.place_state_name.as_str(),
        record.place_county_name.as_str(),
        record.id.as_str(),
        record.uuid.as_deref().unwrap_or_default(),
        record.scientific_name.as_str(),
        record.common_name.as_str(),
    ]
    .into_iter()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// Recomputes visibility of every entry for `query`.
pub fn apply_query<S: VisualSurface>(
    registry: &mut MarkerRegistry<S>,
    query: &SearchQuery,
) -> QueryOutcome {
    let decisions: Vec<_> = registry
        .entries()
        .iter()
        .map(|entry| (entry.id(), query.matches(entry.record())))
        .collect();

    let mut visible_count = 0;
    let mut changed = 0;
    for (id, matches) in decisions {
        if registry.set_visible(id, matches) {
            changed += 1;
        }
        if matches {
            visible_count += 1;
        }
    }

    tracing::debug!(query = %query, visible_count, changed, "Applied search query");

    QueryOutcome {
        visible_count,
        matched: visible_count > 0,
    }
}
