//! Event-driven map session.
//!
//! A [`MapSession`] owns everything derived from one loaded dataset: the
//! marker registry, the current search query, the selected record shown in
//! the sidebar, and the outcome of the last query. UI events enter through
//! [`MapSession::process_event`]; each event is handled to completion before
//! the next one, so no caller ever observes a half-applied query.

use std::collections::BTreeMap;

use crate::classifier::{classify, Category};
use crate::config::MapConfig;
use crate::filter::{apply_query, QueryOutcome, SearchQuery};
use crate::presenter::render_detail;
use crate::record::{Bounds, LatLng, Record};
use crate::registry::{MarkerEntry, MarkerId, MarkerRegistry};
use crate::stats::{compute_stats, Stats};
use crate::surface::VisualSurface;

/// User interactions the session reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapEvent {
    /// The search field changed
    QueryChanged(String),
    /// The clear button was pressed
    QueryCleared,
    /// Pointer entered a marker
    MarkerHovered(MarkerId),
    /// Pointer left a marker
    MarkerUnhovered,
    /// A marker was clicked
    MarkerClicked(MarkerId),
    /// The map background was clicked
    MapClicked,
    /// The sidebar close button was pressed
    SidebarClosed,
}

/// Initial view of the map once loading completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapView {
    /// Fixed centre and zoom from the config
    Center { center: LatLng, zoom: u8 },
    /// Fit the view to these bounds
    Fit(Bounds),
}

/// All state derived from one loaded dataset.
#[derive(Debug)]
pub struct MapSession<S: VisualSurface> {
    registry: MarkerRegistry<S>,
    query: SearchQuery,
    selected: Option<MarkerId>,
    last_outcome: QueryOutcome,
    view: MapView,
}

impl<S: VisualSurface> MapSession<S> {
    /// Classifies and registers every record, then applies the empty query.
    pub fn from_records(records: Vec<Record>, surface: S, config: MapConfig) -> Self {
        let center = MapView::Center {
            center: config.center(),
            zoom: config.zoom,
        };
        let fit_to_markers = config.fit_to_markers;

        let mut registry = MarkerRegistry::new(surface, config);
        for record in records {
            let category = classify(&record);
            registry.register(record, category);
        }

        let view = match registry.bounds() {
            Some(bounds) if fit_to_markers => MapView::Fit(bounds),
            _ => center,
        };

        let query = SearchQuery::all();
        let last_outcome = apply_query(&mut registry, &query);

        let session = Self {
            registry,
            query,
            selected: None,
            last_outcome,
            view,
        };

        for (category, count) in session.category_counts() {
            tracing::info!(%category, count, "Markers by category");
        }
        session
    }

    /// Handles one event and returns the resulting counts.
    pub fn process_event(&mut self, event: MapEvent) -> Stats {
        match event {
            MapEvent::QueryChanged(raw) => {
                self.set_query(SearchQuery::new(&raw));
            }
            MapEvent::QueryCleared => {
                self.set_query(SearchQuery::all());
                self.registry.set_highlighted(None);
            }
            MapEvent::MarkerHovered(id) => {
                if self.registry.get(id).is_some() {
                    self.registry.set_highlighted(Some(id));
                }
            }
            MapEvent::MarkerUnhovered => {
                self.registry.set_highlighted(None);
            }
            MapEvent::MarkerClicked(id) => {
                if let Some(entry) = self.registry.get(id) {
                    tracing::debug!(marker = %id, record_id = %entry.record().id, "Marker selected");
                    self.selected = Some(id);
                    self.registry.set_highlighted(Some(id));
                }
            }
            MapEvent::MapClicked | MapEvent::SidebarClosed => {
                self.selected = None;
                self.registry.set_highlighted(None);
            }
        }
        self.stats()
    }

    fn set_query(&mut self, query: SearchQuery) {
        self.last_outcome = apply_query(&mut self.registry, &query);

        // A hidden marker keeps no highlight ring
        let hidden_highlight = self
            .registry
            .highlighted()
            .and_then(|id| self.registry.get(id))
            .is_some_and(|entry| !entry.is_visible());
        if hidden_highlight {
            self.registry.set_highlighted(None);
        }

        if !self.last_outcome.matched {
            tracing::warn!(query = %query, "No records match query");
        }
        self.query = query;
    }

    /// Counts re-derived from the registry.
    pub fn stats(&self) -> Stats {
        compute_stats(self.registry.entries())
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Outcome of the most recent query.
    pub fn last_outcome(&self) -> QueryOutcome {
        self.last_outcome
    }

    /// Whether the current query hides every marker.
    pub fn is_empty_result(&self) -> bool {
        !self.last_outcome.matched
    }

    pub fn selected(&self) -> Option<&MarkerEntry> {
        self.selected.and_then(|id| self.registry.get(id))
    }

    pub fn highlighted(&self) -> Option<MarkerId> {
        self.registry.highlighted()
    }

    /// Sidebar fragment for the selected record.
    pub fn detail_html(&self) -> Option<String> {
        self.selected().map(|entry| render_detail(entry.record()))
    }

    pub fn view(&self) -> MapView {
        self.view
    }

    pub fn registry(&self) -> &MarkerRegistry<S> {
        &self.registry
    }

    /// Number of markers per category, for legends and logs.
    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.registry.entries() {
            *counts.entry(entry.category()).or_insert(0) += 1;
        }
        counts
    }
}
