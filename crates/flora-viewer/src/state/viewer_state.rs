//! Top-level viewer state.
//!
//! Lives inside a single Dioxus `Signal`, so every UI event is applied to
//! completion before the next one is read.

use flora_core::{
    LoadError, MapConfig, MapEvent, MapSession, MarkerEntry, MarkerId, Record, Stats,
};

use super::LayerSurface;

/// Where the dataset load currently stands.
#[derive(Debug)]
pub enum LoadPhase {
    Loading,
    Ready(MapSession<LayerSurface>),
    Failed(String),
}

/// Main application state for the map viewer.
#[derive(Debug)]
pub struct ViewerState {
    pub config: MapConfig,
    /// Human-readable name of the dataset being shown
    pub source: String,
    phase: LoadPhase,
    search_text: String,
    popup: Option<MarkerId>,
}

impl ViewerState {
    pub fn new(config: MapConfig, source: impl Into<String>) -> Self {
        Self {
            config,
            source: source.into(),
            phase: LoadPhase::Loading,
            search_text: String::new(),
            popup: None,
        }
    }

    /// Builds the session from freshly loaded records.
    ///
    /// A query typed while loading is applied straight away.
    pub fn install(&mut self, records: Vec<Record>) {
        let session = MapSession::from_records(records, LayerSurface::new(), self.config.clone());
        tracing::info!(
            source = %self.source,
            markers = session.registry().len(),
            "Map ready"
        );
        self.phase = LoadPhase::Ready(session);
        self.popup = None;

        if !self.search_text.trim().is_empty() {
            let text = self.search_text.clone();
            self.dispatch(MapEvent::QueryChanged(text));
        }
    }

    /// Records a failed load. No markers are created.
    pub fn fail(&mut self, error: &LoadError) {
        tracing::error!(source = %self.source, kind = error.kind(), %error, "Failed to load dataset");
        self.phase = LoadPhase::Failed(format!(
            "No se pudo cargar {}: {}",
            self.source, error
        ));
        self.popup = None;
    }

    /// Routes an event to the session. Returns `None` until a dataset is
    /// loaded.
    pub fn dispatch(&mut self, event: MapEvent) -> Option<Stats> {
        let LoadPhase::Ready(session) = &mut self.phase else {
            return None;
        };

        match &event {
            MapEvent::MarkerClicked(id) => self.popup = Some(*id),
            MapEvent::MapClicked => self.popup = None,
            _ => {}
        }

        let stats = session.process_event(event);

        // Popups belong to their marker and vanish with it
        if let Some(id) = self.popup {
            let visible = session.registry().get(id).is_some_and(|e| e.is_visible());
            if !visible {
                self.popup = None;
            }
        }
        Some(stats)
    }

    /// Updates the search field and applies it.
    pub fn set_search(&mut self, text: String) {
        self.search_text = text.clone();
        self.dispatch(MapEvent::QueryChanged(text));
    }

    /// Empties the search field and shows every marker.
    pub fn clear_search(&mut self) {
        self.search_text.clear();
        self.dispatch(MapEvent::QueryCleared);
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn session(&self) -> Option<&MapSession<LayerSurface>> {
        match &self.phase {
            LoadPhase::Ready(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, LoadPhase::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            LoadPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn stats(&self) -> Stats {
        self.session().map(|s| s.stats()).unwrap_or_default()
    }

    /// Entry whose popup is open, with the popup fragment.
    pub fn popup(&self) -> Option<(&MarkerEntry, &str)> {
        let session = self.session()?;
        let entry = session.registry().get(self.popup?)?;
        let html = session.registry().surface().popup(entry.handle())?;
        Some((entry, html))
    }

    /// Notice shown when the current query hides every marker.
    pub fn empty_result_notice(&self) -> Option<String> {
        let session = self.session()?;
        session.is_empty_result().then(|| {
            format!(
                "Sin resultados para \u{201c}{}\u{201d}",
                session.query().as_str()
            )
        })
    }
}
