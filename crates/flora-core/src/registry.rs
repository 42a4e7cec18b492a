//! Marker registry: the authoritative record → marker mapping.
//!
//! The registry owns one [`MarkerEntry`] per loaded record, in load order,
//! together with the single highlight slot. It is the only component that
//! touches the [`VisualSurface`]; everything else reads entries through
//! [`MarkerRegistry::entries`].

use std::fmt;

use crate::classifier::Category;
use crate::config::MapConfig;
use crate::presenter::render_summary;
use crate::record::{Bounds, Record};
use crate::surface::{MarkerHandle, VisualSurface};

/// Position of an entry in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(usize);

impl MarkerId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A record paired with its on-map marker and visibility.
#[derive(Debug, Clone)]
pub struct MarkerEntry {
    id: MarkerId,
    record: Record,
    category: Category,
    visible: bool,
    handle: MarkerHandle,
}

impl MarkerEntry {
    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn handle(&self) -> MarkerHandle {
        self.handle
    }
}

/// Owns all marker entries and the highlight slot.
#[derive(Debug)]
pub struct MarkerRegistry<S: VisualSurface> {
    entries: Vec<MarkerEntry>,
    highlighted: Option<MarkerId>,
    surface: S,
    config: MapConfig,
}

impl<S: VisualSurface> MarkerRegistry<S> {
    /// Creates an empty registry drawing onto `surface`.
    pub fn new(surface: S, config: MapConfig) -> Self {
        Self {
            entries: Vec::new(),
            highlighted: None,
            surface,
            config,
        }
    }

    /// Adds a marker for `record`, visible and with its popup bound.
    ///
    /// Must be called once per record; entries are never removed.
    pub fn register(&mut self, record: Record, category: Category) -> MarkerId {
        let id = MarkerId(self.entries.len());
        let style = self.config.marker_style(category);

        let handle = self.surface.add_marker(record.position(), &style);
        self.surface.bind_popup(handle, &render_summary(&record));
        self.surface.attach(handle);

        tracing::trace!(marker = %id, record_id = %record.id, %category, "Registered marker");

        self.entries.push(MarkerEntry {
            id,
            record,
            category,
            visible: true,
            handle,
        });
        id
    }

    /// Shows or hides an entry. Only touches the surface when the value
    /// changes; returns whether it did.
    pub(crate) fn set_visible(&mut self, id: MarkerId, visible: bool) -> bool {
        let Some(entry) = self.entries.get_mut(id.0) else {
            return false;
        };
        if entry.visible == visible {
            return false;
        }

        entry.visible = visible;
        if visible {
            self.surface.attach(entry.handle);
        } else {
            self.surface.detach(entry.handle);
        }
        true
    }

    /// Moves the highlight to `target`, or clears it with `None`.
    ///
    /// Unknown ids clear the highlight.
    pub fn set_highlighted(&mut self, target: Option<MarkerId>) {
        if self.highlighted.take().is_some() {
            self.surface.clear_highlight();
        }

        let Some(entry) = target.and_then(|id| self.entries.get(id.0)) else {
            return;
        };
        self.surface.show_highlight(entry.record.position());
        self.highlighted = Some(entry.id);
    }

    /// Currently highlighted entry, if any.
    pub fn highlighted(&self) -> Option<MarkerId> {
        self.highlighted
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[MarkerEntry] {
        &self.entries
    }

    pub fn get(&self, id: MarkerId) -> Option<&MarkerEntry> {
        self.entries.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bounding box of every entry, regardless of visibility.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.entries.iter().map(|e| e.record.position()))
    }

    /// Read access to the surface, for rendering adapters.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LatLng;
    use crate::surface::{RecordingSurface, SurfaceCall};

    fn registry_with(n: usize) -> MarkerRegistry<RecordingSurface> {
        let mut registry = MarkerRegistry::new(RecordingSurface::new(), MapConfig::default());
        for i in 0..n {
            let record = Record::new(i.to_string(), -10.0 - i as f64, -75.0);
            registry.register(record, Category::Default);
        }
        registry
    }

    #[test]
    fn test_register_attaches_and_binds_popup() {
        let registry = registry_with(2);
        assert_eq!(registry.len(), 2);

        for entry in registry.entries() {
            assert!(entry.is_visible());
            assert!(registry.surface().is_attached(entry.handle()));
            assert!(registry.surface().popup(entry.handle()).is_some());
        }
    }

    #[test]
    fn test_insertion_order() {
        let registry = registry_with(3);
        let ids: Vec<_> = registry.entries().iter().map(|e| e.record().id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
        assert_eq!(registry.entries()[2].id().index(), 2);
    }

    #[test]
    fn test_set_visible_is_idempotent() {
        let mut registry = registry_with(1);
        let id = registry.entries()[0].id();
        registry.surface.clear_calls();

        // Already visible: no surface work
        assert!(!registry.set_visible(id, true));
        assert_eq!(registry.surface().layer_changes(), 0);

        assert!(registry.set_visible(id, false));
        assert!(!registry.set_visible(id, false));
        assert_eq!(registry.surface().layer_changes(), 1);
        assert!(!registry.surface().is_attached(registry.entries()[0].handle()));

        assert!(registry.set_visible(id, true));
        assert_eq!(registry.surface().layer_changes(), 2);
    }

    #[test]
    fn test_highlight_is_exclusive() {
        let mut registry = registry_with(3);
        let first = registry.entries()[0].id();
        let third = registry.entries()[2].id();

        registry.set_highlighted(Some(first));
        assert_eq!(registry.highlighted(), Some(first));

        registry.set_highlighted(Some(third));
        assert_eq!(registry.highlighted(), Some(third));
        assert_eq!(registry.surface().highlight(), Some(LatLng::new(-12.0, -75.0)));
    }

    #[test]
    fn test_clear_without_highlight_is_noop() {
        let mut registry = registry_with(1);
        registry.surface.clear_calls();

        registry.set_highlighted(None);
        assert_eq!(registry.highlighted(), None);
        assert!(registry.surface().calls().is_empty());
    }

    #[test]
    fn test_rapid_hover_sequence_keeps_last() {
        let mut registry = registry_with(3);
        let ids: Vec<_> = registry.entries().iter().map(|e| e.id()).collect();

        registry.set_highlighted(Some(ids[0]));
        registry.set_highlighted(None);
        registry.set_highlighted(Some(ids[1]));
        registry.set_highlighted(Some(ids[2]));
        assert_eq!(registry.highlighted(), Some(ids[2]));

        registry.set_highlighted(Some(ids[0]));
        registry.set_highlighted(None);
        assert_eq!(registry.highlighted(), None);
        assert_eq!(registry.surface().highlight(), None);

        // Every show was preceded by a clear of the previous overlay
        let shows = registry
            .surface()
            .calls()
            .iter()
            .filter(|c| matches!(c, SurfaceCall::ShowHighlight(_)))
            .count();
        let clears = registry
            .surface()
            .calls()
            .iter()
            .filter(|c| matches!(c, SurfaceCall::ClearHighlight))
            .count();
        assert_eq!(shows, clears);
    }

    #[test]
    fn test_unknown_id_clears_highlight() {
        let mut registry = registry_with(1);
        registry.set_highlighted(Some(registry.entries()[0].id()));
        registry.set_highlighted(Some(MarkerId(99)));
        assert_eq!(registry.highlighted(), None);
    }

    #[test]
    fn test_bounds_and_lookup() {
        let registry = registry_with(3);
        let bounds = registry.bounds().unwrap();
        assert_eq!(bounds.north, -10.0);
        assert_eq!(bounds.south, -12.0);

        let second = registry.entries()[1].id();
        assert_eq!(registry.get(second).unwrap().record().id, "1");
        assert!(registry_with(0).bounds().is_none());
    }
}
