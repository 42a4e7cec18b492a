//! Visual surface abstraction.
//!
//! The marker registry never manipulates a map widget directly. It talks to
//! a [`VisualSurface`], which the desktop viewer implements over its map
//! layer and which [`RecordingSurface`] implements in memory for tests and
//! headless runs.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flora_core::{LatLng, MarkerStyle, RecordingSurface, VisualSurface};
//!
//! let mut surface = RecordingSurface::new();
//! let handle = surface.add_marker(LatLng::new(-10.0, -75.0), &MarkerStyle::default());
//! surface.attach(handle);
//! assert!(surface.is_attached(handle));
//! ```

use std::collections::{BTreeSet, HashMap};

use crate::record::LatLng;

/// Opaque identifier of a marker on a visual surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    /// Wraps a surface-specific raw identifier.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Styling of a circle marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub fill_color: String,
    pub stroke_color: String,
    pub radius: f64,
    pub fill_opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            fill_color: "#2b7cff".to_string(),
            stroke_color: "#000".to_string(),
            radius: 6.0,
            fill_opacity: 0.9,
        }
    }
}

/// Capabilities the registry needs from a map widget.
///
/// Markers are created detached; they only render once attached. At most
/// one highlight overlay exists at a time.
pub trait VisualSurface {
    /// Creates a (detached) circle marker and returns its handle.
    fn add_marker(&mut self, position: LatLng, style: &MarkerStyle) -> MarkerHandle;

    /// Binds a popup fragment to a marker, replacing any previous one.
    fn bind_popup(&mut self, handle: MarkerHandle, content: &str);

    /// Adds a marker to the rendered layer.
    fn attach(&mut self, handle: MarkerHandle);

    /// Removes a marker from the rendered layer.
    fn detach(&mut self, handle: MarkerHandle);

    /// Shows the highlight overlay at a position.
    fn show_highlight(&mut self, position: LatLng);

    /// Removes the highlight overlay if present.
    fn clear_highlight(&mut self);
}

/// A single call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    AddMarker {
        handle: MarkerHandle,
        position: LatLng,
        fill_color: String,
    },
    BindPopup(MarkerHandle),
    Attach(MarkerHandle),
    Detach(MarkerHandle),
    ShowHighlight(LatLng),
    ClearHighlight,
}

/// In-memory surface that records every call and tracks layer state.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_handle: u64,
    calls: Vec<SurfaceCall>,
    attached: BTreeSet<MarkerHandle>,
    popups: HashMap<MarkerHandle, String>,
    highlight: Option<LatLng>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Forgets recorded calls while keeping layer state.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn is_attached(&self, handle: MarkerHandle) -> bool {
        self.attached.contains(&handle)
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    /// Position of the highlight overlay, if shown.
    pub fn highlight(&self) -> Option<LatLng> {
        self.highlight
    }

    pub fn popup(&self, handle: MarkerHandle) -> Option<&str> {
        self.popups.get(&handle).map(String::as_str)
    }

    /// Number of attach and detach calls recorded.
    pub fn layer_changes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Attach(_) | SurfaceCall::Detach(_)))
            .count()
    }
}

impl VisualSurface for RecordingSurface {
    fn add_marker(&mut self, position: LatLng, style: &MarkerStyle) -> MarkerHandle {
        let handle = MarkerHandle(self.next_handle);
        self.next_handle += 1;
        self.calls.push(SurfaceCall::AddMarker {
            handle,
            position,
            fill_color: style.fill_color.clone(),
        });
        handle
    }

    fn bind_popup(&mut self, handle: MarkerHandle, content: &str) {
        self.popups.insert(handle, content.to_string());
        self.calls.push(SurfaceCall::BindPopup(handle));
    }

    fn attach(&mut self, handle: MarkerHandle) {
        self.attached.insert(handle);
        self.calls.push(SurfaceCall::Attach(handle));
    }

    fn detach(&mut self, handle: MarkerHandle) {
        self.attached.remove(&handle);
        self.calls.push(SurfaceCall::Detach(handle));
    }

    fn show_highlight(&mut self, position: LatLng) {
        self.highlight = Some(position);
        self.calls.push(SurfaceCall::ShowHighlight(position));
    }

    fn clear_highlight(&mut self) {
        self.highlight = None;
        self.calls.push(SurfaceCall::ClearHighlight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique() {
        let mut surface = RecordingSurface::new();
        let style = MarkerStyle::default();
        let a = surface.add_marker(LatLng::new(0.0, 0.0), &style);
        let b = surface.add_marker(LatLng::new(1.0, 1.0), &style);
        assert_ne!(a, b);
        assert!(!surface.is_attached(a));
    }

    #[test]
    fn test_attach_detach_tracking() {
        let mut surface = RecordingSurface::new();
        let handle = surface.add_marker(LatLng::new(0.0, 0.0), &MarkerStyle::default());

        surface.attach(handle);
        assert!(surface.is_attached(handle));
        assert_eq!(surface.attached_count(), 1);

        surface.detach(handle);
        assert!(!surface.is_attached(handle));
        assert_eq!(surface.layer_changes(), 2);
    }

    #[test]
    fn test_highlight_slot() {
        let mut surface = RecordingSurface::new();
        surface.show_highlight(LatLng::new(-10.0, -75.0));
        assert_eq!(surface.highlight(), Some(LatLng::new(-10.0, -75.0)));

        surface.clear_highlight();
        assert_eq!(surface.highlight(), None);
    }

    #[test]
    fn test_popup_binding() {
        let mut surface = RecordingSurface::new();
        let handle = surface.add_marker(LatLng::new(0.0, 0.0), &MarkerStyle::default());
        surface.bind_popup(handle, "<strong>x</strong>");
        assert_eq!(surface.popup(handle), Some("<strong>x</strong>"));

        surface.clear_calls();
        assert!(surface.calls().is_empty());
        assert_eq!(surface.popup(handle), Some("<strong>x</strong>"));
    }
}
