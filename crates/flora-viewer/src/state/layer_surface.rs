//! Marker layer backing the SVG map.
//!
//! The registry drives this surface through [`VisualSurface`]; components
//! read it back to render circles, the highlight ring and popups.

use flora_core::{LatLng, MarkerHandle, MarkerStyle, VisualSurface};

/// A circle marker as drawn on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnMarker {
    pub handle: MarkerHandle,
    pub position: LatLng,
    pub style: MarkerStyle,
    pub popup: Option<String>,
    pub attached: bool,
}

/// Map layer holding every marker created for the current dataset.
#[derive(Debug, Default, Clone)]
pub struct LayerSurface {
    markers: Vec<DrawnMarker>,
    highlight: Option<LatLng>,
}

impl LayerSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn marker_mut(&mut self, handle: MarkerHandle) -> Option<&mut DrawnMarker> {
        self.markers.get_mut(handle.raw() as usize)
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&DrawnMarker> {
        self.markers.get(handle.raw() as usize)
    }

    /// Markers currently on the layer, in creation order.
    pub fn attached(&self) -> impl Iterator<Item = &DrawnMarker> {
        self.markers.iter().filter(|m| m.attached)
    }

    /// Position of the highlight ring, if shown.
    pub fn highlight(&self) -> Option<LatLng> {
        self.highlight
    }

    pub fn popup(&self, handle: MarkerHandle) -> Option<&str> {
        self.marker(handle).and_then(|m| m.popup.as_deref())
    }
}

impl VisualSurface for LayerSurface {
    fn add_marker(&mut self, position: LatLng, style: &MarkerStyle) -> MarkerHandle {
        let handle = MarkerHandle::from_raw(self.markers.len() as u64);
        self.markers.push(DrawnMarker {
            handle,
            position,
            style: style.clone(),
            popup: None,
            attached: false,
        });
        handle
    }

    fn bind_popup(&mut self, handle: MarkerHandle, content: &str) {
        if let Some(marker) = self.marker_mut(handle) {
            marker.popup = Some(content.to_string());
        }
    }

    fn attach(&mut self, handle: MarkerHandle) {
        if let Some(marker) = self.marker_mut(handle) {
            marker.attached = true;
        }
    }

    fn detach(&mut self, handle: MarkerHandle) {
        if let Some(marker) = self.marker_mut(handle) {
            marker.attached = false;
        }
    }

    fn show_highlight(&mut self, position: LatLng) {
        self.highlight = Some(position);
    }

    fn clear_highlight(&mut self) {
        self.highlight = None;
    }
}
