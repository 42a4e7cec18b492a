//! Equirectangular projection from coordinates to SVG viewport pixels.

use flora_core::{LatLng, MapView};

/// Pixels per degree at zoom 0 (one 256px tile spans 360 degrees).
const TILE_PX_PER_DEGREE: f64 = 256.0 / 360.0;

/// Smallest extent fitted, so a single marker does not zoom to infinity.
const MIN_SPAN_DEGREES: f64 = 0.05;

/// Maps coordinates onto a `width` x `height` viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    center: LatLng,
    scale: f64,
    width: f64,
    height: f64,
}

impl Projection {
    /// Builds the projection for a map view.
    ///
    /// Fitted views keep `padding` pixels free on every side.
    pub fn for_view(view: MapView, width: f64, height: f64, padding: f64) -> Self {
        let (center, scale) = match view {
            MapView::Center { center, zoom } => {
                (center, TILE_PX_PER_DEGREE * 2f64.powi(zoom as i32))
            }
            MapView::Fit(bounds) => {
                let (lat_span, lng_span) = bounds.span();
                let usable_w = (width - 2.0 * padding).max(1.0);
                let usable_h = (height - 2.0 * padding).max(1.0);
                let scale = (usable_w / lng_span.max(MIN_SPAN_DEGREES))
                    .min(usable_h / lat_span.max(MIN_SPAN_DEGREES));
                (bounds.center(), scale)
            }
        };
        Self {
            center,
            scale,
            width,
            height,
        }
    }

    /// Viewport position of a coordinate. North is up.
    pub fn project(&self, point: LatLng) -> (f64, f64) {
        let x = self.width / 2.0 + (point.lng - self.center.lng) * self.scale;
        let y = self.height / 2.0 - (point.lat - self.center.lat) * self.scale;
        (x, y)
    }

    /// Whether a projected point falls inside the viewport.
    pub fn in_viewport(&self, (x, y): (f64, f64)) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}
