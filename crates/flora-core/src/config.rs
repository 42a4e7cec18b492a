//! Map configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```toml
//! center = [-13.5, -72.0]
//! zoom = 8
//! marker_radius = 5.0
//! dataset = "datos.csv"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::record::LatLng;
use crate::surface::MarkerStyle;
use crate::Category;

/// Configuration for the map view and marker styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial view centre as `[lat, lng]`
    pub center: [f64; 2],
    /// Initial zoom level
    pub zoom: u8,
    /// Fit the view to the marker bounds once loading completes
    pub fit_to_markers: bool,
    /// Circle marker radius in pixels
    pub marker_radius: f64,
    /// Marker outline colour
    pub marker_stroke: String,
    /// Marker fill opacity (0.0 - 1.0)
    pub marker_fill_opacity: f64,
    /// Radius of the highlight ring drawn around the emphasized marker
    pub highlight_radius: f64,
    /// Maximum popup width in pixels
    pub popup_max_width: u32,
    /// Dataset loaded when none is given on the command line
    pub dataset: Option<PathBuf>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [-10.0, -75.0],
            zoom: 6,
            fit_to_markers: true,
            marker_radius: 6.0,
            marker_stroke: "#000".to_string(),
            marker_fill_opacity: 0.9,
            highlight_radius: 12.0,
            popup_max_width: 220,
            dataset: None,
        }
    }
}

impl MapConfig {
    /// Parses a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: MapConfig = toml::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "Loaded map config");
        Ok(config)
    }

    /// Returns the initial view centre.
    pub fn center(&self) -> LatLng {
        LatLng::new(self.center[0], self.center[1])
    }

    /// Marker style for a category.
    pub fn marker_style(&self, category: Category) -> MarkerStyle {
        MarkerStyle {
            fill_color: category.color().to_string(),
            stroke_color: self.marker_stroke.clone(),
            radius: self.marker_radius,
            fill_opacity: self.marker_fill_opacity,
        }
    }

    fn sanitized(mut self) -> Self {
        self.marker_fill_opacity = self.marker_fill_opacity.clamp(0.0, 1.0);
        if !self.marker_radius.is_finite() || self.marker_radius <= 0.0 {
            self.marker_radius = MapConfig::default().marker_radius;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MapConfig::default();
        assert_eq!(config.center(), LatLng::new(-10.0, -75.0));
        assert_eq!(config.zoom, 6);
        assert_eq!(config.marker_radius, 6.0);
        assert_eq!(config.popup_max_width, 220);
        assert!(config.fit_to_markers);
        assert!(config.dataset.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config = MapConfig::from_toml_str("zoom = 9\ndataset = \"datos.csv\"").unwrap();
        assert_eq!(config.zoom, 9);
        assert_eq!(config.dataset, Some(PathBuf::from("datos.csv")));
        assert_eq!(config.marker_radius, 6.0);
    }

    #[test]
    fn test_values_are_sanitized() {
        let config =
            MapConfig::from_toml_str("marker_fill_opacity = 3.5\nmarker_radius = -1.0").unwrap();
        assert_eq!(config.marker_fill_opacity, 1.0);
        assert_eq!(config.marker_radius, 6.0);
    }

    #[test]
    fn test_invalid_toml() {
        let result = MapConfig::from_toml_str("zoom = \"close\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = MapConfig::load("/nonexistent/flora.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_marker_style_uses_category_color() {
        let config = MapConfig::default();
        let style = config.marker_style(Category::Azorella);
        assert_eq!(style.fill_color, Category::Azorella.color());
        assert_eq!(style.stroke_color, "#000");
        assert_eq!(style.radius, 6.0);
    }
}
