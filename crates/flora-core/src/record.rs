//! Occurrence records and coordinate types.

use std::fmt;

/// A WGS-84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// Axis-aligned bounding box over a set of positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Creates a degenerate box around a single point.
    pub fn from_point(point: LatLng) -> Self {
        Self {
            south: point.lat,
            west: point.lng,
            north: point.lat,
            east: point.lng,
        }
    }

    /// Builds the smallest box containing every point, or `None` if empty.
    pub fn from_points<I: IntoIterator<Item = LatLng>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::from_point(first);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Grows the box to include `point`.
    pub fn extend(&mut self, point: LatLng) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lng);
        self.east = self.east.max(point.lng);
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn contains(&self, point: LatLng) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && (self.west..=self.east).contains(&point.lng)
    }

    /// Latitude and longitude extent in degrees.
    pub fn span(&self) -> (f64, f64) {
        (self.north - self.south, self.east - self.west)
    }
}

/// One validated species occurrence.
///
/// Records are created by the loader and never mutated afterwards. Optional
/// text fields are normalized to `None` when absent or blank.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub uuid: Option<String>,
    pub scientific_name: String,
    pub common_name: String,
    pub user_name: String,
    pub license: Option<String>,
    pub place_state_name: String,
    pub place_county_name: String,
    pub image_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Latitude exactly as written in the source.
    pub raw_latitude: String,
    /// Longitude exactly as written in the source.
    pub raw_longitude: String,
}

impl Record {
    /// Creates a record with only an id and coordinates set.
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            uuid: None,
            scientific_name: String::new(),
            common_name: String::new(),
            user_name: String::new(),
            license: None,
            place_state_name: String::new(),
            place_county_name: String::new(),
            image_url: None,
            latitude,
            longitude,
            raw_latitude: latitude.to_string(),
            raw_longitude: longitude.to_string(),
        }
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = non_blank(uuid.into());
        self
    }

    pub fn with_scientific_name(mut self, name: impl Into<String>) -> Self {
        self.scientific_name = name.into();
        self
    }

    pub fn with_common_name(mut self, name: impl Into<String>) -> Self {
        self.common_name = name.into();
        self
    }

    pub fn with_user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = name.into();
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = non_blank(license.into());
        self
    }

    pub fn with_place(mut self, state: impl Into<String>, county: impl Into<String>) -> Self {
        self.place_state_name = state.into();
        self.place_county_name = county.into();
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = non_blank(url.into());
        self
    }

    /// Returns the marker position of this record.
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Best human-readable name: common name, then scientific name.
    pub fn display_name(&self) -> Option<&str> {
        [&self.common_name, &self.scientific_name]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }
}

/// Maps blank strings to `None`.
pub(crate) fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_points() {
        let bounds = Bounds::from_points([
            LatLng::new(-10.0, -75.0),
            LatLng::new(-12.0, -71.5),
            LatLng::new(-9.0, -76.0),
        ])
        .unwrap();

        assert_eq!(bounds.south, -12.0);
        assert_eq!(bounds.north, -9.0);
        assert_eq!(bounds.west, -76.0);
        assert_eq!(bounds.east, -71.5);
        assert!(bounds.contains(LatLng::new(-10.0, -75.0)));
        assert!(!bounds.contains(LatLng::new(0.0, 0.0)));
    }

    #[test]
    fn test_bounds_empty() {
        assert!(Bounds::from_points(Vec::new()).is_none());
    }

    #[test]
    fn test_bounds_center_and_span() {
        let bounds = Bounds::from_points([LatLng::new(-10.0, -76.0), LatLng::new(-12.0, -74.0)])
            .unwrap();
        assert_eq!(bounds.center(), LatLng::new(-11.0, -75.0));
        assert_eq!(bounds.span(), (2.0, 2.0));
    }

    #[test]
    fn test_blank_optionals_become_none() {
        let record = Record::new("1", -10.0, -75.0)
            .with_uuid("  ")
            .with_license("")
            .with_image_url("https://example.org/a.jpg");

        assert!(record.uuid.is_none());
        assert!(record.license.is_none());
        assert_eq!(
            record.image_url.as_deref(),
            Some("https://example.org/a.jpg")
        );
    }

    #[test]
    fn test_display_name_fallback() {
        let record = Record::new("1", 0.0, 0.0).with_scientific_name("Azorella compacta");
        assert_eq!(record.display_name(), Some("Azorella compacta"));

        let record = record.with_common_name("Llareta");
        assert_eq!(record.display_name(), Some("Llareta"));

        assert_eq!(Record::new("2", 0.0, 0.0).display_name(), None);
    }
}
