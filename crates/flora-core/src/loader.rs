//! Dataset loading.
//!
//! Supports delimited text with a header row (CSV or TSV) and JSON arrays of
//! objects. Field names are normalized before lookup (lower-cased, with `_`,
//! `-`, `.` and spaces removed) so `place_state_name`, `placeStateName` and
//! `Place State Name` all resolve to the same field. Nested JSON objects are
//! flattened, which lets `taxon.name` or `user.login` from API exports
//! resolve through the same alias lists.
//!
//! Rows whose latitude or longitude do not parse to a finite number are
//! skipped and counted; they never reach the registry.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::LoadError;
use crate::record::{non_blank, Record};

/// A raw row keyed by normalized field name.
type RawRow = HashMap<String, String>;

const ID_FIELDS: &[&str] = &["id", "observationid", "occurrenceid", "gbifid"];
const UUID_FIELDS: &[&str] = &["uuid", "observationuuid"];
const SCIENTIFIC_NAME_FIELDS: &[&str] = &["scientificname", "taxonname", "species"];
const COMMON_NAME_FIELDS: &[&str] = &[
    "commonname",
    "preferredcommonname",
    "taxonpreferredcommonname",
    "taxoncommonname",
    "vernacularname",
];
const USER_NAME_FIELDS: &[&str] = &["username", "userlogin", "observer", "recordedby"];
const LICENSE_FIELDS: &[&str] = &["license", "licensecode"];
const STATE_FIELDS: &[&str] = &["placestatename", "state", "stateprovince"];
const COUNTY_FIELDS: &[&str] = &["placecountyname", "county"];
const IMAGE_FIELDS: &[&str] = &["imageurl", "image", "photourl"];
const LATITUDE_FIELDS: &[&str] = &["latitude", "lat", "decimallatitude"];
const LONGITUDE_FIELDS: &[&str] = &["longitude", "lng", "lon", "long", "decimallongitude"];
/// Combined `"lat,lng"` field used by some exports.
const LOCATION_FIELDS: &[&str] = &["location"];

/// Encoding of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Tsv,
    Json,
}

impl DataFormat {
    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(DataFormat::Csv),
            "tsv" | "tab" => Some(DataFormat::Tsv),
            "json" => Some(DataFormat::Json),
            _ => None,
        }
    }

    /// Guesses the format from content: a leading `[` or `{` means JSON.
    pub fn sniff(text: &str) -> Self {
        match text.trim_start_matches('\u{feff}').trim_start().chars().next() {
            Some('[') | Some('{') => DataFormat::Json,
            _ => DataFormat::Csv,
        }
    }
}

/// Where a dataset comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// A file on disk; format from its extension, else sniffed.
    Path(PathBuf),
    /// In-memory content; format sniffed when not given.
    Text {
        content: String,
        format: Option<DataFormat>,
    },
}

impl DataSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        DataSource::Path(path.into())
    }

    pub fn text(content: impl Into<String>) -> Self {
        DataSource::Text {
            content: content.into(),
            format: None,
        }
    }

    pub fn text_with_format(content: impl Into<String>, format: DataFormat) -> Self {
        DataSource::Text {
            content: content.into(),
            format: Some(format),
        }
    }

    /// Short description for logs and notices.
    pub fn describe(&self) -> String {
        match self {
            DataSource::Path(path) => path.display().to_string(),
            DataSource::Text { content, .. } => format!("<inline, {} bytes>", content.len()),
        }
    }
}

/// Row accounting for one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows seen (header excluded)
    pub rows_read: usize,
    /// Rows dropped for unusable coordinates
    pub rows_skipped: usize,
}

impl LoadReport {
    pub fn rows_loaded(&self) -> usize {
        self.rows_read - self.rows_skipped
    }
}

/// Loads every usable record from `source`, in source order.
pub async fn load(source: &DataSource) -> Result<Vec<Record>, LoadError> {
    load_with_report(source).await.map(|(records, _)| records)
}

/// Like [`load`], also returning row accounting.
pub async fn load_with_report(source: &DataSource) -> Result<(Vec<Record>, LoadReport), LoadError> {
    let (content, format) = match source {
        DataSource::Path(path) => {
            tracing::info!("Reading dataset from file: {:?}", path);
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| LoadError::Unreachable {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            let content = decode_text(&bytes, path);
            let format = DataFormat::from_path(path).unwrap_or_else(|| DataFormat::sniff(&content));
            (content, format)
        }
        DataSource::Text { content, format } => {
            let format = format.unwrap_or_else(|| DataFormat::sniff(content));
            (content.clone(), format)
        }
    };

    let (records, report) = parse_records(&content, format)?;

    tracing::info!(
        source = %source.describe(),
        rows_read = report.rows_read,
        rows_skipped = report.rows_skipped,
        rows_loaded = records.len(),
        "Dataset loaded"
    );
    Ok((records, report))
}

/// Parses dataset text into records.
///
/// Returns [`LoadError::Empty`] when no row has usable coordinates.
pub fn parse_records(text: &str, format: DataFormat) -> Result<(Vec<Record>, LoadReport), LoadError> {
    let text = text.trim_start_matches('\u{feff}');
    let rows = match format {
        DataFormat::Csv => delimited_rows(text, b',')?,
        DataFormat::Tsv => delimited_rows(text, b'\t')?,
        DataFormat::Json => json_rows(text)?,
    };

    let mut report = LoadReport {
        rows_read: rows.len(),
        rows_skipped: 0,
    };
    let mut records = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        match row_to_record(row) {
            Some(record) => records.push(record),
            None => {
                report.rows_skipped += 1;
                tracing::debug!(
                    row = index + 1,
                    id = row_field(row, ID_FIELDS).unwrap_or_default(),
                    "Skipping row without usable coordinates"
                );
            }
        }
    }

    if records.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok((records, report))
}

/// Parses a coordinate from the longest numeric prefix of the trimmed field.
///
/// `"-12.5 S"` gives `-12.5`. A field with no numeric prefix, or one that is
/// not finite, gives `None`.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    let prefix = float_prefix(raw.trim());
    if prefix.is_empty() {
        return None;
    }
    prefix.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Longest prefix of `text` shaped like `[+-]digits[.digits][e[+-]digits]`.
fn float_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_start = end;
    end = digits_from(end);
    let mut has_digits = end > int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if has_digits || frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    &text[..end]
}

/// Decodes file bytes as UTF-8, replacing invalid sequences.
fn decode_text(bytes: &[u8], path: &Path) -> String {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => {
            tracing::warn!(path = ?path, "Dataset is not valid UTF-8; invalid bytes replaced");
            text
        }
    }
}

/// Normalizes a field name for alias lookup.
fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | '.' | ' ' | '\u{feff}'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn delimited_rows(text: &str, delimiter: u8) -> Result<Vec<RawRow>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_key).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn json_rows(text: &str) -> Result<Vec<RawRow>, LoadError> {
    let document: Value = serde_json::from_str(text)?;
    let items = match document {
        Value::Array(items) => items,
        // API responses wrap observations in a `results` array
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(LoadError::Malformed(
                    "expected a JSON array of objects".to_string(),
                ));
            }
        },
        _ => {
            return Err(LoadError::Malformed(
                "expected a JSON array of objects".to_string(),
            ));
        }
    };

    Ok(items
        .into_iter()
        .map(|item| {
            let mut row = RawRow::new();
            flatten_json("", &item, &mut row);
            row
        })
        .collect())
}

/// Flattens nested objects into `parent.child` keys. Arrays and nulls are
/// dropped.
fn flatten_json(prefix: &str, value: &Value, row: &mut RawRow) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_json(&path, child, row);
            }
        }
        Value::String(s) => {
            row.entry(normalize_key(prefix)).or_insert_with(|| s.clone());
        }
        Value::Number(n) => {
            row.entry(normalize_key(prefix)).or_insert_with(|| n.to_string());
        }
        Value::Bool(b) => {
            row.entry(normalize_key(prefix)).or_insert_with(|| b.to_string());
        }
        Value::Null | Value::Array(_) => {}
    }
}

/// First non-blank value among `aliases`.
fn row_field<'a>(row: &'a RawRow, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|alias| row.get(*alias))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}

fn text_field(row: &RawRow, aliases: &[&str]) -> String {
    row_field(row, aliases).unwrap_or_default().to_string()
}

fn optional_field(row: &RawRow, aliases: &[&str]) -> Option<String> {
    row_field(row, aliases).map(str::to_string).and_then(non_blank)
}

/// Latitude and longitude text, from separate fields or a `"lat,lng"` pair.
fn raw_coordinates(row: &RawRow) -> Option<(String, String)> {
    if let (Some(lat), Some(lng)) = (row_field(row, LATITUDE_FIELDS), row_field(row, LONGITUDE_FIELDS)) {
        return Some((lat.to_string(), lng.to_string()));
    }
    let (lat, lng) = row_field(row, LOCATION_FIELDS)?.split_once(',')?;
    Some((lat.trim().to_string(), lng.trim().to_string()))
}

fn row_to_record(row: &RawRow) -> Option<Record> {
    let (raw_latitude, raw_longitude) = raw_coordinates(row)?;
    let latitude = parse_coordinate(&raw_latitude)?;
    let longitude = parse_coordinate(&raw_longitude)?;

    Some(Record {
        id: text_field(row, ID_FIELDS),
        uuid: optional_field(row, UUID_FIELDS),
        scientific_name: text_field(row, SCIENTIFIC_NAME_FIELDS),
        common_name: text_field(row, COMMON_NAME_FIELDS),
        user_name: text_field(row, USER_NAME_FIELDS),
        license: optional_field(row, LICENSE_FIELDS),
        place_state_name: text_field(row, STATE_FIELDS),
        place_county_name: text_field(row, COUNTY_FIELDS),
        image_url: optional_field(row, IMAGE_FIELDS),
        latitude,
        longitude,
        raw_latitude,
        raw_longitude,
    })
}
