//! Popup and sidebar rendering.
//!
//! Every field of a record comes from a third-party dataset, so every value
//! is escaped before it is interpolated into a fragment, attribute values
//! included.

use crate::record::Record;

/// Author shown when neither a license nor a user name is present.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Attribution footer of the sidebar.
pub const SOURCE_NOTE: &str = "Fuente: iNaturalist (imagen externa)";

/// Escapes text for use inside markup content or quoted attributes.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes an optional value; absent renders as empty.
pub fn escape_opt(value: Option<&str>) -> String {
    value.map(escape_html).unwrap_or_default()
}

/// Author line with fallback: license, then user name, then [`UNKNOWN_AUTHOR`].
pub fn author_line(record: &Record) -> &str {
    record
        .license
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| Some(record.user_name.trim()).filter(|s| !s.is_empty()))
        .unwrap_or(UNKNOWN_AUTHOR)
}

/// Renders the compact popup fragment for a marker.
pub fn render_summary(record: &Record) -> String {
    let title = match record.display_name() {
        Some(name) => escape_html(name),
        None => format!("ID: {}", escape_html(&record.id)),
    };

    let mut html = format!("<strong>{title}</strong>");

    let location = location_line(record);
    if !location.is_empty() {
        html.push_str("<br>");
        html.push_str(&escape_html(&location));
    }

    if let Some(url) = record.image_url.as_deref() {
        html.push_str(&format!(
            r#"<img class="popup-thumb" src="{}" alt="thumb {}">"#,
            escape_html(url),
            escape_html(&record.id)
        ));
    }

    html.push_str(&format!(
        r#"<div class="popup-author">{}</div>"#,
        escape_html(author_line(record))
    ));
    html
}

/// Renders the full sidebar fragment for a selected record.
pub fn render_detail(record: &Record) -> String {
    let mut html = String::new();

    if let Some(url) = record.image_url.as_deref() {
        html.push_str(&format!(
            r#"<img class="photo" src="{}" alt="Foto {}">"#,
            escape_html(url),
            escape_html(&record.id)
        ));
    }

    let heading = match record.display_name() {
        Some(name) => escape_html(name),
        None => format!("ID: {}", escape_html(&record.id)),
    };
    html.push_str(&format!("<h3>{heading}</h3>"));

    meta_row(&mut html, "ID", &escape_html(&record.id));
    meta_row(&mut html, "UUID", &escape_opt(record.uuid.as_deref()));
    meta_row(
        &mut html,
        "Nombre científico",
        &format!("<em>{}</em>", escape_html(&record.scientific_name)),
    );
    meta_row(&mut html, "Nombre común", &escape_html(&record.common_name));
    meta_row(&mut html, "Departamento", &escape_html(&record.place_state_name));
    meta_row(&mut html, "Provincia", &escape_html(&record.place_county_name));
    meta_row(
        &mut html,
        "Lat / Lng",
        &format!(
            "{} , {}",
            escape_html(&record.raw_latitude),
            escape_html(&record.raw_longitude)
        ),
    );
    meta_row(&mut html, "Autor / Licencia", &escape_html(author_line(record)));

    html.push_str(&format!(r#"<div class="source">{SOURCE_NOTE}</div>"#));
    html
}

/// "county, state" with blank parts omitted.
fn location_line(record: &Record) -> String {
    [&record.place_county_name, &record.place_state_name]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Appends one labelled row; `value` must already be escaped.
fn meta_row(html: &mut String, label: &str, value: &str) {
    html.push_str(&format!(
        r#"<div class="meta"><strong>{label}:</strong> {value}</div>"#
    ));
}
