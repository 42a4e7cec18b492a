//! Marker counts and category legend.

use dioxus::prelude::*;

use flora_core::Category;

use crate::state::ViewerState;

/// Visible / total counts, recomputed on every render.
#[component]
pub fn StatsPanel(state: Signal<ViewerState>) -> Element {
    let state_read = state.read();
    let stats = state_read.stats();
    let counts = state_read
        .session()
        .map(|s| s.category_counts())
        .unwrap_or_default();

    rsx! {
        section {
            class: "stats-panel",

            div {
                class: "stat-item",
                span { class: "stat-value", "{stats.visible}" }
                span { class: "stat-label", "visibles" }
            }

            div {
                class: "stat-item",
                span { class: "stat-value", "{stats.total}" }
                span { class: "stat-label", "total" }
            }

            ul {
                class: "legend",
                for category in Category::ALL {
                    LegendItem {
                        key: "{category.label()}",
                        label: category.label().to_string(),
                        color: category.color().to_string(),
                        count: counts.get(&category).copied().unwrap_or(0),
                    }
                }
            }
        }
    }
}

/// A single legend row.
#[component]
fn LegendItem(label: String, color: String, count: usize) -> Element {
    rsx! {
        li {
            class: "legend-item",
            span {
                class: "legend-swatch",
                style: "background: {color};",
            }
            span { class: "legend-label", "{label}" }
            span { class: "legend-count", "{count}" }
        }
    }
}
