//! Status notices over the map.

use dioxus::prelude::*;

use crate::state::ViewerState;

/// Loading, load failure and empty search result messages.
#[component]
pub fn Notice(state: Signal<ViewerState>) -> Element {
    let state_read = state.read();

    let (class, message) = if state_read.is_loading() {
        ("notice notice-info", format!("Cargando {}…", state_read.source))
    } else if let Some(error) = state_read.error() {
        ("notice notice-error", error.to_string())
    } else if let Some(empty) = state_read.empty_result_notice() {
        ("notice notice-warn", empty)
    } else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "{class}",
            role: "status",
            "{message}"
        }
    }
}
