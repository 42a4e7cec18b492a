//! Root application component for the map viewer.

use dioxus::prelude::*;

use crate::state::ViewerState;

use super::{MapCanvas, Notice, SearchBar, Sidebar, StatsPanel};

/// Root application component.
#[component]
pub fn App(state: Signal<ViewerState>) -> Element {
    rsx! {
        div {
            class: "flora-viewer",

            // Header
            Header { state }

            // Map with the detail sidebar alongside
            main {
                class: "main-content",

                div {
                    class: "map-panel",
                    MapCanvas { state }
                    Notice { state }
                }

                Sidebar { state }
            }
        }
    }
}

/// Header with title, search and counts.
#[component]
fn Header(state: Signal<ViewerState>) -> Element {
    let source = state.read().source.clone();

    rsx! {
        header {
            class: "header",

            div {
                class: "header-left",
                h1 {
                    class: "header-title",
                    "Flora Andina"
                }
                span {
                    class: "header-source",
                    "{source}"
                }
            }

            SearchBar { state }

            StatsPanel { state }
        }
    }
}
