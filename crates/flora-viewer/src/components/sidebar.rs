//! Detail sidebar for the selected record.

use dioxus::prelude::*;

use flora_core::MapEvent;

use crate::state::ViewerState;

/// Sidebar showing the full detail of the clicked marker.
///
/// The fragment comes from the core presenter with every record value
/// already escaped.
#[component]
pub fn Sidebar(state: Signal<ViewerState>) -> Element {
    let mut state_write = state;
    let detail = state.read().session().and_then(|s| s.detail_html());
    let is_open = detail.is_some();

    rsx! {
        aside {
            class: if is_open { "sidebar open" } else { "sidebar" },
            aria_hidden: if is_open { "false" } else { "true" },

            button {
                class: "sidebar-close",
                title: "Cerrar",
                onclick: move |_| {
                    state_write.write().dispatch(MapEvent::SidebarClosed);
                },
                "×"
            }

            if let Some(html) = detail {
                div {
                    class: "sidebar-content",
                    dangerous_inner_html: "{html}",
                }
            }
        }
    }
}
