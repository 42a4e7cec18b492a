//! Search field with clear button.

use dioxus::prelude::*;

use crate::state::ViewerState;

/// Free-text search over the loaded records.
///
/// Every keystroke re-applies the query.
#[component]
pub fn SearchBar(state: Signal<ViewerState>) -> Element {
    let mut state_write = state;
    let text = state.read().search_text().to_string();
    let has_text = !text.is_empty();

    rsx! {
        div {
            class: "search-bar",

            input {
                class: "search-input",
                r#type: "search",
                placeholder: "Buscar por departamento, provincia, ID o especie",
                value: "{text}",
                oninput: move |evt| {
                    state_write.write().set_search(evt.value());
                },
            }

            button {
                class: if has_text { "search-clear" } else { "search-clear hidden" },
                title: "Limpiar",
                onclick: move |_| {
                    state_write.write().clear_search();
                },
                "×"
            }
        }
    }
}
