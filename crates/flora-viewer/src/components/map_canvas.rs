//! SVG map with circle markers, highlight ring and popup.

use dioxus::prelude::*;

use flora_core::{MapEvent, MarkerId, MarkerStyle};

use crate::projection::Projection;
use crate::state::ViewerState;

const MAP_WIDTH: f64 = 1000.0;
const MAP_HEIGHT: f64 = 700.0;
const MAP_PADDING: f64 = 30.0;

/// One marker ready to draw.
#[derive(Debug, Clone, PartialEq)]
struct MarkerDot {
    id: MarkerId,
    cx: f64,
    cy: f64,
    style: MarkerStyle,
}

/// The map itself. Only attached markers inside the viewport are drawn.
#[component]
pub fn MapCanvas(state: Signal<ViewerState>) -> Element {
    let mut state_write = state;
    let state_read = state.read();

    let Some(session) = state_read.session() else {
        return rsx! {
            div { class: "map-frame map-empty" }
        };
    };

    let projection = Projection::for_view(session.view(), MAP_WIDTH, MAP_HEIGHT, MAP_PADDING);
    let surface = session.registry().surface();

    let dots: Vec<MarkerDot> = session
        .registry()
        .entries()
        .iter()
        .filter_map(|entry| {
            let drawn = surface.marker(entry.handle())?;
            if !drawn.attached {
                return None;
            }
            let (cx, cy) = projection.project(drawn.position);
            if !projection.in_viewport((cx, cy)) {
                return None;
            }
            Some(MarkerDot {
                id: entry.id(),
                cx,
                cy,
                style: drawn.style.clone(),
            })
        })
        .collect();

    let highlight = surface.highlight().map(|p| projection.project(p));
    let highlight_radius = state_read.config.highlight_radius;

    // Popup anchored above its marker, positioned in percent of the frame
    let popup = state_read.popup().map(|(entry, html)| {
        let (x, y) = projection.project(entry.record().position());
        (x / MAP_WIDTH * 100.0, y / MAP_HEIGHT * 100.0, html.to_string())
    });
    let popup_max_width = state_read.config.popup_max_width;

    rsx! {
        div {
            class: "map-frame",

            svg {
                class: "map-svg",
                view_box: "0 0 {MAP_WIDTH} {MAP_HEIGHT}",
                preserve_aspect_ratio: "xMidYMid meet",
                onclick: move |_| {
                    state_write.write().dispatch(MapEvent::MapClicked);
                },

                rect {
                    class: "map-background",
                    x: "0",
                    y: "0",
                    width: "{MAP_WIDTH}",
                    height: "{MAP_HEIGHT}",
                }

                for dot in dots {
                    {
                        let id = dot.id;
                        rsx! {
                            circle {
                                key: "{id}",
                                class: "marker",
                                cx: "{dot.cx}",
                                cy: "{dot.cy}",
                                r: "{dot.style.radius}",
                                fill: "{dot.style.fill_color}",
                                fill_opacity: "{dot.style.fill_opacity}",
                                stroke: "{dot.style.stroke_color}",
                                stroke_width: "1",
                                onmouseenter: move |_| {
                                    state_write.write().dispatch(MapEvent::MarkerHovered(id));
                                },
                                onmouseleave: move |_| {
                                    state_write.write().dispatch(MapEvent::MarkerUnhovered);
                                },
                                onclick: move |evt| {
                                    evt.stop_propagation();
                                    state_write.write().dispatch(MapEvent::MarkerClicked(id));
                                },
                            }
                        }
                    }
                }

                if let Some((hx, hy)) = highlight {
                    circle {
                        class: "highlight-ring",
                        cx: "{hx}",
                        cy: "{hy}",
                        r: "{highlight_radius}",
                        fill: "none",
                        pointer_events: "none",
                    }
                }
            }

            if let Some((left, top, html)) = popup {
                div {
                    class: "map-popup",
                    style: "left: {left}%; top: {top}%; max-width: {popup_max_width}px;",
                    onclick: move |evt| evt.stop_propagation(),
                    div {
                        class: "map-popup-content",
                        dangerous_inner_html: "{html}",
                    }
                }
            }
        }
    }
}
