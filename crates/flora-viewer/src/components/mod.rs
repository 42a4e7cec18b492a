//! UI components for the map viewer.

mod app;
mod map_canvas;
mod notice;
mod search_bar;
mod sidebar;
mod stats_panel;

pub use app::*;
pub use map_canvas::*;
pub use notice::*;
pub use search_bar::*;
pub use sidebar::*;
pub use stats_panel::*;
