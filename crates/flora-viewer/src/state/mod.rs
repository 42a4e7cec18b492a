//! State management for the map viewer.

pub mod layer_surface;
pub mod viewer_state;

pub use layer_surface::*;
pub use viewer_state::*;
