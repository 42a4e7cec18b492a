//! Desktop map viewer for Andean flora observations
//!
//! A Dioxus desktop application that loads an observation dataset, draws one
//! circle marker per record, and lets the user filter, hover and inspect
//! them.

pub mod components;
pub mod projection;
pub mod state;
