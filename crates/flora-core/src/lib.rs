//! # Flora Core
//!
//! Record-to-marker synchronization engine for Flora Map.
//!
//! This crate turns a tabular or JSON dataset of species occurrences into a
//! set of map markers and keeps those markers consistent with a text search
//! filter and hover/selection interactions. It never talks to a map widget
//! directly: every visual change goes through the [`VisualSurface`] trait, so
//! the same engine drives the desktop viewer and the [`RecordingSurface`]
//! used in tests.
//!
//! ## Pipeline
//!
//! - [`loader`]: reads records from a file or in-memory text, dropping rows
//!   with unusable coordinates
//! - [`classifier`]: assigns each record a [`Category`] (marker colour)
//! - [`registry`]: owns one [`MarkerEntry`] per record plus the highlight slot
//! - [`filter`]: recomputes visibility for a search query
//! - [`presenter`]: renders escaped popup and sidebar fragments
//! - [`stats`]: total/visible counts
//! - [`session`]: event-driven orchestration of all of the above

pub mod classifier;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod presenter;
pub mod record;
pub mod registry;
pub mod session;
pub mod stats;
pub mod surface;

// Re-export main types
pub use classifier::*;
pub use config::*;
pub use error::*;
pub use filter::*;
pub use loader::*;
pub use presenter::*;
pub use record::*;
pub use registry::*;
pub use session::*;
pub use stats::*;
pub use surface::*;
