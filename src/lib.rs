//! Thistle scene graph toolkit
//!
//! A retained-mode scene graph of reference-counted nodes, visitors that walk
//! it, per-frame update callbacks, projection-space picking and a frame-driven
//! viewer that talks to a pluggable render backend.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod io;
pub mod logging;
pub mod performance;
pub mod prelude;

// Re-export main types for convenience
pub use app::Viewer;
pub use config::ViewerConfig;
pub use error::{Error, Result};
pub use io::{read_node_file, write_node_file};
