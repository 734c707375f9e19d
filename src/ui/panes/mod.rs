//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`grid`]: The shared circular memory, one glyph per cell, coloured by the
//!   owner of each cell's value and marked where an ip points
//! - [`processes`]: Per-process name, life status and nearby-instruction window
//! - [`status`]: Status bar with keybindings and replay position
//!
//! Each pane module exports a primary `render_*` function that only reads
//! from the [`Stepper`](crate::stepper::Stepper).

pub mod grid;
pub mod processes;
pub mod status;

// Re-export render functions for convenience
pub use grid::render_core_pane;
pub use processes::render_processes_pane;
pub use status::{render_status_bar, StatusRenderData};
