//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, auto-play
//! - **[`panes`]**: stateless render functions for each visible pane (core,
//!   processes, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a [`Stepper`] and
//! call [`App::run`] to start the event loop. The app is the presentation
//! adapter for the replay engine: it only reads state and consumes the
//! [`ReplayEvent`]s each navigation call returns.
//!
//! [`Stepper`]: crate::stepper::Stepper
//! [`ReplayEvent`]: crate::stepper::ReplayEvent
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
