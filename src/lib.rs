//! # Introduction
//!
//! corewind replays a recorded battle between programs sharing a circular
//! core. Each turn one process moves its instruction pointer and possibly
//! writes a cell; eliminated processes keep producing empty turns. The replay
//! engine steps through that trace forward and backward, reconstructing the
//! exact core contents, ip markers and life statuses at every position
//! without re-running the battle.
//!
//! ## Replay pipeline
//!
//! ```text
//! Trace JSON → Trace → HistoryStore ⇄ Stepper → ReplayEvents → TUI
//! ```
//!
//! 1. [`trace`]: immutable view of the recorded moves and the seeded core.
//! 2. [`history`]: per-cell write stacks, per-process ip stacks and
//!    per-address occupancy lists; every mutation is a push or its pop.
//! 3. [`stepper`]: the cursor state machine, including skip-chaining over
//!    turns of processes that are already dead.
//! 4. [`config`] / [`errors`] / [`logging`]: viewer settings, load-time
//!    errors and the log filter.
//! 5. [`ui`]: ratatui-based viewer; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use corewind::stepper::Stepper;
//! use corewind::trace::{Move, Trace};
//!
//! let trace = Trace::new(
//!     vec!["0".into(); 4],
//!     2,
//!     Default::default(),
//!     vec![Some(Move::new(0, 2, 1, "5")), Some(Move::new(1, 3, 2, "7"))],
//! )
//! .unwrap();
//!
//! let mut stepper = Stepper::new(trace);
//! stepper.jump_to_end();
//! assert_eq!(stepper.memory(), ["0", "5", "7", "0"]);
//! ```

pub mod config;
pub mod errors;
pub mod history;
pub mod logging;
pub mod stepper;
pub mod trace;
pub mod ui;
