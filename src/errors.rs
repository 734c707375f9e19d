//! Error types for loading traces and configuration
//!
//! Navigation itself never fails: stepping past either end of the trace is a
//! defined no-op. Errors only arise while turning external input (a trace
//! document, a config file) into the in-memory model.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a [`Trace`](crate::trace::Trace)
#[derive(Debug, Error)]
pub enum TraceError {
    /// Trace file could not be read
    #[error("failed to read trace {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Trace document is not valid JSON (or has the wrong shape)
    #[error("malformed trace document: {0}")]
    Json(#[from] serde_json::Error),

    /// Memory must have at least one cell
    #[error("trace has an empty memory")]
    EmptyMemory,

    /// There must be at least one competing process
    #[error("trace has no processes")]
    NoProcesses,

    /// The first round (one move per process) is required to seed instruction pointers
    #[error("trace has {moves} move(s) but {processes} process(es); the first round is incomplete")]
    IncompleteFirstRound { moves: usize, processes: usize },

    /// A move or owner entry names a process that does not exist
    #[error("{context} refers to process {pid}, but only {processes} exist")]
    UnknownProcess {
        context: String,
        pid: usize,
        processes: usize,
    },

    /// An address lies outside `[0, memory_length)`
    #[error("{context} address {address} is out of bounds for memory of length {length}")]
    AddressOutOfBounds {
        context: String,
        address: usize,
        length: usize,
    },

    /// More display names than processes
    #[error("trace names {names} process(es) but declares {processes}")]
    TooManyNames { names: usize, processes: usize },
}

/// Errors raised while loading a [`Config`](crate::config::Config)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Auto-play cannot run with a zero interval
    #[error("play_interval_ms must be positive")]
    ZeroPlayInterval,

    #[error("window_radius {radius} exceeds the maximum of {max}")]
    WindowRadiusTooLarge { radius: usize, max: usize },
}
