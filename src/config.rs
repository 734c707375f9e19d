//! Replay viewer configuration
//!
//! Loaded from an optional TOML file; every key is optional and falls back to
//! the defaults below. Command-line flags are applied on top by `main`.
//!
//! ```toml
//! play_interval_ms = 250
//! window_radius = 3
//! log_file = "/tmp/corewind.log"
//! process_colors = ["red", "blue", "green"]
//! ```

use crate::errors::ConfigError;
use crate::stepper::Stepper;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Auto-play delay between steps
pub const DEFAULT_PLAY_INTERVAL_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Delay between automatic steps while playing
    pub play_interval_ms: u64,
    /// Cells shown on either side of a process's ip
    pub window_radius: usize,
    /// Where to write logs while the TUI owns the terminal
    pub log_file: Option<PathBuf>,
    /// Colour names assigned to processes in order (wraps around)
    pub process_colors: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    play_interval_ms: Option<u64>,
    window_radius: Option<usize>,
    log_file: Option<PathBuf>,
    process_colors: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            play_interval_ms: DEFAULT_PLAY_INTERVAL_MS,
            window_radius: Stepper::DEFAULT_WINDOW_RADIUS,
            log_file: None,
            process_colors: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a TOML document, filling unspecified keys with defaults
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let defaults = Config::default();
        let config = Config {
            play_interval_ms: parsed.play_interval_ms.unwrap_or(defaults.play_interval_ms),
            window_radius: parsed.window_radius.unwrap_or(defaults.window_radius),
            log_file: parsed.log_file.or(defaults.log_file),
            process_colors: parsed.process_colors.unwrap_or(defaults.process_colors),
        };

        if config.play_interval_ms == 0 {
            return Err(ConfigError::ZeroPlayInterval);
        }
        if config.window_radius > Stepper::MAX_WINDOW_RADIUS {
            return Err(ConfigError::WindowRadiusTooLarge {
                radius: config.window_radius,
                max: Stepper::MAX_WINDOW_RADIUS,
            });
        }
        Ok(config)
    }

    /// Load configuration from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Config::default());
        };

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }
}
