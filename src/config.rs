//! Application configuration.
//!
//! The configuration is a JSON file at `$XDG_CONFIG_HOME/fgwm/config.json`
//! (or `~/.config/fgwm/config.json`).  It is read once at startup; nothing
//! is re-read while the daemon runs.
//!
//! # Example
//!
//! ```json
//! {
//!   "grid": {
//!     "columns": 24,
//!     "rows": 24,
//!     "border": 5,
//!     "min_margin": { "w": 10, "h": 10 },
//!     "pad": { "w": 10, "h": 10 }
//!   },
//!   "focus": {
//!     "timeout_ms": 150,
//!     "focused_colour": "#d79921",
//!     "unfocused_colour": "#3c3836"
//!   },
//!   "initial_view": 0,
//!   "settle_delay_ms": 100
//! }
//! ```

use crate::command::Colour;
use crate::geometry::{GridSize, Size};
use crate::grid::GridOptions;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grid layout.
    pub grid: GridConfig,

    /// Focus indication.
    pub focus: FocusConfig,

    /// View that is active when the daemon starts.
    pub initial_view: usize,

    /// Grace period before a newly created window is placed (ms).
    pub settle_delay_ms: u64,

    /// Socket the daemon listens on.  Defaults to
    /// `$XDG_RUNTIME_DIR/fgwm.sock`.
    pub socket_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            focus: FocusConfig::default(),
            initial_view: 0,
            settle_delay_ms: 100,
            socket_path: None,
        }
    }
}

/// Grid dimensions and spacing, all in pixels except `columns`/`rows`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub columns: i32,
    pub rows: i32,
    /// Border width applied to every managed window.
    pub border: i32,
    /// Smallest margin left free at the screen edges.
    pub min_margin: Size,
    /// Gap between a cell boundary and the window border.
    pub pad: Size,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 24,
            rows: 24,
            border: 5,
            min_margin: Size::new(10, 10),
            pad: Size::new(10, 10),
        }
    }
}

impl GridConfig {
    pub fn options(&self) -> GridOptions {
        GridOptions {
            border: self.border,
            min_margin: self.min_margin,
            pad: self.pad,
            dimensions: GridSize::new(self.columns, self.rows),
        }
    }
}

/// Focus indication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Quiet period before the border colours follow the focus (ms).
    pub timeout_ms: u64,
    pub focused_colour: Colour,
    pub unfocused_colour: Colour,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 150,
            focused_colour: Colour(0xd79921),
            unfocused_colour: Colour(0x3c3836),
        }
    }
}

impl FocusConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Load the configuration from the default location.
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is an error.
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_path() {
            Some(path) if path.exists() => Self::load(&path),
            Some(path) => {
                info!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                info!("neither XDG_CONFIG_HOME nor HOME is set, using default config");
                Ok(Self::default())
            }
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// The socket path to listen on / connect to.
    pub fn socket(&self) -> PathBuf {
        self.socket_path.clone().unwrap_or_else(default_socket_path)
    }
}

/// `$XDG_CONFIG_HOME/fgwm/config.json`, falling back to `~/.config`.
pub fn default_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("fgwm").join("config.json"))
}

/// `$XDG_RUNTIME_DIR/fgwm.sock`, or a per-user name in the temp directory.
pub fn default_socket_path() -> PathBuf {
    match std::env::var_os("XDG_RUNTIME_DIR") {
        Some(dir) => PathBuf::from(dir).join("fgwm.sock"),
        None => {
            let user = std::env::var("USER").unwrap_or_else(|_| "default".into());
            std::env::temp_dir().join(format!("fgwm-{}.sock", user))
        }
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
