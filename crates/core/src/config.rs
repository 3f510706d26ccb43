//! Layered application configuration.
//!
//! Values come from the built-in defaults, then the user's
//! `config.toml`, then `TICTACTOE_*` environment variables
//! (`__` separates nested keys, e.g. `TICTACTOE_BLINK__STEPS=8`).

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use crate::error::CoreError;

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "tictactoe";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "TICTACTOE";

/// Contents written to a fresh `config.toml`.
pub const DEFAULT_CONFIG: &str = r##"# Tic-Tac-Toe configuration

[theme]
# "classic" or "enhanced" (hover highlight and move preview)
name = "enhanced"
hover_preview = true
# Optional colour overrides as "#rrggbb" or "#rgb":
# x_color = "#ff0000"
# o_color = "#0000ff"
# win_color = "#00ff00"
# tie_color = "#ffff00"

[blink]
enabled = true
steps = 6
interval_ms = 300

[history]
limit = 10

[logging]
level = "info"
# directory = "/tmp/tictactoe-logs"
"##;

/// Which colour scheme the board uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    /// Flat colours, no hover feedback.
    Classic,
    /// Hover highlight and a ghost preview of the next mark.
    Enhanced,
}

/// Board appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Base colour scheme.
    pub name: ThemeName,
    /// Show the current player's mark faintly on the hovered cell.
    #[serde(default = "default_true")]
    pub hover_preview: bool,
    /// Override for X marks.
    #[serde(default)]
    pub x_color: Option<String>,
    /// Override for O marks.
    #[serde(default)]
    pub o_color: Option<String>,
    /// Override for the winning line highlight.
    #[serde(default)]
    pub win_color: Option<String>,
    /// Override for the tie fill.
    #[serde(default)]
    pub tie_color: Option<String>,
}

/// Win announcement blink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkConfig {
    /// Whether a won game blinks its line at all.
    pub enabled: bool,
    /// Number of repaint steps.
    pub steps: u32,
    /// Delay between steps in milliseconds.
    pub interval_ms: u64,
}

impl BlinkConfig {
    /// Step interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Session history panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Number of finished games to remember.
    pub limit: usize,
}

/// Log output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for the log file; `./logs` when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Board appearance.
    pub theme: ThemeConfig,
    /// Win blink.
    pub blink: BlinkConfig,
    /// Session history.
    pub history: HistoryConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: ThemeConfig {
                name: ThemeName::Enhanced,
                hover_preview: true,
                x_color: None,
                o_color: None,
                win_color: None,
                tie_color: None,
            },
            blink: BlinkConfig {
                enabled: true,
                steps: 6,
                interval_ms: 300,
            },
            history: HistoryConfig { limit: 10 },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: None,
            },
        }
    }
}

impl AppConfig {
    /// Load from the default location, falling back to built-in values.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load using `path` as the user file. A missing file is not an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;

        let config: AppConfig = settings
            .try_deserialize()
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the game unusable.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.blink.enabled && self.blink.steps == 0 {
            return Err(CoreError::InvalidConfig(
                "blink.steps must be at least 1 when blinking is enabled".to_string(),
            ));
        }
        if self.blink.interval_ms == 0 {
            return Err(CoreError::InvalidConfig(
                "blink.interval_ms must be positive".to_string(),
            ));
        }
        if self.history.limit == 0 {
            return Err(CoreError::InvalidConfig(
                "history.limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory the log file is written to.
    pub fn log_dir(&self) -> Result<PathBuf> {
        match &self.logging.directory {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()
                .context("failed to resolve working directory")?
                .join("logs")),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Platform config directory for the game.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Location of the user's `config.toml`.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Write the default config file if none exists yet.
///
/// Returns the config path and whether the file was created by this call.
pub fn ensure_default_config() -> Result<(PathBuf, bool)> {
    let path = config_path();
    let created = ensure_default_config_at(&path)?;
    Ok((path, created))
}

/// Write [`DEFAULT_CONFIG`] to `path` unless the file already exists.
///
/// Returns `true` when the file was written.
pub fn ensure_default_config_at(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write config {}", path.display()))?;
    Ok(true)
}
