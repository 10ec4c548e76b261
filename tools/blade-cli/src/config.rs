//! Configuration management (config.toml)
//!
//! Settings live in the platform config directory unless `--config` points
//! somewhere else.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blade_save::Title;
use blade_save::fs::MAX_SAVE_BYTES;
use serde::{Deserialize, Serialize};

/// Tool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Title assumed by `pack` without `--template` or `--title` (default: ib3)
    #[serde(default = "default_title")]
    pub default_title: String,
    /// Indent JSON output (default: true)
    #[serde(default = "default_true")]
    pub pretty_json: bool,
    /// Directory for generated files; next to the input when unset
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Largest input file read into memory (default: 64 MiB)
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: u64,
}

fn default_title() -> String {
    Title::Ib3.to_string()
}
fn default_true() -> bool {
    true
}
fn default_max_input_bytes() -> u64 {
    MAX_SAVE_BYTES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_title: default_title(),
            pretty_json: default_true(),
            output_dir: None,
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

impl Config {
    pub fn default_title(&self) -> Result<Title> {
        self.default_title
            .parse()
            .map_err(|err: String| anyhow::anyhow!("config default_title: {err}"))
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\BladeSave\config`
/// On macOS: `~/Library/Application Support/io.bladesave.BladeSave`
/// On Linux: `~/.config/BladeSave`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.bladesave", "", "BladeSave")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loads the configuration.
///
/// Reads `config.toml` from the platform config directory, or `explicit`
/// when given. A missing file means defaults; a file that does not parse is
/// an error.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match config_dir() {
            Some(dir) => dir.join("config.toml"),
            None => return Ok(Config::default()),
        },
    };
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    parse(&content).with_context(|| format!("Invalid config: {}", path.display()))
}

fn parse(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    config.default_title()?;
    Ok(config)
}
