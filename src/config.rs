//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/htmled/htmled.toml`
//! 3. Local config: `<dir>/.htmled.toml` (working directory by default)
//! 4. Environment variables: `HTMLED_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Name of the local config file.
pub const LOCAL_CONFIG_FILE: &str = ".htmled.toml";

/// Unified configuration for htmled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory documents are loaded from and saved to (default: files)
    pub files_dir: PathBuf,
    /// Directory holding the session state (default: .temp)
    pub state_dir: PathBuf,
    /// Indent width of saved documents and `print-indent`
    pub indent_width: usize,
    /// Indent width of `print-tree` when connectors are off
    pub tree_indent: usize,
    /// Show element ids in `print-tree` for newly opened files
    pub show_id: bool,
    /// Draw branch connectors in `print-tree`
    pub connectors: bool,
    /// Word list for spell checking; spell checking is off without one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            files_dir: PathBuf::from("files"),
            state_dir: PathBuf::from(".temp"),
            indent_width: 4,
            tree_indent: 2,
            show_id: true,
            connectors: true,
            dictionary: None,
        }
    }
}

/// Raw settings for intermediate parsing; `None` means "not specified".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub files_dir: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub indent_width: Option<usize>,
    pub tree_indent: Option<usize>,
    pub show_id: Option<bool>,
    pub connectors: Option<bool>,
    pub dictionary: Option<PathBuf>,
}

/// Get the XDG config directory for htmled.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "htmled").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("htmled.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the path as is.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(raw.as_ref()) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            debug!("not expanding {}: {}", raw, e);
            path.to_path_buf()
        }
    }
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.files_dir = expand_path(&self.files_dir);
        self.state_dir = expand_path(&self.state_dir);
        self.dictionary = self.dictionary.as_deref().map(expand_path);
    }

    /// Overlay values win where specified, otherwise keep self.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            files_dir: overlay
                .files_dir
                .clone()
                .unwrap_or_else(|| self.files_dir.clone()),
            state_dir: overlay
                .state_dir
                .clone()
                .unwrap_or_else(|| self.state_dir.clone()),
            indent_width: overlay.indent_width.unwrap_or(self.indent_width),
            tree_indent: overlay.tree_indent.unwrap_or(self.tree_indent),
            show_id: overlay.show_id.unwrap_or(self.show_id),
            connectors: overlay.connectors.unwrap_or(self.connectors),
            dictionary: overlay
                .dictionary
                .clone()
                .or_else(|| self.dictionary.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Directory searched for `.htmled.toml` (working directory if `None`)
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Local config
        let local_path = local_config_path(local_dir.unwrap_or_else(|| Path::new(".")));
        if local_path.exists() {
            debug!("loading local config {}", local_path.display());
            current = current.merge_with(&load_raw_settings(&local_path)?);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        Ok(current)
    }

    /// Apply HTMLED_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("HTMLED")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("files_dir") {
            settings.files_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("state_dir") {
            settings.state_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("dictionary") {
            settings.dictionary = Some(PathBuf::from(val));
        }
        if let Some(val) = get_usize(&config, "indent_width")? {
            settings.indent_width = val;
        }
        if let Some(val) = get_usize(&config, "tree_indent")? {
            settings.tree_indent = val;
        }
        if let Some(val) = get_bool(&config, "show_id")? {
            settings.show_id = val;
        }
        if let Some(val) = get_bool(&config, "connectors")? {
            settings.connectors = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# htmled configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/htmled/htmled.toml
#   Local:  ./.htmled.toml
#   Env:    HTMLED_* environment variables (e.g. HTMLED_INDENT_WIDTH=2)

# Directory documents are loaded from and saved to
# files_dir = "files"

# Directory for the session state between runs
# state_dir = ".temp"

# Indent width of saved documents and print-indent
# indent_width = 4

# Indent width of print-tree without connectors
# tree_indent = 2

# Show element ids in print-tree
# show_id = true

# Draw branch connectors in print-tree
# connectors = true

# Word list (one word per line) enabling spell checking
# dictionary = "~/.config/htmled/words.txt"
"#
        .to_string()
    }
}

/// Present and valid: `Some`; absent: `None`; present but invalid: error.
fn get_usize(config: &Config, key: &str) -> Result<Option<usize>, ApplicationError> {
    match config.get_string(key) {
        Ok(val) => val.trim().parse().map(Some).map_err(|_| ApplicationError::Config {
            message: format!("{key}: expected a non-negative integer, got '{val}'"),
        }),
        Err(_) => Ok(None),
    }
}

fn get_bool(config: &Config, key: &str) -> Result<Option<bool>, ApplicationError> {
    match config.get_string(key) {
        Ok(val) => match val.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(ApplicationError::Config {
                message: format!("{key}: expected true or false, got '{val}'"),
            }),
        },
        Err(_) => Ok(None),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
