//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/sankalp/sankalp.toml`
//! 3. Local config: `<project_dir>/.sankalp.toml`
//! 4. Environment variables: `SANKALP_*` prefix (`__` separates nested keys)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// How the hierarchy is printed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Show kind, location and head next to each branch name
    pub show_details: bool,
    /// Ignore the stored expanded set and show every branch
    pub expand_all: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_details: true,
            expand_all: false,
        }
    }
}

/// Raw render config for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderConfig {
    pub show_details: Option<bool>,
    pub expand_all: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub render: RawRenderConfig,
}

/// Unified configuration for sankalp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Organization data file (default: XDG data dir)
    pub data_file: PathBuf,
    /// Hierarchy display settings
    pub render: RenderConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            render: RenderConfig::default(),
        }
    }
}

fn default_data_file() -> PathBuf {
    ProjectDirs::from("", "", "sankalp")
        .map(|dirs| dirs.data_dir().join("organization.toml"))
        .unwrap_or_else(|| PathBuf::from("~/.sankalp/organization.toml"))
}

/// Get the XDG config directory for sankalp.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sankalp").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("sankalp.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".sankalp.toml")
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

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_file.to_string_lossy().as_ref());
        self.data_file = PathBuf::from(expanded);
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay
                .data_file
                .clone()
                .unwrap_or_else(|| self.data_file.clone()),
            render: RenderConfig {
                show_details: overlay
                    .render
                    .show_details
                    .unwrap_or(self.render.show_details),
                expand_all: overlay.render.expand_all.unwrap_or(self.render.expand_all),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.sankalp.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply SANKALP_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("SANKALP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_bool("render.show_details") {
            settings.render.show_details = val;
        }
        if let Ok(val) = config.get_bool("render.expand_all") {
            settings.render.expand_all = val;
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
        r#"# sankalp configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/sankalp/sankalp.toml
#   Local:  <project_dir>/.sankalp.toml
#   Env:    SANKALP_* environment variables (SANKALP_RENDER__EXPAND_ALL=true)

# Organization data file (branches, roles, projects, expanded branches)
# data_file = "~/.local/share/sankalp/organization.toml"

[render]
# Show kind, location and head next to each branch
# show_details = true

# Show the whole hierarchy regardless of the stored expanded set
# expand_all = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
