//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/scaletree/scaletree.toml`
//! 3. Local config: `--config <file>` or `./.scaletree.toml`
//! 4. Environment variables: `SCALETREE_*` prefix, nested keys joined by `__`
//!    (`SCALETREE_LEAF_RANK`, `SCALETREE_STYLE__LEAF__COLOR`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{Backbone, Rank, RoleStyle, StyleConfig};

/// Name of the project-local config file.
pub const LOCAL_CONFIG_FILE: &str = ".scaletree.toml";

/// Unified configuration for scaletree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Innermost rank added to the tree (default: genus)
    pub leaf_rank: Rank,
    /// Custom backbone; the curated Lepidoptera trunk when absent
    pub backbone: Option<Backbone>,
    /// Per-role display styles
    pub style: StyleConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            leaf_rank: Rank::Genus,
            backbone: None,
            style: StyleConfig::default(),
        }
    }
}

/// Raw style overrides (each role optional).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawStyleConfig {
    pub family: Option<RoleStyle>,
    pub connector: Option<RoleStyle>,
    pub hierarchy: Option<RoleStyle>,
    pub leaf: Option<RoleStyle>,
}

/// Raw settings for intermediate parsing.
///
/// `None` means "not specified, inherit from the layer below".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub leaf_rank: Option<Rank>,
    pub backbone: Option<Backbone>,
    pub style: RawStyleConfig,
}

impl StyleConfig {
    /// Overlay wins per role when specified.
    pub fn merge(&self, overlay: &RawStyleConfig) -> Self {
        Self {
            family: overlay.family.clone().unwrap_or_else(|| self.family.clone()),
            connector: overlay
                .connector
                .clone()
                .unwrap_or_else(|| self.connector.clone()),
            hierarchy: overlay
                .hierarchy
                .clone()
                .unwrap_or_else(|| self.hierarchy.clone()),
            leaf: overlay.leaf.clone().unwrap_or_else(|| self.leaf.clone()),
        }
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(
        shellexpand::full(path)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| path.to_string()),
    )
}

/// Get the XDG config directory for scaletree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "scaletree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("scaletree.toml"))
}

/// Get the path to the local config file in a directory.
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

impl Settings {
    /// Merge overlay config onto self (base).
    ///
    /// - Scalars: overlay wins if Some, otherwise keep base
    /// - Backbone: replaced wholesale when specified
    /// - Styles: per role
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            leaf_rank: overlay.leaf_rank.unwrap_or(self.leaf_rank),
            backbone: overlay
                .backbone
                .clone()
                .or_else(|| self.backbone.clone()),
            style: self.style.merge(&overlay.style),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit config file; must exist when given.
    ///   Without it, `./.scaletree.toml` is used if present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit or local config
        let local = match config_file {
            Some(path) => {
                let path = expand_path(&path.to_string_lossy());
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                Some(path)
            }
            None => std::env::current_dir()
                .ok()
                .map(|cwd| local_config_path(&cwd))
                .filter(|path| path.exists()),
        };
        if let Some(path) = local {
            let raw = load_raw_settings(&path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply SCALETREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("SCALETREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("leaf_rank") {
            settings.leaf_rank = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("style.leaf.color") {
            settings.style.leaf.color = val;
        }
        if let Ok(val) = config.get_string("style.family.color") {
            settings.style.family.color = val;
        }

        Ok(settings)
    }

    /// Render as TOML (for `config show`).
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
