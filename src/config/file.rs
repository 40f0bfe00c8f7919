//! Configuration file support.
//!
//! Settings are read from `~/.config/dir-usage/config.toml` (or the
//! platform equivalent). Precedence is **CLI argument > config file >
//! built-in default**.
//!
//! # Example config
//!
//! ```toml
//! # dir = "~/Projects"
//! # dirs = ["~/Projects", "/var/cache"]
//!
//! [collect]
//! program = "du"
//! depth = 2
//! shell = true
//!
//! [display]
//! min_size = "10MB"
//! sort = "size"
//! reverse = false
//! block_size = 1024
//! verbose = false
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level configuration file structure.
///
/// Every field is optional so that unset keys fall through to CLI defaults.
#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    /// Default directories to report on (takes priority over `dir`)
    pub dirs: Option<Vec<PathBuf>>,

    /// Default directory to report on
    pub dir: Option<PathBuf>,

    /// Invocation options
    #[serde(default)]
    pub collect: FileCollectConfig,

    /// Presentation options
    #[serde(default)]
    pub display: FileDisplayConfig,
}

/// `[collect]` section.
#[derive(Deserialize, Default, Debug)]
pub struct FileCollectConfig {
    /// Program to run instead of `du`
    pub program: Option<String>,

    /// Maximum depth to report
    pub depth: Option<usize>,

    /// Whether to run the program through the command shell
    pub shell: Option<bool>,
}

/// `[display]` section.
#[derive(Deserialize, Default, Debug)]
pub struct FileDisplayConfig {
    /// Hide entries smaller than this size (e.g. `"10MB"`)
    pub min_size: Option<String>,

    /// Sort criterion (`"size"` or `"path"`)
    pub sort: Option<String>,

    /// Reverse the sort order
    pub reverse: Option<bool>,

    /// Bytes per unit reported by the program
    pub block_size: Option<u64>,

    /// Enable debug logging
    pub verbose: Option<bool>,
}

/// Expand a leading `~` to the user's home directory.
///
/// Paths that don't start with `~` are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

impl FileConfig {
    /// Path of the configuration file, `<config_dir>/dir-usage/config.toml`.
    ///
    /// Returns `None` if the platform config directory cannot be determined.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dir-usage").join("config.toml"))
    }

    /// Load the configuration from [`FileConfig::config_path`].
    ///
    /// A missing file yields the default (empty) configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        Self::load_from(&path)
    }

    /// Load the configuration from an explicit file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))
    }

    /// Directories from the config file with `~` expanded; `dirs` wins over `dir`.
    #[must_use]
    pub fn directories(&self) -> Option<Vec<PathBuf>> {
        if let Some(dirs) = &self.dirs
            && !dirs.is_empty()
        {
            return Some(dirs.iter().map(|d| expand_tilde(d)).collect());
        }

        self.dir.as_deref().map(|d| vec![expand_tilde(d)])
    }
}
