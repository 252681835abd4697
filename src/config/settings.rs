//! Application settings and paths.
//!
//! Settings only provide defaults for the command line; flags always win.

use crate::config::scan::{
    ScanMode, DEFAULT_MAX_BANNER_LEN, DEFAULT_TIMEOUT_MS, DEFAULT_WORKERS, MAX_BANNER_LEN,
};
use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the durable result log.
pub const DEFAULT_OUTPUT_FILE: &str = "scan_results.txt";

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portpool)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Resolve paths using XDG directories.
    pub fn new() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "portpool", "portpool")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Default number of worker threads.
    pub default_workers: usize,
    /// Default per-operation timeout in milliseconds.
    pub default_timeout_ms: u64,
    /// Default scan mode.
    pub default_mode: ScanMode,
    /// Durable log file.
    pub output_file: PathBuf,
    /// Append to the log file instead of truncating it.
    pub append: bool,
    /// Maximum banner bytes kept per open port.
    pub max_banner_len: usize,
    /// Colour the interactive output.
    pub color: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_workers: DEFAULT_WORKERS,
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            default_mode: ScanMode::Full,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            append: false,
            max_banner_len: DEFAULT_MAX_BANNER_LEN,
            color: true,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location.
    ///
    /// A missing settings file yields the built-in defaults.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::new()?.settings_file();

        if !file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse and validate settings from JSON text.
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let settings: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.output_file.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue(
                "output_file must not be empty".to_string(),
            ));
        }
        if self.default_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "default_timeout_ms must be at least 1".to_string(),
            ));
        }
        if !(1..=MAX_BANNER_LEN).contains(&self.max_banner_len) {
            return Err(ConfigError::InvalidValue(format!(
                "max_banner_len must be between 1 and {}",
                MAX_BANNER_LEN
            )));
        }
        Ok(())
    }
}
