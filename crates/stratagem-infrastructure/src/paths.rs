//! Unified path management for stratagem files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/stratagem/            # Config directory
//! ├── config.toml                 # Application configuration
//! ├── secret.json                 # API keys
//! └── logs/                       # Application logs
//!     └── stratagem.log.YYYY-MM-DD
//!
//! ~/.local/share/stratagem/       # Data directory
//! ├── storage/                    # Key-value records (strategic_reports.json)
//! └── exports/                    # Default export destination
//! ```
//!
//! With a base directory override everything lives under `<base>/config` and `<base>/data`.

use std::path::{Path, PathBuf};
use stratagem_core::config::{GeminiConfig, SecretConfig, DEFAULT_GEMINI_MODEL};

const APP_NAME: &str = "stratagem";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config/data directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for stratagem_core::StratagemError {
    fn from(err: PathError) -> Self {
        stratagem_core::StratagemError::config(err.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StratagemPaths {
    base: Option<PathBuf>,
}

impl StratagemPaths {
    /// `base` relocates every path under one root (used by tests and `--base-dir`).
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|d| d.join(APP_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|d| d.join(APP_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Ensure this file has restrictive permissions; see [`Self::ensure_secret_file`].
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }

    pub fn storage_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("storage"))
    }

    pub fn exports_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("exports"))
    }

    /// Creates `secret.json` with an empty Gemini entry if it does not exist.
    ///
    /// On Unix the file is created with mode 600.
    pub fn ensure_secret_file(&self) -> std::io::Result<PathBuf> {
        let secret_path = self
            .secret_file()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;

        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: String::new(),
                model_name: Some(DEFAULT_GEMINI_MODEL.to_string()),
            }),
        };
        let template_json = serde_json::to_string_pretty(&template).map_err(std::io::Error::other)?;

        std::fs::write(&secret_path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}
