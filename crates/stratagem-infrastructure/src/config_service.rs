//! Configuration service.
//!
//! Loads `config.toml`. A missing file means "all defaults"; a file that exists but does
//! not parse is a configuration error rather than being silently replaced.

use crate::paths::StratagemPaths;
use std::path::{Path, PathBuf};
use stratagem_core::config::AppConfig;
use stratagem_core::error::{Result, StratagemError};

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_paths(paths: &StratagemPaths) -> Result<Self> {
        Ok(Self::new(paths.config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<AppConfig> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "[ConfigService] No config at {:?}, using defaults",
                    self.path
                );
                return Ok(AppConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        toml::from_str(&content).map_err(|e| {
            StratagemError::config(format!("Invalid config file {:?}: {}", self.path, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratagem_core::config::GenerationBackend;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));
        assert_eq!(service.load().unwrap(), AppConfig::default());
    }

    #[test]
    fn reads_values_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[generation]\nbackend = \"proxy\"\nproxy_url = \"http://localhost:3000\"\nperspective_count = 10\n\n[storage]\nstorage_key = \"team_reports\"\n",
        )
        .unwrap();

        let config = ConfigService::new(&path).load().unwrap();
        assert_eq!(config.generation.backend, GenerationBackend::Proxy);
        assert_eq!(config.generation.perspective_count, 10);
        assert_eq!(config.storage.storage_key, "team_reports");
    }

    #[test]
    fn malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[generation\nbackend = ").unwrap();

        let err = ConfigService::new(&path).load().unwrap_err();
        assert!(err.is_config());
    }
}
