//! Secret service implementation.
//!
//! Reads API keys from `secret.json`. The `GEMINI_API_KEY` and `API_KEY` environment
//! variables take precedence over the file, in that order.

use crate::paths::StratagemPaths;
use std::path::PathBuf;
use std::sync::Arc;
use stratagem_core::config::{GeminiConfig, SecretConfig};
use stratagem_core::error::{Result, StratagemError};

const ENV_KEYS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Loads secret configuration. Error messages never contain key material.
#[derive(Clone)]
pub struct SecretServiceImpl {
    path: PathBuf,
    env: EnvLookup,
}

impl SecretServiceImpl {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env: Arc::new(|name| std::env::var(name).ok()),
        }
    }

    pub fn from_paths(paths: &StratagemPaths) -> Result<Self> {
        Ok(Self::new(paths.secret_file()?))
    }

    /// Replaces the environment lookup.
    pub fn with_env(mut self, env: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Reads `secret.json`. A missing file is an empty configuration.
    pub fn load_secrets(&self) -> Result<SecretConfig> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SecretConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map_err(|e| {
            StratagemError::config(format!("Invalid secret file {:?}: {}", self.path, e))
        })
    }

    /// Resolves the Gemini credential, environment first.
    ///
    /// # Errors
    ///
    /// `Config` when no non-empty API key is available from either source.
    pub fn gemini_credentials(&self) -> Result<GeminiConfig> {
        let from_file = self.load_secrets()?.gemini;

        let env_key = ENV_KEYS
            .iter()
            .find_map(|name| (self.env)(*name).filter(|v| !v.trim().is_empty()));

        if let Some(api_key) = env_key {
            tracing::debug!("[SecretService] Using Gemini API key from environment");
            return Ok(GeminiConfig {
                api_key,
                model_name: from_file.and_then(|c| c.model_name),
            });
        }

        match from_file {
            Some(config) if !config.api_key.trim().is_empty() => Ok(config),
            _ => Err(StratagemError::config(format!(
                "Gemini API key not set: define GEMINI_API_KEY or fill in {:?}",
                self.path
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_file_and_env_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let service = SecretServiceImpl::new(temp_dir.path().join("secret.json")).with_env(no_env);

        let err = service.gemini_credentials().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn blank_key_in_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, r#"{"gemini": {"api_key": "  "}}"#).unwrap();

        let err = SecretServiceImpl::new(&path)
            .with_env(no_env)
            .gemini_credentials()
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn reads_key_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(
            &path,
            r#"{"gemini": {"api_key": "file-key", "model_name": "gemini-2.5-pro"}}"#,
        )
        .unwrap();

        let config = SecretServiceImpl::new(&path)
            .with_env(no_env)
            .gemini_credentials()
            .unwrap();
        assert_eq!(config.api_key, "file-key");
        assert_eq!(config.model_name.as_deref(), Some("gemini-2.5-pro"));
    }

    #[test]
    fn environment_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, r#"{"gemini": {"api_key": "file-key"}}"#).unwrap();

        let config = SecretServiceImpl::new(&path)
            .with_env(|name| (name == "API_KEY").then(|| "env-key".to_string()))
            .gemini_credentials()
            .unwrap();
        assert_eq!(config.api_key, "env-key");
    }

    #[test]
    fn malformed_file_is_config_error_without_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, r#"{"gemini": "sk-leaky"#).unwrap();

        let err = SecretServiceImpl::new(&path).with_env(no_env).load_secrets().unwrap_err();
        assert!(err.is_config());
        assert!(!err.to_string().contains("sk-leaky"));
    }
}
