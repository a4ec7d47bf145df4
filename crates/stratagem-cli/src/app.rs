use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use stratagem_core::config::AppConfig;
use stratagem_infrastructure::{
    ConfigService, FileKeyValueStore, ReportStore, SecretServiceImpl, StratagemPaths,
};

/// Everything a command needs, wired once at startup.
pub struct AppContext {
    pub paths: StratagemPaths,
    pub config: AppConfig,
    pub secrets: SecretServiceImpl,
    pub reports: Arc<ReportStore<FileKeyValueStore>>,
}

impl AppContext {
    /// Loads configuration for `paths`. Logging is expected to be running already so that
    /// failures here reach the log file.
    pub fn bootstrap(paths: StratagemPaths) -> Result<Self> {
        let config = ConfigService::from_paths(&paths)?
            .load()
            .context("Failed to load config.toml")?;
        let secrets = SecretServiceImpl::from_paths(&paths)?;

        let storage_dir = paths
            .storage_dir()
            .context("Failed to resolve storage directory")?;
        tracing::debug!(
            "[Bootstrap] Report store at {:?} (key '{}')",
            storage_dir,
            config.storage.storage_key
        );
        let reports = Arc::new(ReportStore::with_key(
            Arc::new(FileKeyValueStore::new(storage_dir)),
            config.storage.storage_key.clone(),
        ));

        Ok(Self {
            paths,
            config,
            secrets,
            reports,
        })
    }

    /// `out` if given, otherwise the default exports directory.
    pub fn export_dir(&self, out: Option<PathBuf>) -> Result<PathBuf> {
        match out {
            Some(dir) => Ok(dir),
            None => self
                .paths
                .exports_dir()
                .context("Failed to resolve exports directory"),
        }
    }
}
