use anyhow::{Context, Result};
use stratagem_infrastructure::StratagemPaths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{LevelFilter, filter_fn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Events under this target go to the log file only.
const FILE_ONLY_TARGET: &str = "stratagem::file_only";

/// Installs the global subscriber.
///
/// - file: `<logs>/stratagem.log.YYYY-MM-DD`, level from `RUST_LOG` (default `info`)
/// - stderr: warnings only, or everything the filter lets through with `--verbose`
///
/// The returned guard flushes the file writer on drop; keep it alive for the whole run.
pub fn init(paths: &StratagemPaths, verbose: bool) -> Result<WorkerGuard> {
    let logs_dir = paths.logs_dir().context("Failed to resolve logs directory")?;
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create logs directory {:?}", logs_dir))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("stratagem.log")
        .build(&logs_dir)
        .context("Failed to create log file appender")?;
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_level = if verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::WARN
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(stderr_level)
                .with_filter(filter_fn(|meta| meta.target() != FILE_ONLY_TARGET)),
        )
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!("[Logging] Writing logs to {:?}", logs_dir);
    Ok(guard)
}

/// Records the error that ends the run. anyhow already prints it to stderr.
pub fn record_failure(err: &anyhow::Error) {
    tracing::error!(target: FILE_ONLY_TARGET, "[Main] {:#}", err);
}
