use crate::storage::atomic_file::write_atomic;
use std::path::{Path, PathBuf};
use stratagem_core::error::{Result, StratagemError};
use stratagem_core::export::ExportDocument;

/// Writes `document` as pretty JSON into `dir` under its generated file name.
///
/// Returns the path of the written file. `dir` is created if needed.
pub async fn write_export(dir: &Path, document: &ExportDocument) -> Result<PathBuf> {
    let path = dir.join(document.file_name());
    let contents = document.to_json_pretty()?;

    let target = path.clone();
    tokio::task::spawn_blocking(move || write_atomic(&target, contents.as_bytes()))
        .await
        .map_err(|e| StratagemError::internal(format!("Failed to join task: {}", e)))??;

    tracing::info!(
        "[Export] Wrote {} perspectives to {:?}",
        document.perspectives.len(),
        path
    );
    Ok(path)
}
