use crate::app::AppContext;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use stratagem_core::export::ExportDocument;
use stratagem_core::report::ReportRepository;
use stratagem_infrastructure::write_export;

pub async fn run(context: &AppContext, id: i64, out: Option<PathBuf>) -> Result<()> {
    let Some(report) = context.reports.find_by_id(id).await else {
        anyhow::bail!("No report with id {id}. Run `stratagem history` to list reports.");
    };

    let Some(document) = ExportDocument::from_report(&report, Utc::now()) else {
        println!("Report {id} has no perspectives, nothing to export.");
        return Ok(());
    };

    let dir = context.export_dir(out)?;
    let path = write_export(&dir, &document)
        .await
        .context("Failed to write export")?;
    println!("Exported to {}", path.display());
    Ok(())
}
