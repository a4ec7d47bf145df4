use crate::app::AppContext;
use crate::render;
use anyhow::Result;
use stratagem_core::report::{ReportRepository, group_by_month};

pub async fn run(context: &AppContext) -> Result<()> {
    let reports = context.reports.load().await;
    print!("{}", render::history(&group_by_month(&reports)));
    Ok(())
}
