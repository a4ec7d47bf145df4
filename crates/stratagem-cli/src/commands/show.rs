use crate::app::AppContext;
use crate::render;
use anyhow::Result;
use colored::Colorize;
use stratagem_core::report::ReportRepository;

pub async fn run(context: &AppContext, id: i64) -> Result<()> {
    let Some(report) = context.reports.find_by_id(id).await else {
        anyhow::bail!("No report with id {id}. Run `stratagem history` to list reports.");
    };

    println!("{}", report.topic.bold());
    println!(
        "{}\n",
        format!(
            "Generated {} | {} perspectives",
            report.date.format("%Y-%m-%d %H:%M UTC"),
            report.perspectives.len()
        )
        .dimmed()
    );
    for perspective in &report.perspectives {
        println!("{}", render::perspective(perspective));
    }
    Ok(())
}
