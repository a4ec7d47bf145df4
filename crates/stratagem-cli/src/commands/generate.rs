use crate::app::AppContext;
use crate::render;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use stratagem_application::{GenerationWorkflow, WorkflowPhase};
use stratagem_core::config::GenerationBackend;
use stratagem_infrastructure::write_export;
use stratagem_interaction::build_generator;

pub async fn run(
    context: &AppContext,
    topic: &str,
    export: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let generator = match build_generator(&context.config, &context.secrets) {
        Ok(generator) => generator,
        Err(e) if e.is_config() && context.config.generation.backend == GenerationBackend::Gemini => {
            let secret_file = context
                .paths
                .ensure_secret_file()
                .context("Failed to create secret.json template")?;
            anyhow::bail!("{e}\nAdd your key to {}", secret_file.display());
        }
        Err(e) => return Err(e).context("Generation backend is not configured"),
    };
    let workflow = GenerationWorkflow::new(generator, context.reports.clone());

    eprintln!("{}", "Generating perspectives...".dimmed());
    let snapshot = workflow.submit(topic).await;

    match snapshot.phase {
        WorkflowPhase::Success => {}
        _ => {
            let message = snapshot
                .error
                .unwrap_or_else(|| "Generation did not complete".to_string());
            anyhow::bail!(message);
        }
    }

    for perspective in &snapshot.perspectives {
        println!("{}", render::perspective(perspective));
    }

    match (snapshot.archived_report_id, &snapshot.archive_warning) {
        (Some(id), _) => println!("{}", format!("Saved as report {id}").green()),
        (None, Some(warning)) => eprintln!("{}", warning.yellow()),
        (None, None) => {}
    }

    if export {
        match workflow.export().await {
            Some(document) => {
                let dir = context.export_dir(out)?;
                let path = write_export(&dir, &document)
                    .await
                    .context("Failed to write export")?;
                println!("Exported to {}", path.display());
            }
            None => println!("Nothing to export."),
        }
    }

    Ok(())
}
