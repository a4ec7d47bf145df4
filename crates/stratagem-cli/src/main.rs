use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stratagem_infrastructure::StratagemPaths;

mod app;
mod commands;
mod logging;
mod render;

#[derive(Parser)]
#[command(name = "stratagem")]
#[command(about = "Generate strategic perspectives for a topic and browse past reports", long_about = None)]
struct Cli {
    /// Keep config, logs and data under this directory instead of the platform defaults
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate perspectives for a topic and archive them as a report
    Generate {
        /// Business topic, challenge or idea
        #[arg(required = true, num_args = 1..)]
        topic: Vec<String>,

        /// Also write the batch as a JSON export
        #[arg(long)]
        export: bool,

        /// Export directory (defaults to the data directory's exports/)
        #[arg(long, requires = "export")]
        out: Option<PathBuf>,
    },
    /// List archived reports grouped by month
    History,
    /// Print one archived report
    Show {
        /// Report id as shown by `history`
        id: i64,
    },
    /// Write an archived report as a JSON export
    Export {
        /// Report id as shown by `history`
        id: i64,

        /// Export directory (defaults to the data directory's exports/)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = StratagemPaths::new(cli.base_dir.as_deref());
    let _log_guard = logging::init(&paths, cli.verbose)?;

    run(cli.command, paths)
        .await
        .inspect_err(logging::record_failure)
}

async fn run(command: Commands, paths: StratagemPaths) -> Result<()> {
    let context = app::AppContext::bootstrap(paths)?;

    match command {
        Commands::Generate { topic, export, out } => {
            commands::generate::run(&context, &topic.join(" "), export, out).await
        }
        Commands::History => commands::history::run(&context).await,
        Commands::Show { id } => commands::show::run(&context, id).await,
        Commands::Export { id, out } => commands::export::run(&context, id, out).await,
    }
}
