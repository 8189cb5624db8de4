//! contentgate CLI - quality gate for generated content batches.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use contentgate_core::{Batch, KeywordStrategy, PlatformProfile, QaReport};
use contentgate_quality::{
    render_markdown, summary_line, BasicQualityEngine, QaConfig, QualityEngine,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "contentgate")]
#[command(about = "Quality gate for generated content batches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the quality gate over a batch
    Check {
        /// Batch file (JSON array of items)
        batch: PathBuf,
        /// Keyword strategy file
        #[arg(long)]
        keywords: Option<PathBuf>,
        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
        /// Debug logging
        #[arg(long)]
        verbose: bool,
    },
    /// Print the platform profile table
    Profiles,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
    Summary,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Check { verbose: true, .. });
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the gate passed.
fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Check {
            batch,
            keywords,
            config,
            format,
            ..
        } => {
            let config = match config {
                Some(path) => QaConfig::from_json_file(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => QaConfig::default(),
            };
            let strategy = keywords.as_deref().map(load_keywords).transpose()?;
            let batch = load_batch(&batch)?;

            let engine = BasicQualityEngine::new(config)?;
            let report = engine
                .run(&batch, strategy.as_ref())
                .context("Quality gate could not run")?;

            info!("{}", summary_line(&report));
            println!("{}", render(&report, format)?);
            Ok(report.overall_pass)
        }
        Commands::Profiles => {
            let table = PlatformProfile::table();
            println!("{}", serde_json::to_string_pretty(&table)?);
            Ok(true)
        }
    }
}

fn load_batch(path: &Path) -> Result<Batch> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch {}", path.display()))?;
    Batch::from_json_str(&content)
        .with_context(|| format!("Invalid batch {}", path.display()))
}

fn load_keywords(path: &Path) -> Result<KeywordStrategy> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read keywords {}", path.display()))?;
    KeywordStrategy::from_json_str(&content)
        .with_context(|| format!("Invalid keyword strategy {}", path.display()))
}

fn render(report: &QaReport, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Markdown => render_markdown(report),
        OutputFormat::Summary => summary_line(report),
    })
}
