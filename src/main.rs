//! Competitor monitor CLI
//!
//! Thin wrapper over the `competitor_monitor` library: parses arguments,
//! installs logging, prints results as JSON and hands them to the history
//! directory.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use competitor_monitor::{
    AnalysisClient, CompetitorRef, HistoryKind, MonitorConfig, Orchestrator, fetch_one,
    save_history_entry, save_report, to_normalized_text,
};

#[derive(Parser)]
#[command(
    name = "competitor-monitor",
    version,
    about = "Competitor site extraction and analysis (JSON output)"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch and text-analyze every competitor in a JSON file of `{name?, url}`
    Batch(BatchArgs),
    /// Fetch one site with a screenshot and analyze it
    Single(SingleArgs),
    /// Fetch one site and print the extraction without analysis
    Fetch(FetchArgs),
    /// Analyze text from a file
    Text(TextArgs),
    /// Analyze a screenshot
    Image(ImageArgs),
}

#[derive(Args)]
struct BatchArgs {
    competitors: PathBuf,
}

#[derive(Args)]
struct SingleArgs {
    url: String,
    #[arg(long)]
    name: Option<String>,
    /// Analyze extracted text only
    #[arg(long = "no-screenshot")]
    no_screenshot: bool,
}

#[derive(Args)]
struct FetchArgs {
    url: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    screenshot: bool,
    /// Print the normalized text instead of JSON
    #[arg(long)]
    text: bool,
}

#[derive(Args)]
struct TextArgs {
    file: PathBuf,
    #[arg(long)]
    name: String,
}

#[derive(Args)]
struct ImageArgs {
    path: PathBuf,
    #[arg(long)]
    name: String,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("competitor_monitor=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load `.env` from the working directory, else from next to the executable
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        let env_path = exe_dir.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let cli = Cli::parse();
    init_logging();

    let config = MonitorConfig::from_env().context("Failed to load configuration")?;
    config.ensure_dirs().await?;

    match cli.cmd {
        Command::Batch(args) => {
            let raw = tokio::fs::read_to_string(&args.competitors)
                .await
                .with_context(|| format!("Failed to read {}", args.competitors.display()))?;
            let competitors: Vec<CompetitorRef> = serde_json::from_str(&raw)
                .context("Competitor file must be a JSON array of {name?, url}")?;

            let report = Orchestrator::from_config(&config)?
                .run_batch(&competitors, false)
                .await;
            save_report(&report, &config.reports_dir).await?;
            print_json(&report)?;
        }
        Command::Single(args) => {
            let competitor = CompetitorRef::new(args.url, args.name);
            let item = Orchestrator::from_config(&config)?
                .run_single(&competitor, !args.no_screenshot)
                .await;
            let history_dir = &config.history_dir;
            save_history_entry(HistoryKind::Single, competitor.name(), &item, history_dir).await?;
            print_json(&item)?;
        }
        Command::Fetch(args) => {
            let outcome = fetch_one(&config, &args.url, args.name, args.screenshot).await;
            if args.text {
                print!("{}", to_normalized_text(&outcome));
            } else {
                print_json(&outcome)?;
            }
        }
        Command::Text(args) => {
            let text = tokio::fs::read_to_string(&args.file)
                .await
                .with_context(|| format!("Failed to read {}", args.file.display()))?;
            let record = AnalysisClient::new(config.analysis.clone())?
                .analyze_text(&text, &args.name)
                .await?;
            save_history_entry(HistoryKind::Text, &args.name, &record, &config.history_dir).await?;
            print_json(&record)?;
        }
        Command::Image(args) => {
            let record = AnalysisClient::new(config.analysis.clone())?
                .analyze_image(&args.path, &args.name)
                .await?;
            save_history_entry(HistoryKind::Image, &args.name, &record, &config.history_dir).await?;
            print_json(&record)?;
        }
    }

    Ok(())
}
