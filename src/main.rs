use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use serde::Serialize;
use tracing::info;

use post_scout::core::config::{load_scout_config, load_scout_config_from};
use post_scout::{search, AppState, ErrorResponse, SearchResponse};

const USAGE: &str = "Usage: post-scout <query> [min_engagement] [limit]";

/// Search posts and keep the ones whose likes + retweets + replies reach a threshold.
///
/// Prints one JSON object on stdout: `{"tweets": [...], "count": n}` on
/// success, `{"error": "..."}` (exit code 1) on failure.
#[derive(Parser, Debug)]
#[command(name = "post-scout", version)]
struct Cli {
    /// Search query or topic
    query: String,

    /// Minimum engagement a post needs to be kept (default 10000)
    min_engagement: Option<u64>,

    /// Maximum number of posts to return (default 100)
    limit: Option<usize>,

    /// Upstream to query: guest, accounts or scraper
    #[arg(short, long)]
    backend: Option<String>,

    /// Config file to use instead of the standard locations
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn emit<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{}", s),
        Err(e) => println!("{{\"error\":\"cannot encode output: {}\"}}", e),
    }
}

fn fail(message: String) -> ! {
    emit(&ErrorResponse { error: message });
    std::process::exit(1)
}

async fn run(cli: Cli) -> anyhow::Result<SearchResponse> {
    let config = match &cli.config {
        Some(path) => load_scout_config_from(path)?,
        None => load_scout_config(),
    };
    let state = AppState::from_config(config)?;

    let backend = search::resolve_backend(&state, cli.backend.as_deref())?;
    let query = search::resolve_query(&state, &cli.query, cli.min_engagement, cli.limit);

    let response = search::search_posts(&state, backend, &query).await?;
    info!("{} posts matched '{}'", response.count, query.text);
    Ok(response)
}

#[tokio::main]
async fn main() {
    // stdout carries only the JSON result
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let reason = e.to_string();
            let reason = reason.lines().next().unwrap_or_default().trim();
            fail(format!("{} ({})", USAGE, reason.trim_start_matches("error: ")))
        }
    };

    match run(cli).await {
        Ok(response) => emit(&response),
        Err(e) => fail(e.to_string()),
    }
}
