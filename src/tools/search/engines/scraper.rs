use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::core::error::SearchError;
use crate::tools::search::QueryExecutor;
use crate::types::SearchQuery;
use crate::AppState;

/// Runs an snscrape-compatible executable and reads its JSON-lines output.
///
/// The scraper is asked for twice the requested limit so the engagement
/// filter has something to choose from.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScraperExecutor;

pub fn scraper_args(query: &SearchQuery) -> Vec<String> {
    vec![
        "--jsonl".to_string(),
        "--max-results".to_string(),
        query.limit.saturating_mul(2).to_string(),
        "twitter-search".to_string(),
        query.text.clone(),
    ]
}

/// Parse JSON-lines output; lines that are not JSON are skipped.
pub fn parse_jsonl(stdout: &str) -> Vec<Value> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match serde_json::from_str::<Value>(line) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!("skipping scraper line that is not JSON: {}", e);
                None
            }
        })
        .collect()
}

pub async fn run_scraper(
    executable: &Path,
    args: &[String],
    timeout_secs: u64,
) -> Result<String, SearchError> {
    debug!("running {} {}", executable.display(), args.join(" "));

    let child = tokio::process::Command::new(executable)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            SearchError::Unavailable(format!(
                "cannot start scraper {}: {}",
                executable.display(),
                e
            ))
        })?;

    let output = match tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        child.wait_with_output(),
    )
    .await
    {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(SearchError::Unavailable(format!(
                "scraper did not complete: {}",
                e
            )))
        }
        Err(_) => {
            return Err(SearchError::Timeout {
                what: "scraper".to_string(),
                secs: timeout_secs,
            })
        }
    };

    if !output.status.success() {
        let code = output.status.code().map(i64::from).unwrap_or(-1);
        return Err(SearchError::status(
            "scraper",
            code,
            &String::from_utf8_lossy(&output.stderr),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[async_trait]
impl QueryExecutor for ScraperExecutor {
    fn name(&self) -> &'static str {
        "scraper"
    }

    async fn fetch(
        &self,
        state: &AppState,
        query: &SearchQuery,
    ) -> Result<Vec<Value>, SearchError> {
        let cfg = &state.config.scraper;
        let executable: PathBuf = cfg.resolve_executable()?;
        let stdout =
            run_scraper(&executable, &scraper_args(query), cfg.resolve_timeout_secs()).await?;
        let items = parse_jsonl(&stdout);
        info!("scraper produced {} items", items.len());
        Ok(items)
    }
}
