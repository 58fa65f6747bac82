//! Implementation of the `vigil results` command.

use anyhow::{bail, Result};
use clap::Args;
use uuid::Uuid;

use crate::cli::commands::App;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{Suite, TestResult, TestStatus};
use crate::domain::ports::ResultFilters;

#[derive(Args, Debug)]
pub struct ResultsArgs {
    /// Only results from this run
    #[arg(short, long)]
    pub run: Option<Uuid>,

    /// Only results from this suite
    #[arg(short, long)]
    pub suite: Option<String>,

    /// Only results with this status
    #[arg(long)]
    pub status: Option<String>,

    #[arg(short, long, default_value_t = 50)]
    pub limit: i64,
}

#[derive(Debug, serde::Serialize)]
struct ResultsOutput {
    results: Vec<TestResult>,
}

impl CommandOutput for ResultsOutput {
    fn to_human(&self) -> String {
        if self.results.is_empty() {
            return "No results match.".to_string();
        }
        let mut lines = vec![format!(
            "{:<16}  {:<36}  {:<8}  {:>7}  detail",
            "suite", "test", "status", "score"
        )];
        for result in &self.results {
            let score = result
                .score
                .map_or_else(|| "-".to_string(), |s| format!("{s:.3}"));
            let note = result.error_message.as_deref().unwrap_or("");
            lines.push(format!(
                "{:<16}  {:<36}  {:<8}  {:>7}  {}",
                result.suite.as_str(),
                truncate(&result.test_name, 36),
                result.status.as_str(),
                score,
                truncate(note, 50)
            ));
        }
        lines.push(format!("\n{} result(s)", self.results.len()));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.results).unwrap_or_default()
    }
}

pub async fn execute(args: ResultsArgs, json_mode: bool) -> Result<()> {
    let suite = match &args.suite {
        Some(name) => match Suite::from_str(name) {
            Some(suite) => Some(suite),
            None => bail!("unknown suite '{name}'"),
        },
        None => None,
    };
    let status = match &args.status {
        Some(name) => match TestStatus::from_str(name) {
            Some(status) => Some(status),
            None => bail!("unknown status '{name}'"),
        },
        None => None,
    };

    let app = App::load().await?;
    let results = app
        .results
        .list(ResultFilters {
            run_id: args.run,
            suite,
            status,
            limit: Some(args.limit),
        })
        .await?;

    output(&ResultsOutput { results }, json_mode);
    Ok(())
}
