//! Implementation of the `vigil run` command.
//!
//! Exit status reflects orchestration only: a run full of failed
//! checks still exits zero. Failed checks are findings, not faults.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Args;
use tracing::warn;

use crate::cli::commands::App;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Environment, Suite};
use crate::services::alerts::AlertEngine;
use crate::services::orchestrator::RunRequest;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Suites to run (comma separated); all nine when omitted
    #[arg(short, long, value_delimiter = ',')]
    pub suites: Vec<String>,

    /// Target environment
    #[arg(short, long, default_value = "development")]
    pub environment: String,

    /// Dispatch suites concurrently
    #[arg(short, long)]
    pub parallel: bool,

    /// Sampling window in hours
    #[arg(long, default_value_t = 24)]
    pub window_hours: i64,

    /// Skip alert generation for this run
    #[arg(long)]
    pub no_alerts: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct RunOutput {
    pub run_id: uuid::Uuid,
    pub status: String,
    pub environment: String,
    pub suites_requested: usize,
    pub suites_completed: usize,
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub warned: usize,
    pub skipped: usize,
    pub errored: usize,
    pub success_rate: Option<f64>,
    pub duration_ms: u64,
    pub alerts_raised: usize,
    pub narrative: Option<String>,
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Run {} [{}] on {}", self.run_id, self.status, self.environment),
            format!(
                "Suites: {}/{} completed in {}ms",
                self.suites_completed, self.suites_requested, self.duration_ms
            ),
            format!(
                "Tests: {} total | {} passed, {} failed, {} warnings, {} skipped, {} errors",
                self.total_tests, self.passed, self.failed, self.warned, self.skipped, self.errored
            ),
        ];
        if let Some(rate) = self.success_rate {
            lines.push(format!("Success rate: {:.1}%", rate * 100.0));
        }
        if self.alerts_raised > 0 {
            lines.push(format!("Alerts raised: {}", self.alerts_raised));
        }
        if let Some(narrative) = &self.narrative {
            lines.push(format!("\n{narrative}"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn parse_suites(names: &[String]) -> Result<Vec<Suite>> {
    let mut suites = Vec::new();
    for name in names {
        match Suite::from_str(name) {
            Some(suite) => suites.push(suite),
            None => bail!("unknown suite '{name}'"),
        }
    }
    Ok(suites)
}

pub async fn execute(args: RunArgs, json_mode: bool) -> Result<()> {
    let suites = parse_suites(&args.suites)?;
    let environment = Environment::from_str(&args.environment)
        .with_context(|| format!("unknown environment '{}'", args.environment))?;

    let app = App::load().await?;
    let orchestrator = app.orchestrator();

    // First Ctrl-C requests a clean stop; suites already running finish
    let cancel = orchestrator.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("cancellation requested; finishing dispatched suites");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    // An omitted --suites flag means the full selection
    let request = RunRequest {
        suites: if suites.is_empty() { None } else { Some(suites) },
        environment,
        parallel: args.parallel,
        window_hours: args.window_hours,
    };
    let summary = orchestrator.run(&request, Utc::now()).await?;

    let alerts_raised = if args.no_alerts {
        0
    } else {
        let results = app.results.list_by_run(summary.run_id).await?;
        AlertEngine::new(Arc::clone(&app.alerts))
            .evaluate_run(&summary, &results)
            .await?
            .len()
    };

    let output_data = RunOutput {
        run_id: summary.run_id,
        status: summary.status.as_str().to_string(),
        environment: summary.environment.as_str().to_string(),
        suites_requested: summary.suites_requested,
        suites_completed: summary.suites_completed,
        total_tests: summary.total_tests,
        passed: summary.passed,
        failed: summary.failed,
        warned: summary.warned,
        skipped: summary.skipped,
        errored: summary.errored,
        success_rate: summary.success_rate,
        duration_ms: summary.total_duration_ms,
        alerts_raised,
        narrative: summary.narrative_summary.clone(),
    };
    output(&output_data, json_mode);
    Ok(())
}
