//! Implementation of the `vigil health` command.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::Args;

use crate::cli::commands::App;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{HealthReport, TimeWindow};
use crate::services::health::HealthEngine;

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Window length in hours, ending now
    #[arg(long, default_value_t = 24)]
    pub hours: i64,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthOutput {
    pub report: HealthReport,
}

impl CommandOutput for HealthOutput {
    fn to_human(&self) -> String {
        let r = &self.report;
        let mut lines = vec![
            format!(
                "Health [{}] over {} -> {}",
                r.grade.as_str(),
                r.window.start.format("%Y-%m-%d %H:%M"),
                r.window.end.format("%Y-%m-%d %H:%M")
            ),
            format!(
                "Tests: {} total | {} passed, {} failed, {} warnings, {} skipped, {} errors",
                r.total_tests, r.passed, r.failed, r.warned, r.skipped, r.errored
            ),
            format!("Violation rate: {:.1}%", r.violation_rate * 100.0),
        ];
        match r.success_rate {
            Some(rate) => lines.push(format!("Success rate: {:.1}%", rate * 100.0)),
            None => lines.push("Success rate: n/a (no tests in window)".to_string()),
        }
        if !r.suite_trends.is_empty() {
            lines.push("\nSuite trends:".to_string());
            for (name, trend) in &r.suite_trends {
                let prior = trend
                    .prior_avg_score
                    .map_or_else(|| "n/a".to_string(), |s| format!("{s:.3}"));
                lines.push(format!(
                    "  {:<16} {:.3} (prior {}) {}",
                    name,
                    trend.current_avg_score,
                    prior,
                    trend.direction.as_str()
                ));
            }
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.report).unwrap_or_default()
    }
}

pub async fn execute(args: HealthArgs, json_mode: bool) -> Result<()> {
    let app = App::load().await?;
    let engine = HealthEngine::new(Arc::clone(&app.results));
    let window = TimeWindow::ending_at(Utc::now(), args.hours);
    let report = engine.health_of(window).await?;
    output(&HealthOutput { report }, json_mode);
    Ok(())
}
