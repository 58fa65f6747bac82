//! Implementation of the `vigil baseline` commands.
//!
//! Baseline changes are deliberate administrative actions; there is no
//! auto-update path from run results.

use anyhow::{bail, Result};
use clap::Subcommand;

use crate::cli::commands::App;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{BaselineEntry, MetricDirection};

#[derive(Subcommand, Debug)]
pub enum BaselineCommands {
    /// Register or replace a baseline for a (test, metric) pair
    Set {
        test_name: String,
        metric_name: String,
        value: f64,

        /// Symmetric tolerance band as a fraction
        #[arg(long, default_value_t = 0.2)]
        tolerance: f64,

        /// Which movement counts as degradation: higher or lower
        #[arg(long)]
        direction: String,
    },

    /// List registered baselines
    List,
}

#[derive(Debug, serde::Serialize)]
struct BaselineSetOutput {
    entry: BaselineEntry,
}

impl CommandOutput for BaselineSetOutput {
    fn to_human(&self) -> String {
        format!(
            "Baseline {}/{} = {} (+/-{:.0}%, {})",
            self.entry.test_name,
            self.entry.metric_name,
            self.entry.baseline_value,
            self.entry.tolerance_pct * 100.0,
            self.entry.direction.as_str()
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.entry).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
struct BaselineListOutput {
    entries: Vec<BaselineEntry>,
}

impl CommandOutput for BaselineListOutput {
    fn to_human(&self) -> String {
        if self.entries.is_empty() {
            return "No baselines registered.".to_string();
        }
        let mut lines = vec![format!(
            "{:<20}  {:<26}  {:>12}  {:>9}  direction",
            "test", "metric", "value", "tolerance"
        )];
        for entry in &self.entries {
            lines.push(format!(
                "{:<20}  {:<26}  {:>12.3}  {:>8.0}%  {}",
                entry.test_name,
                entry.metric_name,
                entry.baseline_value,
                entry.tolerance_pct * 100.0,
                entry.direction.as_str()
            ));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.entries).unwrap_or_default()
    }
}

pub async fn execute(command: BaselineCommands, json_mode: bool) -> Result<()> {
    let app = App::load().await?;

    match command {
        BaselineCommands::Set {
            test_name,
            metric_name,
            value,
            tolerance,
            direction,
        } => {
            let Some(direction) = MetricDirection::from_str(&direction) else {
                bail!("direction must be 'higher' or 'lower', got '{direction}'");
            };
            if !(0.0..=1.0).contains(&tolerance) {
                bail!("tolerance must be a fraction in 0..=1, got {tolerance}");
            }
            let entry = BaselineEntry::new(test_name, metric_name, value, tolerance, direction);
            app.baselines.upsert(&entry).await?;
            output(&BaselineSetOutput { entry }, json_mode);
        }
        BaselineCommands::List => {
            let entries = app.baselines.list().await?;
            output(&BaselineListOutput { entries }, json_mode);
        }
    }
    Ok(())
}
