//! Implementation of the `vigil sweep` command.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::Args;

use crate::cli::commands::App;
use crate::cli::output::{output, CommandOutput};
use crate::services::retention::RetentionSweeper;

#[derive(Args, Debug)]
pub struct SweepArgs {}

#[derive(Debug, serde::Serialize)]
struct SweepOutput {
    results_purged: u64,
    alerts_purged: u64,
}

impl CommandOutput for SweepOutput {
    fn to_human(&self) -> String {
        format!(
            "Purged {} aged result(s) and {} resolved alert(s)",
            self.results_purged, self.alerts_purged
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(_args: SweepArgs, json_mode: bool) -> Result<()> {
    let app = App::load().await?;
    let sweeper = RetentionSweeper::new(
        Arc::clone(&app.results),
        Arc::clone(&app.alerts),
        app.config.retention.clone(),
    );
    let outcome = sweeper.sweep(Utc::now()).await?;
    output(
        &SweepOutput {
            results_purged: outcome.results_purged,
            alerts_purged: outcome.alerts_purged,
        },
        json_mode,
    );
    Ok(())
}
