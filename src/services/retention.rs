//! Retention sweep.
//!
//! Results age out wholesale after their window; alerts age out only
//! once resolved. Unresolved alerts are never purged regardless of age.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::domain::models::RetentionConfig;
use crate::domain::ports::{AlertRepository, ResultRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    pub results_purged: u64,
    pub alerts_purged: u64,
}

pub struct RetentionSweeper {
    results: Arc<dyn ResultRepository>,
    alerts: Arc<dyn AlertRepository>,
    config: RetentionConfig,
}

impl RetentionSweeper {
    pub fn new(
        results: Arc<dyn ResultRepository>,
        alerts: Arc<dyn AlertRepository>,
        config: RetentionConfig,
    ) -> Self {
        Self {
            results,
            alerts,
            config,
        }
    }

    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<SweepOutcome> {
        let result_cutoff = now - Duration::days(self.config.test_results_days);
        let alert_cutoff = now - Duration::days(self.config.resolved_alerts_days);

        let results_purged = self
            .results
            .purge_before(result_cutoff)
            .await
            .context("purging aged results")?;
        let alerts_purged = self
            .alerts
            .purge_resolved_before(alert_cutoff)
            .await
            .context("purging resolved alerts")?;

        info!(results_purged, alerts_purged, "retention sweep finished");
        Ok(SweepOutcome {
            results_purged,
            alerts_purged,
        })
    }
}
