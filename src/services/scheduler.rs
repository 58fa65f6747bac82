//! Schedule driver.
//!
//! `tick` is safe to call from multiple driver processes: each due job
//! is claimed through a per-job lease before it is triggered, so one
//! tick from two drivers still runs the job once. Schedule advancement
//! lives on the job model; the driver only persists it.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::models::{Alert, AlertCategory, AlertSeverity, JobStatus, ScheduledJob};
use crate::domain::ports::{AlertRepository, JobRepository};
use crate::services::orchestrator::{Orchestrator, RunRequest};

pub struct Scheduler {
    jobs: Arc<dyn JobRepository>,
    alerts: Arc<dyn AlertRepository>,
    orchestrator: Arc<Orchestrator>,
    /// Identifies this driver in lease rows (hostname + pid)
    holder: String,
    lease_ttl: Duration,
}

impl Scheduler {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        alerts: Arc<dyn AlertRepository>,
        orchestrator: Arc<Orchestrator>,
        holder: impl Into<String>,
    ) -> Self {
        Self {
            jobs,
            alerts,
            orchestrator,
            holder: holder.into(),
            lease_ttl: Duration::minutes(30),
        }
    }

    /// Trigger every due job this driver can claim. Returns the run ids
    /// started by this tick.
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>> {
        let due = self.jobs.list_due(now).await.context("listing due jobs")?;
        let mut started = Vec::new();

        for mut job in due {
            let claimed = self
                .jobs
                .try_acquire_lease(job.job_id, &self.holder, now, self.lease_ttl)
                .await
                .with_context(|| format!("acquiring lease for job {}", job.name))?;
            if !claimed {
                continue;
            }

            if let Some(run_id) = self.execute(&mut job, now).await {
                started.push(run_id);
            }

            self.jobs
                .update_after_run(&job)
                .await
                .with_context(|| format!("persisting job {} after run", job.name))?;
            self.jobs
                .release_lease(job.job_id, &self.holder)
                .await
                .with_context(|| format!("releasing lease for job {}", job.name))?;
        }

        Ok(started)
    }

    /// Run one claimed job and advance its schedule. Orchestration
    /// failure is recorded on the job, never propagated out of the tick.
    async fn execute(&self, job: &mut ScheduledJob, now: DateTime<Utc>) -> Option<Uuid> {
        info!(job = %job.name, "triggering scheduled run");
        let request = RunRequest {
            suites: if job.parameters.suites.is_empty() {
                None
            } else {
                Some(job.parameters.suites.clone())
            },
            environment: job.parameters.environment,
            parallel: job.parameters.parallel,
            window_hours: job.parameters.window_hours,
        };

        let outcome = self.orchestrator.run(&request, now).await;
        let (run_id, run_failed) = match &outcome {
            Ok(summary) => (Some(summary.run_id), false),
            Err(err) => {
                error!(job = %job.name, "scheduled run failed: {err:#}");
                (None, true)
            }
        };

        job.advance_after_run(now, run_failed);

        if job.should_pause() && job.status == JobStatus::Active {
            job.status = JobStatus::Paused;
            warn!(job = %job.name, "pausing job after repeated failures");
            if let Err(err) = self.raise_pause_alert(job, now).await {
                error!(job = %job.name, "could not record pause alert: {err:#}");
            }
        }

        run_id
    }

    async fn raise_pause_alert(&self, job: &ScheduledJob, now: DateTime<Utc>) -> Result<()> {
        let alert = Alert::new(
            format!("job/{}/paused/{}", job.job_id, job.failure_count),
            None,
            AlertCategory::Health,
            AlertSeverity::High,
            format!(
                "scheduled job '{}' paused after {} consecutive failures",
                job.name, job.consecutive_failures
            ),
            json!({
                "job_id": job.job_id,
                "consecutive_failures": job.consecutive_failures,
                "failure_count": job.failure_count,
            }),
            now,
        );
        self.alerts.insert_if_absent(&alert).await?;
        Ok(())
    }
}
