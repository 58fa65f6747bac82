//! Implementation of the `vigil schedule` commands.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{NaiveTime, Utc};
use clap::Subcommand;
use uuid::Uuid;

use crate::cli::commands::App;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{
    Environment, JobFrequency, JobParameters, JobStatus, ScheduledJob, Suite,
};
use crate::services::scheduler::Scheduler;

#[derive(Subcommand, Debug)]
pub enum ScheduleCommands {
    /// Create a recurring test run
    Add {
        name: String,

        /// hourly, daily or weekly
        #[arg(short, long, default_value = "daily")]
        frequency: String,

        /// Anchor time of day (UTC, HH:MM) for daily/weekly jobs
        #[arg(long)]
        at: Option<String>,

        /// Suites to run (comma separated); all nine when omitted
        #[arg(short, long, value_delimiter = ',')]
        suites: Vec<String>,

        #[arg(short, long, default_value = "development")]
        environment: String,

        #[arg(short, long)]
        parallel: bool,

        #[arg(long, default_value_t = 24)]
        window_hours: i64,
    },

    /// List scheduled jobs
    List,

    /// Pause a job
    Pause { name: String },

    /// Resume a paused job
    Resume { name: String },

    /// Delete a job
    Remove { name: String },

    /// Trigger every due job once (the driver loop calls this)
    Tick,
}

#[derive(Debug, serde::Serialize)]
struct JobOutput {
    job: ScheduledJob,
    message: String,
}

impl CommandOutput for JobOutput {
    fn to_human(&self) -> String {
        format!(
            "{}\n  next run at {}",
            self.message,
            self.job.next_run_at.format("%Y-%m-%d %H:%M UTC")
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.job).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
struct JobListOutput {
    jobs: Vec<ScheduledJob>,
}

impl CommandOutput for JobListOutput {
    fn to_human(&self) -> String {
        if self.jobs.is_empty() {
            return "No scheduled jobs.".to_string();
        }
        let mut lines = vec![format!(
            "{:<20}  {:<8}  {:<8}  {:<17}  runs  failures",
            "name", "freq", "status", "next run"
        )];
        for job in &self.jobs {
            lines.push(format!(
                "{:<20}  {:<8}  {:<8}  {:<17}  {:>4}  {:>8}",
                job.name,
                job.frequency.as_str(),
                job.status.as_str(),
                job.next_run_at.format("%Y-%m-%d %H:%M"),
                job.run_count,
                job.failure_count
            ));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.jobs).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
struct TickOutput {
    runs_started: Vec<Uuid>,
}

impl CommandOutput for TickOutput {
    fn to_human(&self) -> String {
        if self.runs_started.is_empty() {
            "No jobs due.".to_string()
        } else {
            let ids: Vec<String> = self.runs_started.iter().map(Uuid::to_string).collect();
            format!("Started {} run(s): {}", ids.len(), ids.join(", "))
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.runs_started).unwrap_or_default()
    }
}

async fn job_by_name(app: &App, name: &str) -> Result<ScheduledJob> {
    app.jobs
        .get_by_name(name)
        .await?
        .with_context(|| format!("no scheduled job named '{name}'"))
}

pub async fn execute(command: ScheduleCommands, json_mode: bool) -> Result<()> {
    let app = App::load().await?;

    match command {
        ScheduleCommands::Add {
            name,
            frequency,
            at,
            suites,
            environment,
            parallel,
            window_hours,
        } => {
            let Some(frequency) = JobFrequency::from_str(&frequency) else {
                bail!("frequency must be hourly, daily or weekly, got '{frequency}'");
            };
            let anchor_time = at
                .map(|s| NaiveTime::parse_from_str(&s, "%H:%M"))
                .transpose()
                .context("anchor time must be HH:MM")?;
            let mut selection = Vec::new();
            for suite_name in &suites {
                match Suite::from_str(suite_name) {
                    Some(suite) => selection.push(suite),
                    None => bail!("unknown suite '{suite_name}'"),
                }
            }
            let environment = Environment::from_str(&environment)
                .with_context(|| format!("unknown environment '{environment}'"))?;

            if app.jobs.get_by_name(&name).await?.is_some() {
                bail!("a job named '{name}' already exists");
            }

            let job = ScheduledJob::new(
                name,
                frequency,
                anchor_time,
                JobParameters {
                    suites: selection,
                    environment,
                    parallel,
                    window_hours,
                },
                Utc::now(),
            );
            app.jobs.insert(&job).await?;
            let message = format!("Scheduled job '{}'", job.name);
            output(&JobOutput { job, message }, json_mode);
        }
        ScheduleCommands::List => {
            let jobs = app.jobs.list().await?;
            output(&JobListOutput { jobs }, json_mode);
        }
        ScheduleCommands::Pause { name } => {
            let job = job_by_name(&app, &name).await?;
            app.jobs.set_status(job.job_id, JobStatus::Paused).await?;
            let message = format!("Paused job '{name}'");
            output(&JobOutput { job, message }, json_mode);
        }
        ScheduleCommands::Resume { name } => {
            let job = job_by_name(&app, &name).await?;
            app.jobs.set_status(job.job_id, JobStatus::Active).await?;
            let message = format!("Resumed job '{name}'");
            output(&JobOutput { job, message }, json_mode);
        }
        ScheduleCommands::Remove { name } => {
            let job = job_by_name(&app, &name).await?;
            app.jobs.delete(job.job_id).await?;
            let message = format!("Removed job '{name}'");
            output(&JobOutput { job, message }, json_mode);
        }
        ScheduleCommands::Tick => {
            let holder = format!(
                "{}-{}",
                std::env::var("HOSTNAME").unwrap_or_else(|_| "vigil".to_string()),
                std::process::id()
            );
            let scheduler = Scheduler::new(
                Arc::clone(&app.jobs),
                Arc::clone(&app.alerts),
                Arc::new(app.orchestrator()),
                holder,
            );
            let runs_started = scheduler.tick(Utc::now()).await?;
            output(&TickOutput { runs_started }, json_mode);
        }
    }
    Ok(())
}
