//! Scheduled job domain model.
//!
//! A job is a recurring orchestration trigger. `next_run_at` is
//! recomputed only after a run completes, from `last_run_at` plus the
//! schedule period, so late ticks never drift the schedule forward.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::suite::{Environment, Suite};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Active,
    Paused,
    Disabled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Disabled => "disabled",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "disabled" => Some(Self::Disabled),
            _ => None,
        }
    }
}

/// Recurrence frequency with an optional anchor time-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobFrequency {
    Hourly,
    Daily,
    Weekly,
}

impl JobFrequency {
    pub fn period(&self) -> Duration {
        match self {
            Self::Hourly => Duration::hours(1),
            Self::Daily => Duration::days(1),
            Self::Weekly => Duration::weeks(1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            _ => None,
        }
    }
}

/// Suite selection and environment a job passes to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobParameters {
    /// Empty selection means all suites
    #[serde(default)]
    pub suites: Vec<Suite>,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub parallel: bool,
    /// Sampling window length handed to the adapters
    #[serde(default = "default_window_hours")]
    pub window_hours: i64,
}

fn default_window_hours() -> i64 {
    24
}

impl Default for JobParameters {
    fn default() -> Self {
        Self {
            suites: Vec::new(),
            environment: Environment::Development,
            parallel: false,
            window_hours: default_window_hours(),
        }
    }
}

/// Recurring orchestration trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledJob {
    pub job_id: Uuid,
    pub name: String,
    pub job_type: String,
    pub frequency: JobFrequency,
    /// Anchor time-of-day (UTC) for daily/weekly jobs
    pub anchor_time: Option<NaiveTime>,
    pub parameters: JobParameters,
    pub status: JobStatus,
    pub next_run_at: DateTime<Utc>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub run_count: u64,
    pub failure_count: u64,
    /// Failures since the last success; three in a row pauses the job
    pub consecutive_failures: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduledJob {
    pub fn new(
        name: impl Into<String>,
        frequency: JobFrequency,
        anchor_time: Option<NaiveTime>,
        parameters: JobParameters,
        now: DateTime<Utc>,
    ) -> Self {
        let next_run_at = first_run_at(now, frequency, anchor_time);
        Self {
            job_id: Uuid::new_v4(),
            name: name.into(),
            job_type: "test_run".to_string(),
            frequency,
            anchor_time,
            parameters,
            status: JobStatus::Active,
            next_run_at,
            last_run_at: None,
            run_count: 0,
            failure_count: 0,
            consecutive_failures: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Advance `next_run_at` after a completed run.
    ///
    /// Anchored to `last_run_at + period`, stepped by whole periods
    /// until in the future of `now` (single-step catch-up: a long
    /// outage does not replay every missed tick).
    pub fn advance_after_run(&mut self, now: DateTime<Utc>, run_failed: bool) {
        self.last_run_at = Some(now);
        self.run_count += 1;
        if run_failed {
            self.failure_count += 1;
            self.consecutive_failures += 1;
        } else {
            self.consecutive_failures = 0;
        }

        let period = self.frequency.period();
        let mut next = self.next_run_at + period;
        while next <= now {
            next = next + period;
        }
        self.next_run_at = next;
        self.updated_at = now;
    }

    /// Jobs failing three consecutive runs transition toward paused
    /// rather than retrying indefinitely.
    pub fn should_pause(&self) -> bool {
        self.consecutive_failures >= 3
    }
}

/// First firing time for a new job: the next occurrence of the anchor
/// time, or one period from now when unanchored.
fn first_run_at(
    now: DateTime<Utc>,
    frequency: JobFrequency,
    anchor_time: Option<NaiveTime>,
) -> DateTime<Utc> {
    match anchor_time {
        Some(anchor) => {
            let today = now.date_naive().and_time(anchor).and_utc();
            if today > now {
                today
            } else {
                today + frequency.period()
            }
        }
        None => now + frequency.period(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_run_anchors_to_schedule_not_tick_time() {
        let t0 = Utc::now();
        let mut job = ScheduledJob::new("daily", JobFrequency::Daily, None, JobParameters::default(), t0);
        let scheduled = job.next_run_at;

        // Tick arrives 37 minutes late
        let late_tick = scheduled + Duration::minutes(37);
        job.advance_after_run(late_tick, false);

        // Exactly one period past the scheduled time, not past the tick
        assert_eq!(job.next_run_at, scheduled + Duration::days(1));
    }

    #[test]
    fn long_outage_steps_whole_periods() {
        let t0 = Utc::now();
        let mut job = ScheduledJob::new("hourly", JobFrequency::Hourly, None, JobParameters::default(), t0);
        let scheduled = job.next_run_at;

        // Driver was down for five hours
        let tick = scheduled + Duration::hours(5);
        job.advance_after_run(tick, false);

        assert!(job.next_run_at > tick);
        assert_eq!(
            (job.next_run_at - scheduled).num_minutes() % 60,
            0,
            "next_run_at stays on the original hourly grid"
        );
    }

    #[test]
    fn three_consecutive_failures_trigger_pause() {
        let t0 = Utc::now();
        let mut job = ScheduledJob::new("h", JobFrequency::Hourly, None, JobParameters::default(), t0);
        for i in 0..3 {
            assert!(!job.should_pause());
            job.advance_after_run(t0 + Duration::hours(i64::from(i) + 1), true);
        }
        assert!(job.should_pause());

        // A success resets the streak
        job.consecutive_failures = 2;
        job.advance_after_run(job.next_run_at, false);
        assert_eq!(job.consecutive_failures, 0);
    }
}
