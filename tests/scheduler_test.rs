//! Scheduler driver tests: leases, due selection, schedule advancement.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};

use common::{migrated_pool, CannedDataSource};
use vigil::adapters::sqlite::{
    SqliteAlertRepository, SqliteBaselineRepository, SqliteJobRepository, SqliteResultRepository,
    SqliteSummaryRepository,
};
use vigil::domain::models::{
    JobFrequency, JobParameters, JobStatus, OrchestratorConfig, ScheduledJob, Suite, SuitePolicies,
};
use vigil::domain::ports::{JobRepository, StaticJudge, SummaryRepository};
use vigil::services::orchestrator::Orchestrator;
use vigil::services::scheduler::Scheduler;

struct Harness {
    jobs: Arc<SqliteJobRepository>,
    summaries: Arc<SqliteSummaryRepository>,
    scheduler: Scheduler,
}

async fn harness() -> Harness {
    let pool = migrated_pool().await;
    let jobs = Arc::new(SqliteJobRepository::new(pool.clone()));
    let summaries = Arc::new(SqliteSummaryRepository::new(pool.clone()));
    let orchestrator = Orchestrator::new(
        Arc::new(SqliteResultRepository::new(pool.clone())),
        summaries.clone(),
        Arc::new(SqliteBaselineRepository::new(pool.clone())),
        Arc::new(CannedDataSource::default()),
        Arc::new(StaticJudge::default()),
        OrchestratorConfig::default(),
        SuitePolicies::default(),
    );
    let scheduler = Scheduler::new(
        jobs.clone(),
        Arc::new(SqliteAlertRepository::new(pool)),
        Arc::new(orchestrator),
        "test-driver",
    );
    Harness {
        jobs,
        summaries,
        scheduler,
    }
}

fn due_job(name: &str) -> ScheduledJob {
    let mut job = ScheduledJob::new(
        name,
        JobFrequency::Hourly,
        None,
        JobParameters {
            suites: vec![Suite::Integration],
            ..JobParameters::default()
        },
        Utc::now() - Duration::hours(2),
    );
    job.next_run_at = Utc::now() - Duration::minutes(5);
    job
}

#[tokio::test]
async fn tick_runs_due_jobs_and_advances_the_schedule() {
    let h = harness().await;
    let job = due_job("hourly-sweep");
    h.jobs.insert(&job).await.unwrap();

    let now = Utc::now();
    let started = h.scheduler.tick(now).await.unwrap();
    assert_eq!(started.len(), 1);

    // The run was recorded
    let summary = h.summaries.get(started[0]).await.unwrap().unwrap();
    assert!(summary.counts_consistent());

    // next_run_at moved onto the future grid; counters updated
    let after = h.jobs.get(job.job_id).await.unwrap().unwrap();
    assert!(after.next_run_at > now);
    assert_eq!(after.run_count, 1);
    assert_eq!(after.consecutive_failures, 0);
    assert!(after.last_run_at.is_some());
}

#[tokio::test]
async fn tick_skips_jobs_that_are_not_due() {
    let h = harness().await;
    let mut job = due_job("future-job");
    job.next_run_at = Utc::now() + Duration::hours(1);
    h.jobs.insert(&job).await.unwrap();

    let started = h.scheduler.tick(Utc::now()).await.unwrap();
    assert!(started.is_empty());
}

#[tokio::test]
async fn paused_jobs_are_never_due() {
    let h = harness().await;
    let mut job = due_job("paused-job");
    job.status = JobStatus::Paused;
    h.jobs.insert(&job).await.unwrap();

    let started = h.scheduler.tick(Utc::now()).await.unwrap();
    assert!(started.is_empty());
}

#[tokio::test]
async fn lease_is_exclusive_until_released() {
    let h = harness().await;
    let job = due_job("contested");
    h.jobs.insert(&job).await.unwrap();

    let now = Utc::now();
    let ttl = Duration::minutes(30);
    assert!(h
        .jobs
        .try_acquire_lease(job.job_id, "driver-a", now, ttl)
        .await
        .unwrap());
    assert!(!h
        .jobs
        .try_acquire_lease(job.job_id, "driver-b", now, ttl)
        .await
        .unwrap());

    // The same holder may re-enter its own lease
    assert!(h
        .jobs
        .try_acquire_lease(job.job_id, "driver-a", now, ttl)
        .await
        .unwrap());

    h.jobs.release_lease(job.job_id, "driver-a").await.unwrap();
    assert!(h
        .jobs
        .try_acquire_lease(job.job_id, "driver-b", now, ttl)
        .await
        .unwrap());
}

#[tokio::test]
async fn expired_lease_can_be_taken_over() {
    let h = harness().await;
    let job = due_job("stale-lease");
    h.jobs.insert(&job).await.unwrap();

    let t0 = Utc::now();
    let ttl = Duration::minutes(30);
    assert!(h
        .jobs
        .try_acquire_lease(job.job_id, "driver-a", t0, ttl)
        .await
        .unwrap());

    // Before expiry the lease holds; after expiry it is free
    assert!(!h
        .jobs
        .try_acquire_lease(job.job_id, "driver-b", t0 + Duration::minutes(10), ttl)
        .await
        .unwrap());
    assert!(h
        .jobs
        .try_acquire_lease(job.job_id, "driver-b", t0 + Duration::minutes(31), ttl)
        .await
        .unwrap());
}
