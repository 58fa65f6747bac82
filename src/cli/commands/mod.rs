//! CLI command implementations.

pub mod alerts;
pub mod baseline;
pub mod health;
pub mod init;
pub mod results;
pub mod run;
pub mod schedule;
pub mod sweep;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::adapters::sqlite::{
    all_embedded_migrations, create_pool, Migrator, PoolConfig, SqliteAlertRepository,
    SqliteBaselineRepository, SqliteDataSource, SqliteJobRepository, SqliteResultRepository,
    SqliteSummaryRepository,
};
use crate::domain::models::Config;
use crate::domain::ports::{
    AlertRepository, BaselineRepository, DataSource, JobRepository, Judge, ResultRepository,
    StaticJudge, SummaryRepository,
};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::judge::HttpJudge;
use crate::services::orchestrator::Orchestrator;

/// Wired application context shared by the commands.
pub(crate) struct App {
    pub config: Config,
    pub results: Arc<dyn ResultRepository>,
    pub summaries: Arc<dyn SummaryRepository>,
    pub baselines: Arc<dyn BaselineRepository>,
    pub alerts: Arc<dyn AlertRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub data: Arc<dyn DataSource>,
    pub judge: Arc<dyn Judge>,
}

impl App {
    /// Load config, open the pool, and bring the schema current.
    pub async fn load() -> Result<Self> {
        let config = ConfigLoader::load()?;

        let database_url = format!("sqlite:{}", config.database.path);
        let pool = create_pool(
            &database_url,
            Some(PoolConfig {
                max_connections: config.database.max_connections,
                ..PoolConfig::default()
            }),
        )
        .await
        .with_context(|| format!("opening database at {}", config.database.path))?;

        Migrator::new(pool.clone())
            .run_embedded_migrations(all_embedded_migrations())
            .await
            .context("applying database migrations")?;

        let judge: Arc<dyn Judge> = if config.judge.offline {
            Arc::new(StaticJudge::default())
        } else {
            Arc::new(HttpJudge::from_config(&config.judge).context("configuring judge client")?)
        };

        Ok(Self {
            results: Arc::new(SqliteResultRepository::new(pool.clone())),
            summaries: Arc::new(SqliteSummaryRepository::new(pool.clone())),
            baselines: Arc::new(SqliteBaselineRepository::new(pool.clone())),
            alerts: Arc::new(SqliteAlertRepository::new(pool.clone())),
            jobs: Arc::new(SqliteJobRepository::new(pool.clone())),
            data: Arc::new(SqliteDataSource::new(pool)),
            judge,
            config,
        })
    }

    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(
            Arc::clone(&self.results),
            Arc::clone(&self.summaries),
            Arc::clone(&self.baselines),
            Arc::clone(&self.data),
            Arc::clone(&self.judge),
            self.config.orchestrator.clone(),
            self.config.suites.clone(),
        )
    }
}
