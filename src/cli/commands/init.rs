//! Implementation of the `vigil init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::fs;

use crate::adapters::sqlite::{
    all_embedded_migrations, create_pool, Migrator, SqliteBaselineRepository,
};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{BaselineEntry, Config, MetricDirection};
use crate::domain::ports::BaselineRepository;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force reinitialization even if already initialized
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub config_written: bool,
    pub migrations_applied: usize,
    pub baselines_seeded: usize,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push("Wrote .vigil/config.yaml".to_string());
        }
        if self.migrations_applied > 0 {
            lines.push(format!(
                "Database initialized ({} migration(s) applied)",
                self.migrations_applied
            ));
        }
        if self.baselines_seeded > 0 {
            lines.push(format!(
                "Seeded {} default performance baseline(s)",
                self.baselines_seeded
            ));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let vigil_dir = target_path.join(".vigil");

    if vigil_dir.exists() && !args.force {
        let output_data = InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            initialized_path: target_path,
            config_written: false,
            migrations_applied: 0,
            baselines_seeded: 0,
        };
        output(&output_data, json_mode);
        return Ok(());
    }

    if args.force && vigil_dir.exists() {
        fs::remove_dir_all(&vigil_dir)
            .await
            .context("Failed to remove existing .vigil directory")?;
    }

    fs::create_dir_all(&vigil_dir)
        .await
        .context("Failed to create .vigil directory")?;

    let config = Config::default();
    let config_yaml =
        serde_yaml::to_string(&config).context("Failed to serialize default configuration")?;
    fs::write(vigil_dir.join("config.yaml"), config_yaml)
        .await
        .context("Failed to write config.yaml")?;

    let database_url = format!("sqlite:{}", vigil_dir.join("vigil.db").display());
    let pool = create_pool(&database_url, None)
        .await
        .context("Failed to create database")?;
    let migrations_applied = Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .context("Failed to apply migrations")?;

    let baselines = SqliteBaselineRepository::new(pool);
    let seeds = default_baselines();
    for entry in &seeds {
        baselines
            .upsert(entry)
            .await
            .with_context(|| format!("Failed to seed baseline {}", entry.metric_name))?;
    }

    let output_data = InitOutput {
        success: true,
        message: format!("Initialized vigil in {}", target_path.display()),
        initialized_path: target_path,
        config_written: true,
        migrations_applied,
        baselines_seeded: seeds.len(),
    };
    output(&output_data, json_mode);
    Ok(())
}

/// Starting points for the performance suite's regression checks.
/// Operators replace these with `vigil baseline set` once real traffic
/// numbers are known.
fn default_baselines() -> Vec<BaselineEntry> {
    vec![
        BaselineEntry::new(
            "performance",
            "avg_response_time_ms",
            500.0,
            0.2,
            MetricDirection::LowerIsBetter,
        ),
        BaselineEntry::new(
            "performance",
            "p95_response_time_ms",
            2000.0,
            0.2,
            MetricDirection::LowerIsBetter,
        ),
        BaselineEntry::new(
            "performance",
            "positive_outcome_rate",
            0.7,
            0.1,
            MetricDirection::HigherIsBetter,
        ),
    ]
}
