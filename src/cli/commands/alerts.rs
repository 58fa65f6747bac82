//! Implementation of the `vigil alerts` commands.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Subcommand;
use uuid::Uuid;

use crate::cli::commands::App;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::Alert;

#[derive(Subcommand, Debug)]
pub enum AlertCommands {
    /// List alerts, unresolved first
    List {
        /// Include resolved alerts
        #[arg(long)]
        all: bool,

        #[arg(short, long, default_value_t = 50)]
        limit: i64,
    },

    /// Acknowledge an alert
    Ack { alert_id: Uuid },

    /// Resolve an alert
    Resolve { alert_id: Uuid },
}

#[derive(Debug, serde::Serialize)]
struct AlertListOutput {
    alerts: Vec<Alert>,
}

impl CommandOutput for AlertListOutput {
    fn to_human(&self) -> String {
        if self.alerts.is_empty() {
            return "No alerts.".to_string();
        }
        let mut lines = vec![format!(
            "{:<36}  {:<11}  {:<8}  {:<5}  message",
            "id", "category", "severity", "state"
        )];
        for alert in &self.alerts {
            let state = if alert.resolved {
                "res"
            } else if alert.acknowledged {
                "ack"
            } else {
                "open"
            };
            lines.push(format!(
                "{:<36}  {:<11}  {:<8}  {:<5}  {}",
                alert.alert_id,
                alert.category.as_str(),
                alert.severity.as_str(),
                state,
                truncate(&alert.message, 70)
            ));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.alerts).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
struct AlertActionOutput {
    alert_id: Uuid,
    action: String,
}

impl CommandOutput for AlertActionOutput {
    fn to_human(&self) -> String {
        format!("Alert {} {}", self.alert_id, self.action)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(command: AlertCommands, json_mode: bool) -> Result<()> {
    let app = App::load().await?;

    match command {
        AlertCommands::List { all, limit } => {
            let alerts = app.alerts.list(!all, limit).await?;
            output(&AlertListOutput { alerts }, json_mode);
        }
        AlertCommands::Ack { alert_id } => {
            app.alerts
                .get(alert_id)
                .await?
                .with_context(|| format!("no alert {alert_id}"))?;
            app.alerts.acknowledge(alert_id).await?;
            output(
                &AlertActionOutput {
                    alert_id,
                    action: "acknowledged".to_string(),
                },
                json_mode,
            );
        }
        AlertCommands::Resolve { alert_id } => {
            app.alerts
                .get(alert_id)
                .await?
                .with_context(|| format!("no alert {alert_id}"))?;
            app.alerts.resolve(alert_id, Utc::now()).await?;
            output(
                &AlertActionOutput {
                    alert_id,
                    action: "resolved".to_string(),
                },
                json_mode,
            );
        }
    }
    Ok(())
}
