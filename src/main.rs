//! Vigil CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vigil::cli::{Cli, Commands};
use vigil::domain::models::Config;
use vigil::infrastructure::config::ConfigLoader;

#[tokio::main]
async fn main() {
    // Logging honors the configured level and format; a broken config
    // file falls back to defaults and surfaces through the command
    let config = ConfigLoader::load().unwrap_or_else(|_| Config::default());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.is_json() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => vigil::cli::commands::init::execute(args, cli.json).await,
        Commands::Run(args) => vigil::cli::commands::run::execute(args, cli.json).await,
        Commands::Health(args) => vigil::cli::commands::health::execute(args, cli.json).await,
        Commands::Alerts(command) => vigil::cli::commands::alerts::execute(command, cli.json).await,
        Commands::Baseline(command) => {
            vigil::cli::commands::baseline::execute(command, cli.json).await
        }
        Commands::Schedule(command) => {
            vigil::cli::commands::schedule::execute(command, cli.json).await
        }
        Commands::Results(args) => vigil::cli::commands::results::execute(args, cli.json).await,
        Commands::Sweep(args) => vigil::cli::commands::sweep::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        vigil::cli::handle_error(err, cli.json);
    }
}
