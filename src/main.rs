//! dirk - prefix-command bot with custom commands.
//!
//! Runs the dispatcher against the console gateway.

use dirk::commands::builtin_commands;
use dirk::config::{Config, LoggingConfig, validation};
use dirk::db::Database;
use dirk::dispatch::{CommandScope, CustomCommandStore, Dispatcher, Registry};
use dirk::gateway::ConsoleGateway;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = match Config::load(&config_path) {
        Ok(config) => {
            init_tracing(&config.logging);
            config
        }
        Err(e) => {
            init_tracing(&LoggingConfig::default());
            error!(path = %config_path, error = %e, "Failed to load config");
            return Err(e.into());
        }
    };

    if let Err(errors) = validation::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "Refusing to start with {} configuration error(s). See error messages above.",
            errors.len()
        ));
    }

    info!(
        name = %config.bot.name,
        prefix = %config.bot.prefix,
        "Starting dirk"
    );

    // Initialize database
    let db = Database::new(&config.database.path).await?;

    // Log the custom command inventory
    match db.list_all().await {
        Ok(records) => {
            for record in &records {
                match record.scope {
                    CommandScope::Global => {
                        info!(command = %record.name, "Registered the custom global command")
                    }
                    CommandScope::Guild(guild) => {
                        info!(command = %record.name, guild, "Registered the custom guild command")
                    }
                }
            }
            info!(count = records.len(), "Loaded custom commands");
        }
        Err(e) => warn!(error = %e, "Failed to load custom commands from database"),
    }

    let registry = Arc::new(Registry::build(builtin_commands()));
    info!(count = registry.len(), "Static commands registered");

    let dispatcher = Arc::new(Dispatcher::new(
        config.bot.prefix.clone(),
        registry,
        Arc::new(db.clone()),
    ));
    let gateway = ConsoleGateway::new(dispatcher, &config.bot, &config.console);

    let stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = gateway.run(stdin, tokio::io::stdout()) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    db.pool().close().await;
    info!("dirk stopped");
    Ok(())
}
