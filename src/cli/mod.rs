//! # Command Line Interface
//!
//! `serve` (the default) runs the HTTP API; `migrate` applies or lists
//! database migrations without starting the server.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::api::start_api_server;
use crate::config::Config;
use crate::observability::{init_tracing, log_config_info};
use crate::services::StaffDirectory;
use crate::storage::{create_pool, list_applied_migrations, run_migrations};
use crate::{APP_NAME, VERSION};

#[derive(Parser, Debug)]
#[command(name = "medistaff")]
#[command(about = "Hospital staff directory service")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Database URL override
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP API server
    Serve,

    /// Apply pending database migrations
    Migrate {
        /// List applied migrations instead of running them
        #[arg(long)]
        status: bool,
    },
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(url) = cli.database_url {
        config.database.url = url;
        config.validate().context("invalid database URL override")?;
    }

    init_tracing(&config.observability).context("failed to initialize logging")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Migrate { status } => migrate(config, status).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!(app_name = APP_NAME, version = VERSION, "Starting staff directory service");
    log_config_info(&config);

    let pool = create_pool(&config.database).await.context("failed to open database")?;

    if let Some(admin) = &config.bootstrap_admin {
        StaffDirectory::with_sqlx(pool.clone())
            .bootstrap_admin(admin)
            .await
            .context("failed to create bootstrap administrator")?;
    }

    start_api_server(config.api.clone(), &config.auth, pool).await?;
    Ok(())
}

async fn migrate(mut config: Config, status: bool) -> anyhow::Result<()> {
    // Run explicitly below rather than through the pool
    config.database.auto_migrate = false;
    let pool = create_pool(&config.database).await.context("failed to open database")?;

    if !status {
        run_migrations(&pool).await.context("migration failed")?;
    }

    for migration in list_applied_migrations(&pool).await? {
        println!(
            "{}  {:<24} {}  ({} ms)",
            migration.version,
            migration.description,
            migration.installed_on.to_rfc3339(),
            migration.execution_time
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["medistaff"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn parses_migrate_status() {
        let cli = Cli::try_parse_from(["medistaff", "migrate", "--status"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Migrate { status: true }));
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["medistaff", "xds"]).is_err());
    }
}
