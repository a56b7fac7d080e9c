//! Walkthrough binary for the jobboard schema.
//!
//! Connects to `PostgreSQL` with credentials from the environment and runs
//! two scripted walkthroughs, printing what each step leaves in the tables.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `jobboard-config.yaml`
//! 2. Initialize structured logging (tracing), echoing SQL when configured
//! 3. Connect to `PostgreSQL`
//! 4. Run the statement-at-a-time walkthrough over `some_table`
//! 5. Run the session walkthrough over users, jobs, and companies
//! 6. Close the pool

mod config;
mod core_tour;
mod error;
mod orm_tour;
mod report;

use jobboard_db::PostgresPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingConfig, TourConfig};
use crate::error::TourError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, connection, or any walkthrough step fails.
#[tokio::main]
async fn main() -> Result<(), TourError> {
    // 1. Load configuration. Logging is not up yet, so this comes first.
    let config = TourConfig::load()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging, config.database.echo)?;
    info!(
        host = config.database.host,
        port = config.database.port,
        schema = config.database.schema,
        echo = config.database.echo,
        link_on_delete = config.schema.link_on_delete,
        "jobboard-tour starting"
    );

    // 3. Connect.
    let pg_config = config.postgres_config()?;
    let pool = PostgresPool::connect(&pg_config).await?;

    // 4-5. Walkthroughs.
    if config.tour.run_core {
        core_tour::run(&pool).await?;
    }
    if config.tour.run_orm {
        orm_tour::run(&pool, config.tour.drop_after).await?;
    }

    // 6. Done.
    pool.close().await;
    info!("jobboard-tour finished");
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level is used, with
/// `sqlx::query=debug` added when statement echo is on.
fn init_logging(logging: &LoggingConfig, echo: bool) -> Result<(), TourError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(logging.filter_directives(echo)))
        .map_err(|e| TourError::Logging {
            message: format!("invalid log filter: {e}"),
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let installed = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| TourError::Logging {
        message: e.to_string(),
    })
}
