//! Database migration runner for Invoicer.
//!
//! Usage:
//!   migrator up      - Run all pending migrations
//!   migrator down    - Rollback last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations
//!
//! The database URL comes from `INVOICER__DATABASE__URL` or `config/*.toml`.

use anyhow::{Context, bail};
use invoicer_db::migration::Migrator;
use invoicer_shared::{AppConfig, telemetry};
use sea_orm_migration::MigratorTrait;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.log)?;

    let command = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());

    let db = invoicer_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    match command.as_str() {
        "up" => Migrator::up(&db, None).await?,
        "down" => Migrator::down(&db, Some(1)).await?,
        "status" => Migrator::status(&db).await?,
        "fresh" => Migrator::fresh(&db).await?,
        other => bail!("Unknown command `{other}`, expected one of: up, down, status, fresh"),
    }

    info!(command = %command, "Migration command finished");
    Ok(())
}
