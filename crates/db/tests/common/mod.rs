//! Shared setup for repository integration tests.
//!
//! Each test gets its own in-memory SQLite database with migrations applied.
//! The pool holds a single connection so the in-memory database lives as long
//! as the pool does.
//!
//! SQLite has no row locks, so lock contention is tested against PostgreSQL
//! when `INVOICER_TEST_DATABASE_URL` (or `DATABASE_URL`) is set.

#![allow(dead_code)]

use invoicer_db::{InvoiceRepository, connect, migration::{Migrator, MigratorTrait}};
use invoicer_shared::config::DatabaseConfig;
use sea_orm::DatabaseConnection;
use std::env;

pub async fn setup() -> (DatabaseConnection, InvoiceRepository) {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };

    let db = connect(&config)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    (db.clone(), InvoiceRepository::new(db))
}

fn postgres_url() -> Option<String> {
    env::var("INVOICER_TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .ok()
        .filter(|url| url.starts_with("postgres"))
}

/// Migrated PostgreSQL repository with a pool of `max_connections`, or `None`
/// when no database is configured or reachable.
pub async fn setup_postgres(max_connections: u32) -> Option<InvoiceRepository> {
    let Some(url) = postgres_url() else {
        eprintln!("Skipping test - INVOICER_TEST_DATABASE_URL not set");
        return None;
    };

    let config = DatabaseConfig {
        url,
        max_connections,
        min_connections: 1,
    };
    let db = match connect(&config).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Skipping test - database not available: {e}");
            return None;
        }
    };
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    Some(InvoiceRepository::new(db))
}

pub async fn payment_rows(db: &DatabaseConnection) -> u64 {
    use invoicer_db::entities::payments;
    use sea_orm::{EntityTrait, PaginatorTrait};

    payments::Entity::find()
        .count(db)
        .await
        .expect("Failed to count payments")
}
