//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and written with the schema
//! builder so they run on PostgreSQL and on SQLite (tests).

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_invoices;
mod m20260301_000002_payments;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_invoices::Migration),
            Box::new(m20260301_000002_payments::Migration),
        ]
    }
}
