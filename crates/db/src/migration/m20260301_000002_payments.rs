//! Payments table.
//!
//! Each payment belongs to exactly one invoice and is removed with it.
//! `method_id` holds the payment method code (1 = cash, 2 = check, 3 = charge).

use sea_orm_migration::prelude::*;

use super::m20260301_000001_invoices::Invoices;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::InvoiceId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Payments::Amount)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Payments::Amount).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Payments::MethodId)
                            .small_integer()
                            .not_null()
                            .check(Expr::col(Payments::MethodId).is_in([1, 2, 3])),
                    )
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_invoice")
                            .from(Payments::Table, Payments::InvoiceId)
                            .to(Invoices::Table, Invoices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_invoice")
                    .table(Payments::Table)
                    .col(Payments::InvoiceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    InvoiceId,
    Amount,
    MethodId,
    CreatedAt,
}
