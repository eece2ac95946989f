//! `SeaORM` entity definitions.

pub mod invoices;
pub mod payments;
