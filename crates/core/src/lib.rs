//! Core business logic for Invoicer.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `invoice` - Invoices, payments, balances and overpayment rules

pub mod invoice;

pub use invoice::{
    Field, Invoice, InvoiceError, InvoiceService, NewInvoice, NewPayment, Payment, PaymentMethod,
    ValidationErrors,
};
