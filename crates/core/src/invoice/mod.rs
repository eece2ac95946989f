//! Invoice balance tracking and payment recording rules.
//!
//! This module implements:
//! - Invoice aggregate with balance and settlement queries
//! - Payment method table and payment validation
//! - Field-keyed validation errors
//! - Payment authorization against a locked balance snapshot

pub mod error;
pub mod payment;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;

pub use error::{InvoiceError, OVERPAYMENT_MESSAGE};
pub use payment::{INVALID_METHOD_MESSAGE, NewPayment, Payment, PaymentMethod, UnknownPaymentMethod};
pub use service::InvoiceService;
pub use types::{Invoice, NewInvoice};
pub use validation::{Field, ValidationErrors};
