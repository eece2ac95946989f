//! Invoice error types.

use rust_decimal::Decimal;
use thiserror::Error;

use super::validation::{Field, ValidationErrors};

/// Message attached to the invoice when a payment would exceed what is owed.
pub const OVERPAYMENT_MESSAGE: &str = "payment amount exceeds amount owed";

/// Reasons a payment cannot be recorded against an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvoiceError {
    /// Payment amount is zero or negative.
    #[error("Payment amount must be greater than 0, got {0}")]
    InvalidAmount(Decimal),

    /// Payment alone is larger than the remaining balance.
    #[error("Payment amount exceeds amount owed: {amount} > {owed}")]
    Overpayment {
        /// Attempted payment in dollars.
        amount: Decimal,
        /// Remaining balance in dollars at the time of the check.
        owed: Decimal,
    },

    /// The payment record failed field validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
}

impl InvoiceError {
    /// Converts the failure into messages for the invoice's error collection.
    #[must_use]
    pub fn into_validation_errors(self) -> ValidationErrors {
        match self {
            Self::InvalidAmount(_) => ValidationErrors::single(Field::Amount, "must be greater than 0"),
            Self::Overpayment { .. } => ValidationErrors::single(Field::Base, OVERPAYMENT_MESSAGE),
            Self::Validation(errors) => errors,
        }
    }
}

impl From<ValidationErrors> for InvoiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
