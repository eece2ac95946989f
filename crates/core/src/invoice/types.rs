//! Invoice aggregate and creation input.

use invoicer_shared::types::{InvoiceId, normalize_total, to_dollars};
use rust_decimal::Decimal;
use serde::Serialize;

use super::payment::Payment;
use super::validation::{Field, ValidationErrors};

/// A validated invoice total, normalized to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewInvoice {
    /// Total in cents, always positive.
    pub total: i64,
}

impl NewInvoice {
    /// Validates and normalizes a caller-supplied total.
    ///
    /// Pipeline: presence, positivity, then the dollars/cents threshold
    /// normalization from [`normalize_total`].
    ///
    /// # Errors
    ///
    /// Returns `total` errors when the value is missing, not positive, or too large.
    pub fn build(total: Option<Decimal>) -> Result<Self, ValidationErrors> {
        let Some(raw) = total else {
            return Err(ValidationErrors::single(Field::Total, "can't be blank"));
        };

        if raw <= Decimal::ZERO {
            return Err(ValidationErrors::single(
                Field::Total,
                "must be greater than 0",
            ));
        }

        match normalize_total(raw) {
            Some(cents) if cents > 0 => Ok(Self { total: cents }),
            Some(_) => Err(ValidationErrors::single(
                Field::Total,
                "must be greater than 0",
            )),
            None => Err(ValidationErrors::single(Field::Total, "is too large")),
        }
    }
}

/// An invoice with its payments in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    id: InvoiceId,
    total: i64,
    payments: Vec<Payment>,
    #[serde(skip)]
    errors: ValidationErrors,
}

impl Invoice {
    /// Assembles an invoice from stored state.
    #[must_use]
    pub fn new(id: InvoiceId, total: i64, payments: Vec<Payment>) -> Self {
        Self {
            id,
            total,
            payments,
            errors: ValidationErrors::new(),
        }
    }

    /// Invoice id.
    #[must_use]
    pub const fn id(&self) -> InvoiceId {
        self.id
    }

    /// Total in cents.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.total
    }

    /// Total in dollars.
    #[must_use]
    pub fn total_in_dollars(&self) -> Decimal {
        to_dollars(self.total)
    }

    /// Payments in creation order.
    #[must_use]
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    /// Number of payments.
    #[must_use]
    pub fn payment_count(&self) -> usize {
        self.payments.len()
    }

    /// Sum of all payments in cents.
    #[must_use]
    pub fn amount_paid(&self) -> i64 {
        self.payments.iter().map(Payment::amount).sum()
    }

    /// Remaining balance in dollars. Negative when overpaid.
    #[must_use]
    pub fn amount_owed(&self) -> Decimal {
        to_dollars(self.total - self.amount_paid())
    }

    /// True once the remaining balance is zero or negative.
    #[must_use]
    pub fn fully_paid(&self) -> bool {
        self.amount_owed() <= Decimal::ZERO
    }

    /// Errors from the last failed operation.
    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Mutable access to the error collection.
    pub fn errors_mut(&mut self) -> &mut ValidationErrors {
        &mut self.errors
    }

    #[cfg(test)]
    pub(crate) fn push_payment(&mut self, payment: Payment) {
        debug_assert_eq!(payment.invoice_id(), self.id);
        self.payments.push(payment);
    }

    /// Replaces total and payments with freshly loaded state.
    pub fn refresh(&mut self, total: i64, payments: Vec<Payment>) {
        self.total = total;
        self.payments = payments;
    }

    /// Sets a new total that has already been normalized and persisted.
    pub fn set_total(&mut self, total: i64) {
        self.total = total;
    }
}
