//! Payment authorization against an invoice balance.
//!
//! This module decides whether a payment may be recorded. It runs on a
//! snapshot (total and paid-so-far) that the caller must read under an
//! exclusive lock on the invoice row, inside the same transaction that will
//! insert the payment.

use invoicer_shared::types::{InvoiceId, to_cents, to_dollars};
use rust_decimal::Decimal;

use super::error::InvoiceError;
use super::payment::NewPayment;

/// Invoice service for payment authorization.
///
/// Pure business logic, no database dependencies.
pub struct InvoiceService;

impl InvoiceService {
    /// Rejects zero and negative payment amounts.
    ///
    /// Called before any lock is taken so invalid input never touches storage.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::InvalidAmount` if `amount <= 0`.
    pub fn check_amount(amount: Decimal) -> Result<(), InvoiceError> {
        if amount <= Decimal::ZERO {
            return Err(InvoiceError::InvalidAmount(amount));
        }
        Ok(())
    }

    /// Remaining balance in cents.
    #[must_use]
    pub const fn remaining(total: i64, paid: i64) -> i64 {
        total - paid
    }

    /// Validates a payment against a locked balance snapshot.
    ///
    /// Steps:
    /// 1. Rejects non-positive amounts
    /// 2. Converts dollars to cents
    /// 3. Rejects a payment larger than `total - paid`
    /// 4. Validates the payment record (amount, method)
    ///
    /// # Arguments
    ///
    /// * `invoice_id` - The invoice being paid
    /// * `total` - Invoice total in cents
    /// * `paid` - Sum of existing payments in cents, re-read under the lock
    /// * `amount` - Payment amount in dollars
    /// * `raw_method` - Caller's method token
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError` describing the first rule that failed.
    pub fn authorize_payment(
        invoice_id: InvoiceId,
        total: i64,
        paid: i64,
        amount: Decimal,
        raw_method: &str,
    ) -> Result<NewPayment, InvoiceError> {
        Self::check_amount(amount)?;

        let owed = Self::remaining(total, paid);
        let overpayment = || InvoiceError::Overpayment {
            amount,
            owed: to_dollars(owed),
        };

        let cents = to_cents(amount).ok_or_else(overpayment)?;
        if cents > owed {
            return Err(overpayment());
        }

        Ok(NewPayment::build(invoice_id, cents, raw_method)?)
    }
}
