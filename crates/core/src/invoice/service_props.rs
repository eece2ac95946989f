//! Property-based tests for invoice balance tracking.

use invoicer_shared::types::{InvoiceId, PaymentId, to_cents, to_dollars};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::InvoiceError;
use super::service::InvoiceService;
use super::types::Invoice;

/// Strategy for a positive total in cents (0.01 to 1,000,000.00).
fn total_cents() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

/// Strategy for a payment method token.
fn method() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("cash"), Just("check"), Just("charge")]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// An invoice without payments owes its full total.
    #[test]
    fn prop_unpaid_invoice_owes_total(total in total_cents()) {
        let invoice = Invoice::new(InvoiceId::new(1), total, vec![]);
        prop_assert_eq!(invoice.amount_owed(), to_dollars(total));
        prop_assert!(!invoice.fully_paid());
    }

    /// Dollars with at most two decimal places survive a trip through cents.
    #[test]
    fn prop_cents_round_trip(cents in -100_000_000i64..100_000_000i64) {
        let dollars = Decimal::new(cents, 2);
        prop_assert_eq!(to_cents(dollars), Some(cents));
        prop_assert_eq!(to_dollars(cents), dollars);
    }

    /// Authorized payments never push the paid sum past the total, and the
    /// balance always equals total minus payments.
    #[test]
    fn prop_authorized_payments_stay_within_total(
        total in total_cents(),
        attempts in prop::collection::vec((1i64..50_000_000i64, method()), 1..20),
    ) {
        let id = InvoiceId::new(1);
        let mut invoice = Invoice::new(id, total, vec![]);

        for (next_id, (cents, method)) in (1i64..).zip(attempts) {
            let amount = Decimal::new(cents, 2);
            match InvoiceService::authorize_payment(id, invoice.total(), invoice.amount_paid(), amount, method) {
                Ok(payment) => {
                    prop_assert!(payment.amount <= invoice.total() - invoice.amount_paid());
                    invoice.push_payment(payment.into_payment(PaymentId::new(next_id)));
                }
                Err(InvoiceError::Overpayment { .. }) => {
                    prop_assert!(cents > invoice.total() - invoice.amount_paid());
                }
                Err(other) => prop_assert!(false, "unexpected error: {other:?}"),
            }

            prop_assert!(invoice.amount_paid() <= invoice.total());
            prop_assert_eq!(
                invoice.amount_owed(),
                to_dollars(invoice.total() - invoice.amount_paid())
            );
            prop_assert_eq!(invoice.fully_paid(), invoice.amount_owed() <= Decimal::ZERO);
        }
    }

    /// Non-positive amounts are always rejected.
    #[test]
    fn prop_non_positive_rejected(total in total_cents(), cents in -100_000_000i64..=0i64) {
        let result = InvoiceService::authorize_payment(
            InvoiceId::new(1),
            total,
            0,
            Decimal::new(cents, 2),
            "cash",
        );
        prop_assert!(matches!(result, Err(InvoiceError::InvalidAmount(_))));
    }
}
