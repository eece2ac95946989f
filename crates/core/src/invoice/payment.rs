//! Payment methods and payment records.

use invoicer_shared::types::{InvoiceId, PaymentId, to_dollars};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::{Field, ValidationErrors};

/// Message attached to `method` when the caller's token is not recognized.
pub const INVALID_METHOD_MESSAGE: &str = "must be cash, check, or charge";

/// The fixed set of accepted payment methods.
///
/// Discriminants are the codes persisted in `payments.method_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum PaymentMethod {
    /// Cash payment.
    Cash = 1,
    /// Paper check.
    Check = 2,
    /// Card charge.
    Charge = 3,
}

/// Every method, in code order.
const METHODS: [PaymentMethod; 3] = [
    PaymentMethod::Cash,
    PaymentMethod::Check,
    PaymentMethod::Charge,
];

impl PaymentMethod {
    /// Returns the stored code.
    #[must_use]
    pub const fn code(self) -> i16 {
        self as i16
    }

    /// Looks up a method by its stored code.
    #[must_use]
    pub fn from_code(code: i16) -> Option<Self> {
        METHODS.into_iter().find(|method| method.code() == code)
    }

    /// Returns the symbolic tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Check => "check",
            Self::Charge => "charge",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a token does not name one of the three methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl std::str::FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        METHODS
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| UnknownPaymentMethod(s.to_string()))
    }
}

/// A validated payment that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    /// Owning invoice.
    pub invoice_id: InvoiceId,
    /// Amount in cents, always positive.
    pub amount: i64,
    /// Payment method.
    pub method: PaymentMethod,
}

impl NewPayment {
    /// Validates the amount and method token and builds an insertable payment.
    ///
    /// # Errors
    ///
    /// Returns every failed rule: non-positive `amount`, unrecognized `method`.
    pub fn build(
        invoice_id: InvoiceId,
        amount: i64,
        raw_method: &str,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if amount <= 0 {
            errors.add(Field::Amount, "must be greater than 0");
        }

        let method = match raw_method.parse::<PaymentMethod>() {
            Ok(method) => Some(method),
            Err(_) => {
                errors.add(Field::Method, INVALID_METHOD_MESSAGE);
                None
            }
        };

        match method {
            Some(method) if errors.is_empty() => Ok(Self {
                invoice_id,
                amount,
                method,
            }),
            _ => Err(errors),
        }
    }

    /// Code to store in `method_id`.
    #[must_use]
    pub const fn method_id(&self) -> i16 {
        self.method.code()
    }

    /// Attaches the database-assigned id.
    #[must_use]
    pub const fn into_payment(self, id: PaymentId) -> Payment {
        Payment {
            id,
            invoice_id: self.invoice_id,
            amount: self.amount,
            method: self.method,
        }
    }
}

/// A persisted payment. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    id: PaymentId,
    invoice_id: InvoiceId,
    amount: i64,
    method: PaymentMethod,
}

impl Payment {
    /// Rebuilds a payment from stored columns.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is not positive or `method_id` is not a known code.
    pub fn from_record(
        id: PaymentId,
        invoice_id: InvoiceId,
        amount: i64,
        method_id: i16,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if amount <= 0 {
            errors.add(Field::Amount, "must be greater than 0");
        }
        let method = PaymentMethod::from_code(method_id);
        if method.is_none() {
            errors.add(Field::MethodId, "must be valid");
        }

        match method {
            Some(method) if errors.is_empty() => Ok(Self {
                id,
                invoice_id,
                amount,
                method,
            }),
            _ => Err(errors),
        }
    }

    /// Payment id.
    #[must_use]
    pub const fn id(&self) -> PaymentId {
        self.id
    }

    /// Owning invoice.
    #[must_use]
    pub const fn invoice_id(&self) -> InvoiceId {
        self.invoice_id
    }

    /// Amount in cents.
    #[must_use]
    pub const fn amount(&self) -> i64 {
        self.amount
    }

    /// Amount in dollars.
    #[must_use]
    pub fn amount_in_dollars(&self) -> Decimal {
        to_dollars(self.amount)
    }

    /// Payment method.
    #[must_use]
    pub const fn method(&self) -> PaymentMethod {
        self.method
    }

    /// Stored method code.
    #[must_use]
    pub const fn method_id(&self) -> i16 {
        self.method.code()
    }
}
