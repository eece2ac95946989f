//! Field-keyed validation errors attached to invoices and payments.

use serde::Serialize;

/// The record field a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Whole-record error, not tied to a single field.
    Base,
    /// Invoice total.
    Total,
    /// Payment amount.
    Amount,
    /// Payment method as supplied by the caller.
    Method,
    /// Stored payment method code.
    MethodId,
}

impl Field {
    /// Returns the field name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Total => "total",
            Self::Amount => "amount",
            Self::Method => "method",
            Self::MethodId => "method_id",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered collection of validation messages keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    entries: Vec<(Field, String)>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a collection holding a single message.
    #[must_use]
    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Appends a message for `field`.
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.entries.push((field, message.into()));
    }

    /// Appends every message from `other`, keeping its order.
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Removes all messages.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns true if there are no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Messages recorded against `field`.
    #[must_use]
    pub fn on(&self, field: Field) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(f, _)| *f == field)
            .map(|(_, message)| message.as_str())
            .collect()
    }

    /// Human-readable messages, prefixed with the field name except for `base`.
    #[must_use]
    pub fn full_messages(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(field, message)| match field {
                Field::Base => message.clone(),
                _ => format!("{field} {message}"),
            })
            .collect()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}
