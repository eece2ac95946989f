//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{CENTS_THRESHOLD, normalize_total, to_cents, to_dollars};
