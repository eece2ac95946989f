//! Shared types, errors, and configuration for Invoicer.
//!
//! This crate provides common types used across all other crates:
//! - Currency conversion between dollars and cents
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management
//! - Tracing subscriber setup for binaries

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
