//! Shared configuration, errors, and helpers for Ledgerflow.
//!
//! This crate provides the pieces every other crate leans on:
//! - Layered application configuration
//! - The application-wide error type used by the HTTP layer
//! - SMTP e-mail transport for assignee notifications
//! - Minor-unit rounding for monetary amounts

pub mod config;
pub mod email;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::AppError;
