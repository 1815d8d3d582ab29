//! # Core Module
//!
//! Shared configuration and error types for the curfew bot.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

pub mod config;
pub mod error;

// Re-export commonly used items
pub use config::{tolerance_for_interval, Config};
pub use error::ScheduleError;
