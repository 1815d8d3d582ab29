//! # Schedule Error Taxonomy
//!
//! Typed failures for the schedule engine. Command handlers translate these
//! into user-facing replies; everything outside the engine stays on
//! `anyhow::Result`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0
//! - **Toggleable**: false

use thiserror::Error;

/// Failures raised by schedule parsing, calibration, and persistence.
///
/// Removal of an unset field is not an error; those operations report a
/// `bool` instead. Disconnect failures in the enforcement sweep are logged
/// per participant and never surface through this type.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Malformed `HH:MM` (or `HH:MM-HH:MM`) user input. No state was mutated.
    #[error("invalid time format: {input}")]
    InvalidTimeFormat { input: String },

    /// A calibrated offset fell outside the supported ±12h band. No state
    /// was mutated.
    #[error("UTC offset of {minutes} minutes is outside the supported ±720 range")]
    OffsetOutOfRange { minutes: i64 },

    /// The settings file could not be read or written. After a failed write
    /// the in-memory map is still authoritative; the next successful save
    /// catches the file up.
    #[error("settings file I/O failed at {path}")]
    PersistenceFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The settings file exists but cannot be parsed. Startup refuses to
    /// continue rather than overwrite it with an empty store; repairing or
    /// removing the file is an operator action.
    #[error("settings file at {path} is corrupt: {source}")]
    LoadCorruption {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
