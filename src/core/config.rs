//! # Configuration
//!
//! Environment-driven bot configuration with validation.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add sweep interval and disconnect timeout tuning
//! - 1.0.0: Initial creation with token, guild, and settings path

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default enforcement sweep interval in seconds
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 2;

/// Default per-participant disconnect deadline in seconds
pub const DEFAULT_DISCONNECT_TIMEOUT_SECS: u64 = 5;

/// Longest accepted sweep interval (one hour)
pub const MAX_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token (required)
    pub discord_token: String,
    /// Optional guild ID for guild-scoped command registration during development
    pub discord_guild_id: Option<String>,
    /// Path of the JSON settings file holding per-user schedules
    pub settings_path: PathBuf,
    /// Seconds between enforcement sweeps
    pub sweep_interval_secs: u64,
    /// Seconds a single disconnect call may take before it is abandoned
    pub disconnect_timeout_secs: u64,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Config {
    /// Build configuration from environment variables.
    ///
    /// `DISCORD_TOKEN` is required; everything else has a default:
    /// `DISCORD_GUILD_ID` (unset), `SETTINGS_PATH` (`settings.json`),
    /// `SWEEP_INTERVAL_SECS` (2), `DISCONNECT_TIMEOUT_SECS` (5),
    /// `LOG_LEVEL` (`info`).
    pub fn from_env() -> Result<Self> {
        let discord_token = std::env::var("DISCORD_TOKEN")
            .context("DISCORD_TOKEN environment variable must be set")?;

        let discord_guild_id = std::env::var("DISCORD_GUILD_ID")
            .ok()
            .filter(|id| !id.is_empty());

        let settings_path = std::env::var("SETTINGS_PATH")
            .unwrap_or_else(|_| "settings.json".to_string())
            .into();

        let sweep_interval_secs =
            env_u64("SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS)?;
        if sweep_interval_secs == 0 || sweep_interval_secs > MAX_SWEEP_INTERVAL_SECS {
            bail!(
                "SWEEP_INTERVAL_SECS must be between 1 and {MAX_SWEEP_INTERVAL_SECS}, got {sweep_interval_secs}"
            );
        }

        let disconnect_timeout_secs =
            env_u64("DISCONNECT_TIMEOUT_SECS", DEFAULT_DISCONNECT_TIMEOUT_SECS)?;
        if disconnect_timeout_secs == 0 || disconnect_timeout_secs > 60 {
            bail!(
                "DISCONNECT_TIMEOUT_SECS must be between 1 and 60, got {disconnect_timeout_secs}"
            );
        }

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            discord_token,
            discord_guild_id,
            settings_path,
            sweep_interval_secs,
            disconnect_timeout_secs,
            log_level,
        })
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn disconnect_timeout(&self) -> Duration {
        Duration::from_secs(self.disconnect_timeout_secs)
    }

    /// Exact-moment match tolerance derived from the sweep interval.
    pub fn tolerance_minutes(&self) -> u32 {
        tolerance_for_interval(self.sweep_interval_secs)
    }
}

/// Tolerance, in whole minutes, for an enforcement sweep running every
/// `interval_secs` seconds: the interval rounded up, never below one minute.
/// This guarantees an exact moment is observed at least once even though
/// sweeps sample time discretely.
pub fn tolerance_for_interval(interval_secs: u64) -> u32 {
    (((interval_secs + 59) / 60) as u32).max(1)
}

fn env_u64(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{name} must be an integer, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
