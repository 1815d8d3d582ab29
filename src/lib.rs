// Core layer - configuration and error types
pub mod core;

// Features layer - schedule storage and presence enforcement
pub mod features;

// Application layer - slash command surface
pub mod commands;

// Re-export core items
pub use crate::core::{Config, ScheduleError};

// Re-export feature items
pub use features::{
    // Enforcement
    evaluate, DiscordGateway, EnforcementSweeper, MatchDecision, PresenceGateway,
    // Schedule
    ScheduleRecord, ScheduleStore, TimeOfDay, TimeWindow,
};
