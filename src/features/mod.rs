//! # Features Layer
//!
//! Domain features of the curfew bot.

pub mod enforcement;
pub mod schedule;

// Re-export feature items
pub use enforcement::{
    evaluate, DiscordGateway, EnforcementSweeper, MatchDecision, PresenceGateway,
};
pub use schedule::{ScheduleRecord, ScheduleStore, TimeOfDay, TimeWindow};
