//! # Enforcement Feature
//!
//! Time matching and the periodic sweep that disconnects matching
//! participants through the presence gateway.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false

pub mod evaluator;
pub mod gateway;
pub mod sweeper;

pub use evaluator::{evaluate, local_minute_of_day, MatchDecision};
pub use gateway::{CommunityId, DiscordGateway, ParticipantId, PresenceGateway};
pub use sweeper::EnforcementSweeper;
