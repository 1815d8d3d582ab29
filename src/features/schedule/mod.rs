//! # Schedule Feature
//!
//! Per-user disconnect schedules: data model and persistent store.
//!
//! - **Version**: 2.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod record;
pub mod store;

pub use record::{ScheduleRecord, TimeOfDay, TimeWindow, MAX_OFFSET_MINUTES, MINUTES_PER_DAY};
pub use store::ScheduleStore;
