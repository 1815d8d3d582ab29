//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0

use crate::features::schedule::ScheduleStore;
use std::sync::Arc;

/// Shared state handed to every command handler.
///
/// The schedule store is the single source of truth for per-user schedules;
/// handlers mutate it here while the enforcement sweep reads it.
#[derive(Clone)]
pub struct CommandContext {
    pub store: Arc<ScheduleStore>,
}

impl CommandContext {
    pub fn new(store: Arc<ScheduleStore>) -> Self {
        CommandContext { store }
    }
}
