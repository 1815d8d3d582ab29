//! # Command System
//!
//! Slash command (/) handling for Discord interactions.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add cleartime/clearrange removal commands
//! - 1.0.0: Modular handler infrastructure (handler trait, context, registry)

pub mod context;
pub mod dispatcher;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod slash;

// Re-export handler infrastructure
pub use context::CommandContext;
pub use dispatcher::CommandDispatcher;
pub use handler::SlashCommandHandler;
pub use registry::CommandRegistry;

// Re-export commonly used items from submodules
pub use slash::{
    create_slash_commands, get_string_option, get_user_option, register_global_commands,
    register_guild_commands,
};
