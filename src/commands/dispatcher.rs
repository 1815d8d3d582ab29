//! Command dispatch
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0

use anyhow::Result;
use log::{debug, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use super::context::CommandContext;
use super::handlers::create_all_handlers;
use super::registry::CommandRegistry;

/// Routes incoming slash commands to their handlers.
pub struct CommandDispatcher {
    registry: CommandRegistry,
    context: Arc<CommandContext>,
}

impl CommandDispatcher {
    /// Build a dispatcher with every handler registered.
    pub fn new(context: CommandContext) -> Self {
        let mut registry = CommandRegistry::new();
        for handler in create_all_handlers() {
            registry.register(handler);
        }

        CommandDispatcher {
            registry,
            context: Arc::new(context),
        }
    }

    /// Dispatch one slash command interaction.
    pub async fn dispatch(
        &self,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let name = command.data.name.as_str();
        debug!("Dispatching slash command '{name}' from user {}", command.user.id);

        match self.registry.get(name) {
            Some(handler) => {
                handler
                    .handle(Arc::clone(&self.context), serenity_ctx, command)
                    .await
            }
            None => {
                warn!("Received unknown slash command '{name}'");
                Ok(())
            }
        }
    }
}
