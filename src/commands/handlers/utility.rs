//! Utility command handlers
//!
//! Handles: help
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::handlers::respond;

/// Handler for utility commands: help
pub struct UtilityHandler;

#[async_trait]
impl SlashCommandHandler for UtilityHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["help"]
    }

    async fn handle(
        &self,
        _ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let help_text = "🛠️ **Curfew Bot Commands**\n\n\
            • `/settime <user> <HH:MM>` – Disconnect them from voice once daily at a specific time.\n\
            • `/setrange <user> <HH:MM-HH:MM>` – Disconnect them repeatedly during a time range.\n\
            • `/settimezone <HH:MM>` – Tell the bot your current local time for timezone calibration.\n\
            • `/cleartime [user]` – Remove a daily disconnect time.\n\
            • `/clearrange [user]` – Remove a disconnect range.\n\
            • `/status [user]` – See current settings.\n\
            • `/help` – Show this help message.";

        respond(serenity_ctx, command, help_text).await
    }
}
