//! Per-command handler implementations
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.5.0
//!
//! ## Changelog
//! - 1.1.0: Add cleartime/clearrange handling
//! - 1.0.0: Initial extraction into per-area handlers

pub mod schedule;
pub mod utility;

use anyhow::Result;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use super::handler::SlashCommandHandler;

/// Create all registered command handlers
pub fn create_all_handlers() -> Vec<Arc<dyn SlashCommandHandler>> {
    vec![
        Arc::new(schedule::ScheduleHandler),
        Arc::new(utility::UtilityHandler),
    ]
}

/// Send a plain-text immediate response to a slash command.
pub(crate) async fn respond(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: impl Into<String>,
) -> Result<()> {
    let content = content.into();
    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content))
        })
        .await?;
    Ok(())
}
