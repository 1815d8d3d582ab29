//! Schedule command handlers
//!
//! Handles: settime, setrange, settimezone, cleartime, clearrange, status
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.5.0
//!
//! ## Changelog
//! - 1.1.0: Add cleartime/clearrange, optional member on status
//! - 1.0.0: Initial implementation

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use log::{error, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::handlers::respond;
use crate::commands::slash::{get_string_option, get_user_option};
use crate::core::ScheduleError;
use crate::features::schedule::{TimeOfDay, TimeWindow};

/// Handler for schedule-related commands
pub struct ScheduleHandler;

#[async_trait]
impl SlashCommandHandler for ScheduleHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &[
            "settime",
            "setrange",
            "settimezone",
            "cleartime",
            "clearrange",
            "status",
        ]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match command.data.name.as_str() {
            "settime" => self.handle_settime(&ctx, serenity_ctx, command).await,
            "setrange" => self.handle_setrange(&ctx, serenity_ctx, command).await,
            "settimezone" => self.handle_settimezone(&ctx, serenity_ctx, command).await,
            "cleartime" => self.handle_cleartime(&ctx, serenity_ctx, command).await,
            "clearrange" => self.handle_clearrange(&ctx, serenity_ctx, command).await,
            "status" => self.handle_status(&ctx, serenity_ctx, command).await,
            _ => Ok(()),
        }
    }
}

impl ScheduleHandler {
    /// Handle /settime - set the once-daily disconnect moment for a member
    async fn handle_settime(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let target = get_user_option(&command.data.options, "member")
            .ok_or_else(|| anyhow::anyhow!("Missing member parameter"))?;
        let time_str = get_string_option(&command.data.options, "time")
            .ok_or_else(|| anyhow::anyhow!("Missing time parameter"))?;

        let moment: TimeOfDay = match time_str.parse() {
            Ok(moment) => moment,
            Err(_) => {
                return respond(
                    serenity_ctx,
                    command,
                    "❗ Please enter time in **HH:MM** format.",
                )
                .await;
            }
        };

        let outcome = ctx.store.set_exact_moment(&target.to_string(), moment).await;
        info!(
            "User {} set daily disconnect time for {target} to {moment}",
            command.user.id
        );

        self.confirm_mutation(
            serenity_ctx,
            command,
            outcome,
            format!(
                "✅ Disconnect **time** for <@{target}> set to **{moment}**! They will be disconnected from voice at that time daily."
            ),
        )
        .await
    }

    /// Handle /setrange - set the recurring disconnect window for a member
    async fn handle_setrange(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let target = get_user_option(&command.data.options, "member")
            .ok_or_else(|| anyhow::anyhow!("Missing member parameter"))?;
        let range_str = get_string_option(&command.data.options, "range")
            .ok_or_else(|| anyhow::anyhow!("Missing range parameter"))?;

        let window: TimeWindow = match range_str.parse() {
            Ok(window) => window,
            Err(_) => {
                return respond(
                    serenity_ctx,
                    command,
                    "❗ Please provide the range in format **HH:MM-HH:MM**.",
                )
                .await;
            }
        };

        let outcome = ctx.store.set_window(&target.to_string(), window).await;
        info!(
            "User {} set disconnect range for {target} to {window}",
            command.user.id
        );

        self.confirm_mutation(
            serenity_ctx,
            command,
            outcome,
            format!(
                "✅ Disconnect **range** for <@{target}> set to **{window}**! They will be disconnected repeatedly during this window."
            ),
        )
        .await
    }

    /// Handle /settimezone - calibrate the caller's UTC offset from their
    /// reported local time
    async fn handle_settimezone(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let time_str = get_string_option(&command.data.options, "current_time")
            .ok_or_else(|| anyhow::anyhow!("Missing current_time parameter"))?;

        let reported: TimeOfDay = match time_str.parse() {
            Ok(reported) => reported,
            Err(_) => {
                return respond(
                    serenity_ctx,
                    command,
                    "❗ Please enter time in **HH:MM** format.",
                )
                .await;
            }
        };

        let user_id = command.user.id.to_string();
        match ctx
            .store
            .set_offset_from_report(&user_id, reported, Utc::now())
            .await
        {
            Ok(offset) => {
                info!("User {user_id} calibrated timezone offset to {offset:+} minutes");
                respond(
                    serenity_ctx,
                    command,
                    format!(
                        "✅ Your timezone offset has been set to **{offset:+} minutes** from UTC. All disconnect times will use this."
                    ),
                )
                .await
            }
            Err(ScheduleError::OffsetOutOfRange { minutes }) => {
                respond(
                    serenity_ctx,
                    command,
                    format!(
                        "❗ A {minutes}-minute offset is outside the supported ±12 hours."
                    ),
                )
                .await
            }
            Err(e) => self.report_persistence_failure(serenity_ctx, command, e).await,
        }
    }

    /// Handle /cleartime - remove a daily disconnect moment
    async fn handle_cleartime(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let target = get_user_option(&command.data.options, "member").unwrap_or(command.user.id.0);

        match ctx.store.remove_exact_moment(&target.to_string()).await {
            Ok(true) => {
                info!("User {} cleared daily disconnect time for {target}", command.user.id);
                respond(
                    serenity_ctx,
                    command,
                    format!("✅ Daily disconnect time for <@{target}> cleared."),
                )
                .await
            }
            Ok(false) => {
                respond(
                    serenity_ctx,
                    command,
                    format!("❗ <@{target}> has no daily disconnect time set."),
                )
                .await
            }
            Err(e) => self.report_persistence_failure(serenity_ctx, command, e).await,
        }
    }

    /// Handle /clearrange - remove a recurring disconnect window
    async fn handle_clearrange(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let target = get_user_option(&command.data.options, "member").unwrap_or(command.user.id.0);

        match ctx.store.remove_window(&target.to_string()).await {
            Ok(true) => {
                info!("User {} cleared disconnect range for {target}", command.user.id);
                respond(
                    serenity_ctx,
                    command,
                    format!("✅ Disconnect range for <@{target}> cleared."),
                )
                .await
            }
            Ok(false) => {
                respond(
                    serenity_ctx,
                    command,
                    format!("❗ <@{target}> has no disconnect range set."),
                )
                .await
            }
            Err(e) => self.report_persistence_failure(serenity_ctx, command, e).await,
        }
    }

    /// Handle /status - read-only projection of a schedule record
    async fn handle_status(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let invoker = command.user.id.0;
        let target = get_user_option(&command.data.options, "member").unwrap_or(invoker);

        let record = match ctx.store.get(&target.to_string()).await {
            Some(record) => record,
            None => {
                let message = if target == invoker {
                    "❗ You don't have any disconnect settings yet.".to_string()
                } else {
                    format!("❗ <@{target}> has no disconnect settings yet.")
                };
                return respond(serenity_ctx, command, message).await;
            }
        };

        let mut lines = Vec::new();
        if let Some(moment) = record.exact_moment {
            lines.push(format!("⏰ Daily disconnect **time**: **{moment}**"));
        }
        if let Some(window) = record.window {
            lines.push(format!("🔁 Repeating **range**: **{window}**"));
        }
        if record.utc_offset_minutes != 0 {
            lines.push(format!(
                "🌎 Timezone offset: **{:+} minutes** from UTC",
                record.utc_offset_minutes
            ));
        }
        if lines.is_empty() {
            lines.push("🌎 Timezone calibrated to UTC, no disconnect schedule set.".to_string());
        }

        respond(serenity_ctx, command, lines.join("\n")).await
    }

    /// Confirm a mutation, downgrading the reply when the settings file
    /// could not be written. The in-memory state is already updated.
    async fn confirm_mutation(
        &self,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        outcome: Result<(), ScheduleError>,
        confirmation: String,
    ) -> Result<()> {
        match outcome {
            Ok(()) => respond(serenity_ctx, command, confirmation).await,
            Err(e) => self.report_persistence_failure(serenity_ctx, command, e).await,
        }
    }

    async fn report_persistence_failure(
        &self,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        e: ScheduleError,
    ) -> Result<()> {
        match e {
            ScheduleError::PersistenceFailure { .. } => {
                error!("Settings write failed after mutation: {e}");
                respond(
                    serenity_ctx,
                    command,
                    "⚠️ Setting applied, but saving to disk failed; it will be lost if the bot restarts.",
                )
                .await
            }
            other => Err(other.into()),
        }
    }
}
