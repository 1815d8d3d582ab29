use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use curfew::commands::{register_global_commands, register_guild_commands, CommandContext, CommandDispatcher};
use curfew::core::Config;
use curfew::features::enforcement::{DiscordGateway, EnforcementSweeper};
use curfew::features::schedule::ScheduleStore;
use curfew::ScheduleError;

struct Handler {
    dispatcher: Arc<CommandDispatcher>,
    guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Logged in as {}", ready.user.name);

        // Guild-scoped registration propagates instantly; global takes up to
        // an hour on Discord's side.
        let result = match self.guild_id {
            Some(guild_id) => register_guild_commands(&ctx, guild_id).await,
            None => register_global_commands(&ctx).await,
        };
        if let Err(e) = result {
            error!("Failed to register slash commands: {e}");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            if let Err(e) = self.dispatcher.dispatch(&ctx, &command).await {
                error!(
                    "Error handling slash command '{}': {}",
                    command.data.name, e
                );

                let _ = command
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message.content(
                                    "❌ Sorry, I encountered an error processing your command. Please try again.",
                                )
                            })
                    })
                    .await;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Curfew Discord Bot...");

    let store = match ScheduleStore::load(&config.settings_path) {
        Ok(store) => Arc::new(store),
        Err(e @ ScheduleError::LoadCorruption { .. }) => {
            error!("{e}");
            error!("Refusing to start so the corrupt settings file is not overwritten. Repair or remove it, then restart.");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    info!(
        "Loaded {} schedule record(s) from {}",
        store.len().await,
        config.settings_path.display()
    );

    // Parse guild ID if provided for development mode
    let guild_id = config
        .discord_guild_id
        .as_ref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(GuildId);

    let dispatcher = Arc::new(CommandDispatcher::new(CommandContext::new(Arc::clone(&store))));
    let handler = Handler {
        dispatcher,
        guild_id,
    };

    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS | GatewayIntents::GUILD_VOICE_STATES;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            error!("This could indicate:");
            error!("  - Invalid bot token format");
            error!("  - Network issues reaching Discord API");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    // Start the enforcement sweep against the gateway cache
    let gateway = DiscordGateway::new(
        client.cache_and_http.cache.clone(),
        client.cache_and_http.http.clone(),
    );
    let sweeper = EnforcementSweeper::new(
        store,
        gateway,
        config.sweep_interval(),
        config.tolerance_minutes(),
        config.disconnect_timeout(),
    );
    tokio::spawn(async move {
        sweeper.run().await;
    });

    // Stop the shards cleanly on ctrl-c; any in-flight disconnect carries its
    // own deadline and drains with the runtime.
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received, stopping shards...");
            shard_manager.lock().await.shutdown_all().await;
        }
    });

    info!("Bot configured successfully. Connecting to Discord gateway...");
    info!("Gateway intents: {intents:?}");

    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Client error: {e}"))?;

    Ok(())
}
