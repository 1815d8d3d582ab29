//! # Presence Gateway
//!
//! The enforcement sweep's view of the platform: which communities the bot
//! is in, who is connected to voice, and how to disconnect someone. The
//! trait keeps the sweep testable without a Discord connection.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false

use anyhow::Result;
use async_trait::async_trait;
use serenity::cache::Cache;
use serenity::http::Http;
use serenity::model::id::{GuildId, UserId};
use std::sync::Arc;

/// A guild the bot is connected to.
pub type CommunityId = u64;

/// A human participant in a community.
pub type ParticipantId = u64;

/// Presence and disconnect operations consumed by the enforcement sweep.
#[async_trait]
pub trait PresenceGateway: Send + Sync + 'static {
    /// Communities currently visible to the process.
    fn communities(&self) -> Vec<CommunityId>;

    /// Participants currently connected to voice in a community, excluding
    /// automated accounts.
    fn connected_participants(&self, community: CommunityId) -> Vec<ParticipantId>;

    /// Disconnect one participant from voice. Safe to call on someone who
    /// already left; such a call fails harmlessly.
    async fn disconnect(&self, community: CommunityId, participant: ParticipantId) -> Result<()>;
}

/// Production gateway over the serenity cache and HTTP client.
pub struct DiscordGateway {
    cache: Arc<Cache>,
    http: Arc<Http>,
}

impl DiscordGateway {
    pub fn new(cache: Arc<Cache>, http: Arc<Http>) -> Self {
        DiscordGateway { cache, http }
    }
}

#[async_trait]
impl PresenceGateway for DiscordGateway {
    fn communities(&self) -> Vec<CommunityId> {
        self.cache.guilds().into_iter().map(|guild| guild.0).collect()
    }

    fn connected_participants(&self, community: CommunityId) -> Vec<ParticipantId> {
        let guild = match self.cache.guild(GuildId(community)) {
            Some(guild) => guild,
            None => return Vec::new(),
        };

        guild
            .voice_states
            .iter()
            .filter(|(_, state)| state.channel_id.is_some())
            .filter(|(user_id, _)| {
                !guild
                    .members
                    .get(user_id)
                    .map(|member| member.user.bot)
                    .unwrap_or(false)
            })
            .map(|(user_id, _)| user_id.0)
            .collect()
    }

    async fn disconnect(&self, community: CommunityId, participant: ParticipantId) -> Result<()> {
        GuildId(community)
            .edit_member(&self.http, UserId(participant), |member| {
                member.disconnect_member()
            })
            .await?;
        Ok(())
    }
}
