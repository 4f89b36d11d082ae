//! `ChatPlatform` backed by one Discord guild.

use std::sync::Arc;

use {
    anyhow::anyhow,
    async_trait::async_trait,
    serenity::all::{
        ChannelId, ChannelType, CreateChannel, GetMessages, GuildId, Http, PermissionOverwrite,
        PermissionOverwriteType, Permissions, RoleId, UserId,
    },
};

use deskbot_tickets::{ChatPlatform, CloseNotice, TranscriptMessage};

use crate::ui;

/// Capabilities granted to the requester and the staff role inside a
/// ticket channel. Everyone else is denied `VIEW_CHANNEL`.
const TICKET_MEMBER_ALLOW: Permissions = Permissions::VIEW_CHANNEL
    .union(Permissions::SEND_MESSAGES)
    .union(Permissions::READ_MESSAGE_HISTORY);

/// Milliseconds between the unix epoch and Discord's snowflake epoch.
const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// Creation time encoded in a snowflake id, unix ms.
#[must_use]
pub fn snowflake_ms(id: u64) -> i64 {
    ((id >> 22) + DISCORD_EPOCH_MS) as i64
}

/// One guild's view of the chat platform.
pub struct SerenityPlatform {
    http: Arc<Http>,
    guild_id: GuildId,
    staff_role_id: RoleId,
}

impl SerenityPlatform {
    #[must_use]
    pub fn new(http: Arc<Http>, guild_id: GuildId, staff_role_id: RoleId) -> Self {
        Self {
            http,
            guild_id,
            staff_role_id,
        }
    }

    async fn guild_channel_name(&self, channel_id: u64) -> anyhow::Result<String> {
        let channel = self.http.get_channel(ChannelId::new(channel_id)).await?;
        channel
            .guild()
            .map(|c| c.name)
            .ok_or_else(|| anyhow!("channel {channel_id} is not a guild channel"))
    }
}

#[async_trait]
impl ChatPlatform for SerenityPlatform {
    async fn find_channel(&self, name: &str) -> anyhow::Result<Option<u64>> {
        let channels = self.guild_id.channels(&self.http).await?;
        Ok(channels
            .values()
            .find(|c| c.name == name)
            .map(|c| c.id.get()))
    }

    async fn create_private_channel(
        &self,
        name: &str,
        topic: &str,
        requester_id: u64,
    ) -> anyhow::Result<u64> {
        // @everyone carries the guild's id.
        let everyone = RoleId::new(self.guild_id.get());
        let overwrites = vec![
            PermissionOverwrite {
                allow: Permissions::empty(),
                deny: Permissions::VIEW_CHANNEL,
                kind: PermissionOverwriteType::Role(everyone),
            },
            PermissionOverwrite {
                allow: TICKET_MEMBER_ALLOW,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Member(UserId::new(requester_id)),
            },
            PermissionOverwrite {
                allow: TICKET_MEMBER_ALLOW,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Role(self.staff_role_id),
            },
        ];

        let channel = self
            .guild_id
            .create_channel(
                &self.http,
                CreateChannel::new(name)
                    .kind(ChannelType::Text)
                    .topic(topic)
                    .permissions(overwrites),
            )
            .await?;
        Ok(channel.id.get())
    }

    async fn post_welcome(&self, channel_id: u64, requester_id: u64) -> anyhow::Result<()> {
        ChannelId::new(channel_id)
            .send_message(&self.http, ui::welcome_message(UserId::new(requester_id)))
            .await?;
        Ok(())
    }

    async fn channel_name(&self, channel_id: u64) -> anyhow::Result<String> {
        self.guild_channel_name(channel_id).await
    }

    async fn channel_topic_requester(&self, channel_id: u64) -> anyhow::Result<Option<u64>> {
        let channel = self.http.get_channel(ChannelId::new(channel_id)).await?;
        Ok(channel
            .guild()
            .and_then(|c| c.topic)
            .and_then(|topic| topic.parse().ok()))
    }

    async fn recent_messages(
        &self,
        channel_id: u64,
        limit: usize,
    ) -> anyhow::Result<Vec<TranscriptMessage>> {
        let limit = limit.min(usize::from(u8::MAX)) as u8;
        let messages = ChannelId::new(channel_id)
            .messages(&self.http, GetMessages::new().limit(limit))
            .await?;
        Ok(messages
            .into_iter()
            .map(|m| TranscriptMessage {
                // Snowflakes carry ms precision; Timestamp only exposes seconds.
                sent_at_ms: snowflake_ms(m.id.get()),
                author: m.author.tag(),
                content: m.content,
            })
            .collect())
    }

    async fn send_close_summary(&self, user_id: u64, notice: &CloseNotice) -> anyhow::Result<()> {
        let dm = UserId::new(user_id).create_dm_channel(&self.http).await?;
        dm.id
            .send_message(&self.http, ui::close_summary_message(notice))
            .await?;
        Ok(())
    }

    async fn delete_channel(&self, channel_id: u64, reason: &str) -> anyhow::Result<()> {
        self.http
            .delete_channel(ChannelId::new(channel_id), Some(reason))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_decodes_to_discord_epoch() {
        assert_eq!(snowflake_ms(0), 1_420_070_400_000);
        // One tick of the timestamp field is one millisecond.
        assert_eq!(snowflake_ms(1 << 22), 1_420_070_400_001);
    }
}
