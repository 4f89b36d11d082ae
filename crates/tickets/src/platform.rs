//! Abstract chat-platform contract consumed by the lifecycle.

use async_trait::async_trait;

use crate::transcript::TranscriptMessage;

/// Contents of the private closing notice sent to the requester.
#[derive(Debug, Clone)]
pub struct CloseNotice {
    pub channel_name: String,
    /// Display tag of whoever closed the ticket.
    pub closed_by: String,
    /// Archived transcript URL, when the upload succeeded.
    pub log_url: Option<String>,
}

/// What the ticket lifecycle needs from the chat platform.
///
/// One implementation backs a real Discord guild; tests use an in-memory
/// fake. Every method is a single platform call with the transport's
/// inherent timeout; failures are surfaced as errors and degraded by the
/// caller, never retried here.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Exact-name lookup among the guild's channels.
    async fn find_channel(&self, name: &str) -> anyhow::Result<Option<u64>>;

    /// Create a private text channel visible only to the requester and the
    /// staff role, with `topic` stored as durable channel metadata.
    /// Returns the new channel id.
    async fn create_private_channel(
        &self,
        name: &str,
        topic: &str,
        requester_id: u64,
    ) -> anyhow::Result<u64>;

    /// Post the welcome message carrying the close action.
    async fn post_welcome(&self, channel_id: u64, requester_id: u64) -> anyhow::Result<()>;

    /// Name of an existing channel. Errors when the channel is gone.
    async fn channel_name(&self, channel_id: u64) -> anyhow::Result<String>;

    /// Requester id recorded in the channel's topic, if still readable.
    async fn channel_topic_requester(&self, channel_id: u64) -> anyhow::Result<Option<u64>>;

    /// Most recent messages, up to `limit`, in whatever order the platform
    /// returns them.
    async fn recent_messages(
        &self,
        channel_id: u64,
        limit: usize,
    ) -> anyhow::Result<Vec<TranscriptMessage>>;

    /// Privately notify a user that their ticket was closed.
    async fn send_close_summary(&self, user_id: u64, notice: &CloseNotice) -> anyhow::Result<()>;

    /// Delete the channel, with an audit reason.
    async fn delete_channel(&self, channel_id: u64, reason: &str) -> anyhow::Result<()>;
}
