//! Create-or-fetch of the persistent "Open Ticket" panel.

use std::sync::Arc;

use {
    serenity::all::{ChannelId, Http, MessageId},
    tracing::{debug, info},
};

use deskbot_config::ConfigHandle;

use crate::ui;

/// Ensure the ticket panel exists in the configured channel.
///
/// Reuses the recorded panel message when it is still live; otherwise posts
/// a fresh one and persists its id. Best-effort: callers log failures and
/// keep running without a panel.
pub async fn ensure_panel(http: &Arc<Http>, store: &ConfigHandle) -> anyhow::Result<()> {
    let config = store.get();
    if config.panel_channel_id == 0 {
        anyhow::bail!("panel_channel_id is not configured");
    }
    let channel_id = ChannelId::new(config.panel_channel_id);

    if let Some(message_id) = config.panel_message_id {
        if channel_id
            .message(http, MessageId::new(message_id))
            .await
            .is_ok()
        {
            debug!(message_id, "ticket panel already in place");
            return Ok(());
        }
        // Panel message was deleted; fall through and post a new one.
    }

    let message = channel_id.send_message(http, ui::panel_message()).await?;
    store.record_panel_message(message.id.get())?;
    info!(channel = %channel_id, message = %message.id, "ticket panel posted");
    Ok(())
}
