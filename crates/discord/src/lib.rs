//! Discord plumbing for deskbot.
//!
//! Implements the serenity `EventHandler` that routes panel buttons and
//! ticket-channel messages into the lifecycle core, plus the
//! `ChatPlatform` implementation backed by one guild.

pub mod handler;
pub mod panel;
pub mod platform;
pub mod ui;

pub use {handler::TicketHandler, platform::SerenityPlatform};

use serenity::all::Client;

/// Connect to the gateway and run the bot until it stops.
pub async fn run(token: &str, handler: TicketHandler) -> anyhow::Result<()> {
    let mut client = Client::builder(token, TicketHandler::intents())
        .event_handler(handler)
        .await?;
    client.start().await?;
    Ok(())
}
