//! Embed and button builders for the user-facing surface.

use serenity::all::{
    ButtonStyle, Colour, CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter,
    CreateInteractionResponseMessage, CreateMessage, Timestamp, UserId,
};

use deskbot_tickets::CloseNotice;

/// Component id of the panel's "Open Ticket" button.
pub const CREATE_TICKET_ID: &str = "create_ticket";
/// Component id of the in-channel "Close Ticket" button.
pub const CLOSE_TICKET_ID: &str = "close_ticket";

/// The persistent ticket panel: embed plus the open-ticket button.
#[must_use]
pub fn panel_message() -> CreateMessage {
    let embed = CreateEmbed::new()
        .title("🎟️ Create a Ticket")
        .description("Click the button below to open a support ticket.")
        .colour(Colour::BLUE)
        .footer(CreateEmbedFooter::new("Tickets Panel"));
    let button = CreateButton::new(CREATE_TICKET_ID)
        .label("Open Ticket")
        .style(ButtonStyle::Primary);
    CreateMessage::new()
        .embed(embed)
        .components(vec![CreateActionRow::Buttons(vec![button])])
}

/// Welcome message posted into a fresh ticket channel.
#[must_use]
pub fn welcome_message(requester_id: UserId) -> CreateMessage {
    let embed = CreateEmbed::new()
        .title("Ticket Created")
        .description(format!(
            "Hello <@{requester_id}>! A staff member will be with you shortly."
        ))
        .colour(Colour::DARK_GREEN);
    let button = CreateButton::new(CLOSE_TICKET_ID)
        .label("Close Ticket")
        .style(ButtonStyle::Danger);
    CreateMessage::new()
        .embed(embed)
        .components(vec![CreateActionRow::Buttons(vec![button])])
}

/// Ephemeral acknowledgement shown only to the interacting user.
#[must_use]
pub fn notice(colour: Colour, text: &str) -> CreateInteractionResponseMessage {
    CreateInteractionResponseMessage::new()
        .embed(CreateEmbed::new().colour(colour).description(text))
        .ephemeral(true)
}

/// Private closing summary sent to the requester.
#[must_use]
pub fn close_summary_message(notice: &CloseNotice) -> CreateMessage {
    let mut embed = CreateEmbed::new()
        .title("Your Ticket Has Been Closed")
        .colour(Colour::RED)
        .description(format!(
            "Your ticket **#{}** was closed by **{}**.",
            notice.channel_name, notice.closed_by
        ))
        .timestamp(Timestamp::now());
    if let Some(url) = &notice.log_url {
        embed = embed.field("Ticket Log", format!("[View Log]({url})"), false);
    }
    CreateMessage::new().embed(embed)
}
