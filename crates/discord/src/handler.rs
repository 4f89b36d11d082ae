//! Discord event handler for serenity.
//!
//! Routes gateway events into the ticket core: `ready` sets up the panel,
//! `message` feeds the reply-deadline tracker, and `interaction_create`
//! drives the open/close lifecycle from the panel buttons.

use std::sync::Arc;

use {
    serenity::{
        all::{
            Colour, ComponentInteraction, Context, CreateInteractionResponse,
            CreateInteractionResponseMessage, EventHandler, GatewayIntents, GuildId, Interaction,
            Message, Ready, RoleId,
        },
        async_trait,
    },
    tracing::{debug, error, info, warn},
};

use {
    deskbot_config::ConfigHandle,
    deskbot_tickets::{
        is_ticket_channel, ArchiveSink, Error, InboundMessage, ReplyDeadlineTracker,
        TicketLifecycle, TicketRegistry,
    },
};

use crate::{panel, platform::SerenityPlatform, ui};

/// Handler for Discord gateway events.
pub struct TicketHandler {
    store: Arc<ConfigHandle>,
    registry: Arc<TicketRegistry>,
    tracker: ReplyDeadlineTracker,
    archive: Arc<dyn ArchiveSink>,
}

impl TicketHandler {
    #[must_use]
    pub fn new(
        store: Arc<ConfigHandle>,
        registry: Arc<TicketRegistry>,
        archive: Arc<dyn ArchiveSink>,
    ) -> Self {
        let tracker = ReplyDeadlineTracker::new(Arc::clone(&registry));
        Self {
            store,
            registry,
            tracker,
            archive,
        }
    }

    /// Required gateway intents for the bot.
    #[must_use]
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }

    fn staff_role(&self) -> RoleId {
        RoleId::new(self.store.get().staff_role_id)
    }

    fn lifecycle(&self, ctx: &Context, guild_id: GuildId) -> TicketLifecycle<SerenityPlatform> {
        let platform = SerenityPlatform::new(Arc::clone(&ctx.http), guild_id, self.staff_role());
        TicketLifecycle::new(platform, Arc::clone(&self.registry), Arc::clone(&self.archive))
    }

    async fn respond(
        &self,
        ctx: &Context,
        component: &ComponentInteraction,
        message: CreateInteractionResponseMessage,
    ) {
        if let Err(e) = component
            .create_response(&ctx.http, CreateInteractionResponse::Message(message))
            .await
        {
            warn!(error = %e, "failed to acknowledge interaction");
        }
    }

    async fn handle_create(&self, ctx: &Context, component: &ComponentInteraction) {
        let Some(guild_id) = component.guild_id else {
            return;
        };

        let response = match self.lifecycle(ctx, guild_id).open(component.user.id.get()).await {
            Ok(ticket) => ui::notice(
                Colour::DARK_GREEN,
                &format!("Your ticket has been created: <#{}>", ticket.channel_id),
            ),
            Err(Error::DuplicateTicket { .. }) => {
                ui::notice(Colour::GOLD, "You already have an open ticket!")
            },
            Err(e) => {
                error!(user = %component.user.id, error = %e, "ticket creation failed");
                ui::notice(Colour::RED, "Failed to create ticket.")
            },
        };
        self.respond(ctx, component, response).await;
    }

    async fn handle_close(&self, ctx: &Context, component: &ComponentInteraction) {
        // When the channel cannot be resolved it is likely mid-deletion from
        // a racing close; let the lifecycle no-op on it.
        if let Ok(channel) = component.channel_id.to_channel(ctx).await {
            let channel_name = channel.guild().map(|c| c.name).unwrap_or_default();
            if !is_ticket_channel(&channel_name) {
                self.respond(
                    ctx,
                    component,
                    CreateInteractionResponseMessage::new()
                        .content("This button can only be used inside ticket channels.")
                        .ephemeral(true),
                )
                .await;
                return;
            }
        }

        // Acknowledge before teardown: the channel this interaction lives in
        // is about to be deleted.
        self.respond(ctx, component, ui::notice(Colour::ORANGE, "Closing ticket..."))
            .await;

        let Some(guild_id) = component.guild_id else {
            return;
        };
        match self
            .lifecycle(ctx, guild_id)
            .close(component.channel_id.get(), &component.user.tag())
            .await
        {
            Ok(report) => debug!(
                channel_id = report.channel_id,
                archived = report.archive.url().is_some(),
                channel_deleted = report.channel_deleted,
                "close finished"
            ),
            Err(e) => warn!(channel = %component.channel_id, error = %e, "close failed"),
        }
    }
}

#[async_trait]
impl EventHandler for TicketHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "discord bot ready"
        );

        // Best-effort panel setup; the bot keeps running without one.
        if let Err(e) = panel::ensure_panel(&ctx.http, &self.store).await {
            warn!(error = %e, "failed to set up ticket panel");
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Bot messages never affect the SLA.
        if msg.author.bot {
            return;
        }
        let Some(guild_id) = msg.guild_id else {
            return;
        };

        let channel_name = match msg.channel_id.to_channel(&ctx).await {
            Ok(channel) => match channel.guild() {
                Some(guild_channel) => guild_channel.name,
                None => return,
            },
            Err(e) => {
                debug!(channel = %msg.channel_id, error = %e, "could not resolve channel");
                return;
            },
        };
        if !is_ticket_channel(&channel_name) {
            return;
        }

        let is_staff = match guild_id.member(&ctx.http, msg.author.id).await {
            Ok(member) => member.roles.contains(&self.staff_role()),
            Err(e) => {
                debug!(user = %msg.author.id, error = %e, "could not resolve member, ignoring message");
                return;
            },
        };

        self.tracker.observe(&InboundMessage {
            channel_id: msg.channel_id.get(),
            channel_name: &channel_name,
            author_id: msg.author.id.get(),
            author_is_bot: false,
            author_is_staff: is_staff,
        });
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Component(component) = interaction else {
            return;
        };

        match component.data.custom_id.as_str() {
            ui::CREATE_TICKET_ID => self.handle_create(&ctx, &component).await,
            ui::CLOSE_TICKET_ID => self.handle_close(&ctx, &component).await,
            _ => {},
        }
    }
}
