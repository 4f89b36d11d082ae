//! Open/close transitions for support tickets.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    archive::ArchiveSink,
    error::{Error, Result},
    naming::{is_ticket_channel, requester_from_name, ticket_channel_name},
    platform::{ChatPlatform, CloseNotice},
    registry::{ReplyDeadline, TicketRegistry},
    transcript::{Transcript, MAX_TRANSCRIPT_MESSAGES},
};

/// Lifecycle state of a ticket.
///
/// Only [`Open`](Self::Open) tickets are held in memory; the terminal
/// states describe how far a close got and are reported via
/// [`CloseReport::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketState {
    Open,
    /// A close was accepted but the channel still exists (deletion failed).
    Closing,
    /// Archived and destroyed. The channel no longer exists.
    Closed,
}

/// Descriptor of one support case.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub channel_id: u64,
    pub requester_id: u64,
    pub state: TicketState,
}

/// What happened to the transcript during a close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// No messages in the channel; nothing to upload.
    SkippedEmpty,
    Uploaded { url: String },
    /// Fetch or upload failed; the close continued without a log link.
    Failed,
}

impl ArchiveOutcome {
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Uploaded { url } => Some(url),
            Self::SkippedEmpty | Self::Failed => None,
        }
    }
}

/// Per-step outcome of a close. Every step is best-effort: a failed step is
/// recorded here and logged, and the remaining steps still run.
#[derive(Debug, Clone)]
pub struct CloseReport {
    pub channel_id: u64,
    pub state: TicketState,
    pub archive: ArchiveOutcome,
    pub notified_requester: bool,
    pub channel_deleted: bool,
}

impl CloseReport {
    fn noop(channel_id: u64) -> Self {
        Self {
            channel_id,
            state: TicketState::Closed,
            archive: ArchiveOutcome::SkippedEmpty,
            notified_requester: false,
            channel_deleted: false,
        }
    }
}

/// Orchestrates ticket create/close transitions.
///
/// Sole writer of channel existence; the registry is shared with the
/// [`ReplyDeadlineTracker`](crate::tracker::ReplyDeadlineTracker).
pub struct TicketLifecycle<P> {
    platform: P,
    registry: Arc<TicketRegistry>,
    archive: Arc<dyn ArchiveSink>,
}

impl<P: ChatPlatform> TicketLifecycle<P> {
    pub fn new(platform: P, registry: Arc<TicketRegistry>, archive: Arc<dyn ArchiveSink>) -> Self {
        Self {
            platform,
            registry,
            archive,
        }
    }

    /// Open a ticket for `requester_id`.
    ///
    /// Fails with [`Error::DuplicateTicket`] when the requester already has
    /// an open ticket channel. The existence check runs immediately before
    /// creation; when two opens race past it, the losing create is resolved
    /// by re-checking for the winner's channel.
    pub async fn open(&self, requester_id: u64) -> Result<Ticket> {
        let name = ticket_channel_name(requester_id);

        if let Some(channel_id) = self
            .platform
            .find_channel(&name)
            .await
            .map_err(|e| Error::platform("looking up existing ticket", e))?
        {
            return Err(Error::DuplicateTicket {
                requester_id,
                channel_id,
            });
        }

        let channel_id = match self
            .platform
            .create_private_channel(&name, &requester_id.to_string(), requester_id)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                // A racing open may have won between the check and the create.
                if let Ok(Some(existing)) = self.platform.find_channel(&name).await {
                    return Err(Error::DuplicateTicket {
                        requester_id,
                        channel_id: existing,
                    });
                }
                return Err(Error::platform("creating ticket channel", e));
            },
        };

        self.registry.set(channel_id, ReplyDeadline::Unset);

        if let Err(e) = self.platform.post_welcome(channel_id, requester_id).await {
            warn!(channel_id, error = %e, "failed to post welcome message");
        }

        info!(channel_id, requester_id, channel = %name, "ticket opened");
        Ok(Ticket {
            channel_id,
            requester_id,
            state: TicketState::Open,
        })
    }

    /// Close the ticket in `channel_id`.
    ///
    /// Fails with [`Error::NotATicketChannel`] when the channel exists but
    /// is not a ticket channel. Every teardown step is best-effort; the
    /// registry entry is removed unconditionally at the end, so a second
    /// concurrent close finds nothing and no-ops.
    pub async fn close(&self, channel_id: u64, closed_by: &str) -> Result<CloseReport> {
        let name = match self.platform.channel_name(channel_id).await {
            Ok(name) => name,
            Err(e) => {
                // A concurrent close may already have deleted the channel.
                debug!(channel_id, error = %e, "close target unavailable, treating as already closed");
                self.registry.remove(channel_id);
                return Ok(CloseReport::noop(channel_id));
            },
        };
        if !is_ticket_channel(&name) {
            return Err(Error::NotATicketChannel { channel_id });
        }

        let archive = self.archive_transcript(channel_id, &name).await;

        let notified_requester = self
            .notify_requester(channel_id, &name, closed_by, archive.url())
            .await;

        let channel_deleted = match self.platform.delete_channel(channel_id, "Ticket closed").await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(channel_id, error = %e, "failed to delete ticket channel");
                false
            },
        };

        self.registry.remove(channel_id);

        info!(
            channel_id,
            channel = %name,
            closed_by,
            archived = archive.url().is_some(),
            notified_requester,
            channel_deleted,
            "ticket closed"
        );
        Ok(CloseReport {
            channel_id,
            state: if channel_deleted {
                TicketState::Closed
            } else {
                TicketState::Closing
            },
            archive,
            notified_requester,
            channel_deleted,
        })
    }

    async fn archive_transcript(&self, channel_id: u64, name: &str) -> ArchiveOutcome {
        let messages = match self
            .platform
            .recent_messages(channel_id, MAX_TRANSCRIPT_MESSAGES)
            .await
        {
            Ok(messages) => messages,
            Err(e) => {
                warn!(channel_id, error = %e, "failed to fetch transcript");
                return ArchiveOutcome::Failed;
            },
        };

        let transcript = Transcript::from_recent(name, messages);
        if transcript.is_empty() {
            debug!(channel_id, "empty transcript, skipping archival");
            return ArchiveOutcome::SkippedEmpty;
        }

        match self
            .archive
            .upload(&transcript.title(), &transcript.render())
            .await
        {
            Ok(url) => ArchiveOutcome::Uploaded { url },
            Err(e) => {
                warn!(channel_id, error = %e, "transcript upload failed");
                ArchiveOutcome::Failed
            },
        }
    }

    async fn notify_requester(
        &self,
        channel_id: u64,
        channel_name: &str,
        closed_by: &str,
        log_url: Option<&str>,
    ) -> bool {
        // The topic is the source of truth; fall back to the id encoded in
        // the channel name when the topic was edited away.
        let requester_id = match self.platform.channel_topic_requester(channel_id).await {
            Ok(Some(id)) => id,
            Ok(None) => match requester_from_name(channel_name) {
                Some(id) => {
                    debug!(channel_id, requester_id = id, "requester recovered from channel name");
                    id
                },
                None => {
                    debug!(channel_id, "no requester recorded on channel, skipping close notice");
                    return false;
                },
            },
            Err(e) => {
                warn!(channel_id, error = %e, "failed to resolve requester from channel");
                return false;
            },
        };

        let notice = CloseNotice {
            channel_name: channel_name.to_string(),
            closed_by: closed_by.to_string(),
            log_url: log_url.map(String::from),
        };
        match self.platform.send_close_summary(requester_id, &notice).await {
            Ok(()) => true,
            Err(e) => {
                warn!(channel_id, requester_id, error = %e, "failed to send close notice");
                false
            },
        }
    }
}
