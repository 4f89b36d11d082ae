//! Ticket lifecycle core for deskbot.
//!
//! Platform-agnostic state machine for support tickets: open/close
//! transitions, the staff-reply deadline registry, and transcript assembly.
//! The chat platform and the transcript archive are abstract collaborators
//! (`ChatPlatform`, `ArchiveSink`) implemented elsewhere.

pub mod archive;
pub mod error;
pub mod lifecycle;
pub mod naming;
pub mod platform;
pub mod registry;
pub mod tracker;
pub mod transcript;

pub use {
    archive::ArchiveSink,
    error::{Error, Result},
    lifecycle::{ArchiveOutcome, CloseReport, Ticket, TicketLifecycle, TicketState},
    naming::{is_ticket_channel, requester_from_name, ticket_channel_name},
    platform::{ChatPlatform, CloseNotice},
    registry::{ReplyDeadline, TicketRegistry, STAFF_REPLY_SLA_MS},
    tracker::{InboundMessage, ReplyDeadlineTracker},
    transcript::{Transcript, TranscriptMessage, MAX_TRANSCRIPT_MESSAGES},
};
