//! Observes conversation events and keeps the deadline registry current.

use std::sync::Arc;

use tracing::debug;

use crate::{
    naming::is_ticket_channel,
    registry::{ReplyDeadline, TicketRegistry, STAFF_REPLY_SLA_MS},
};

/// An inbound message as seen by the tracker. Staffness is resolved by the
/// platform layer before the message gets here.
#[derive(Debug, Clone, Copy)]
pub struct InboundMessage<'a> {
    pub channel_id: u64,
    pub channel_name: &'a str,
    pub author_id: u64,
    pub author_is_bot: bool,
    pub author_is_staff: bool,
}

/// Updates reply deadlines from ticket-channel traffic.
///
/// A staff reply starts the 24h response window for the requester; a
/// requester (or any non-staff) reply clears it. Bot-authored messages and
/// messages outside ticket channels never affect the SLA. The tracker only
/// records deadlines; nothing consumes expiry.
pub struct ReplyDeadlineTracker {
    registry: Arc<TicketRegistry>,
}

impl ReplyDeadlineTracker {
    #[must_use]
    pub fn new(registry: Arc<TicketRegistry>) -> Self {
        Self { registry }
    }

    /// Record a message using the wall clock.
    pub fn observe(&self, message: &InboundMessage<'_>) {
        self.observe_at(message, now_ms());
    }

    /// Record a message at an explicit timestamp (unix ms).
    pub fn observe_at(&self, message: &InboundMessage<'_>, now_ms: i64) {
        if message.author_is_bot || !is_ticket_channel(message.channel_name) {
            return;
        }

        if message.author_is_staff {
            let due_at = now_ms + STAFF_REPLY_SLA_MS;
            self.registry
                .set(message.channel_id, ReplyDeadline::DueAt(due_at));
            debug!(
                channel_id = message.channel_id,
                author_id = message.author_id,
                due_at,
                "staff replied, reply deadline set"
            );
        } else {
            self.registry.clear(message.channel_id);
            debug!(
                channel_id = message.channel_id,
                author_id = message.author_id,
                "requester replied, reply deadline cleared"
            );
        }
    }
}

/// Current unix time in milliseconds.
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(channel_name: &str, is_bot: bool, is_staff: bool) -> InboundMessage<'_> {
        InboundMessage {
            channel_id: 42,
            channel_name,
            author_id: 7,
            author_is_bot: is_bot,
            author_is_staff: is_staff,
        }
    }

    #[test]
    fn staff_reply_sets_deadline_24h_out() {
        let registry = Arc::new(TicketRegistry::new());
        let tracker = ReplyDeadlineTracker::new(Arc::clone(&registry));

        tracker.observe_at(&message("ticket-7", false, true), 0);
        assert_eq!(registry.get(42), Some(ReplyDeadline::DueAt(86_400_000)));
    }

    #[test]
    fn staff_reply_overwrites_any_prior_deadline() {
        let registry = Arc::new(TicketRegistry::new());
        let tracker = ReplyDeadlineTracker::new(Arc::clone(&registry));

        registry.set(42, ReplyDeadline::DueAt(1));
        tracker.observe_at(&message("ticket-7", false, true), 10_000);
        assert_eq!(
            registry.get(42),
            Some(ReplyDeadline::DueAt(10_000 + STAFF_REPLY_SLA_MS))
        );
    }

    #[test]
    fn requester_reply_clears_deadline() {
        let registry = Arc::new(TicketRegistry::new());
        let tracker = ReplyDeadlineTracker::new(Arc::clone(&registry));

        tracker.observe_at(&message("ticket-7", false, true), 0);
        tracker.observe_at(&message("ticket-7", false, false), 1000);
        assert_eq!(registry.get(42), Some(ReplyDeadline::Cleared));
    }

    #[test]
    fn bot_messages_are_ignored() {
        let registry = Arc::new(TicketRegistry::new());
        let tracker = ReplyDeadlineTracker::new(Arc::clone(&registry));

        registry.set(42, ReplyDeadline::Unset);
        tracker.observe_at(&message("ticket-7", true, true), 0);
        assert_eq!(registry.get(42), Some(ReplyDeadline::Unset));
    }

    #[test]
    fn non_ticket_channels_are_ignored() {
        let registry = Arc::new(TicketRegistry::new());
        let tracker = ReplyDeadlineTracker::new(Arc::clone(&registry));

        tracker.observe_at(&message("general", false, true), 0);
        assert_eq!(registry.get(42), None);
        assert!(registry.is_empty());
    }
}
