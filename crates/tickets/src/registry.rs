//! In-memory map of ticket channel → staff-reply deadline.
//!
//! The registry is the only mutable shared state in the crate. All
//! operations are synchronous map accesses and are never held across an
//! await point, so a plain `RwLock` is enough.

use std::{
    collections::HashMap,
    sync::RwLock,
};

/// How long a requester has to answer after staff last spoke.
pub const STAFF_REPLY_SLA_MS: i64 = 24 * 60 * 60 * 1000;

/// SLA state for one open ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyDeadline {
    /// Ticket just opened; staff has not spoken yet.
    Unset,
    /// The requester answered; no deadline pending.
    Cleared,
    /// The requester is expected to reply by this timestamp (unix ms).
    DueAt(i64),
}

impl ReplyDeadline {
    /// Whether the deadline has lapsed at `now_ms`.
    ///
    /// Nothing currently consumes expiry; this exists for future sweeps.
    #[must_use]
    pub fn is_due(&self, now_ms: i64) -> bool {
        matches!(self, Self::DueAt(at) if *at <= now_ms)
    }
}

/// Registry of reply deadlines, keyed by ticket channel id.
///
/// An entry exists exactly while its ticket is open; `remove` is called
/// only when the ticket is destroyed.
#[derive(Debug, Default)]
pub struct TicketRegistry {
    entries: RwLock<HashMap<u64, ReplyDeadline>>,
}

impl TicketRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or overwrite the deadline for a channel.
    pub fn set(&self, channel_id: u64, deadline: ReplyDeadline) {
        self.write().insert(channel_id, deadline);
    }

    /// Mark the channel's deadline as cleared while the ticket stays open.
    pub fn clear(&self, channel_id: u64) {
        self.write().insert(channel_id, ReplyDeadline::Cleared);
    }

    /// Drop the channel's entry entirely. Used only at ticket destruction.
    /// Returns whether an entry was present.
    pub fn remove(&self, channel_id: u64) -> bool {
        self.write().remove(&channel_id).is_some()
    }

    #[must_use]
    pub fn get(&self, channel_id: u64) -> Option<ReplyDeadline> {
        self.read().get(&channel_id).copied()
    }

    /// Number of tracked tickets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<u64, ReplyDeadline>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<u64, ReplyDeadline>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_existing_deadline() {
        let registry = TicketRegistry::new();
        registry.set(1, ReplyDeadline::Unset);
        registry.set(1, ReplyDeadline::DueAt(5000));
        assert_eq!(registry.get(1), Some(ReplyDeadline::DueAt(5000)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn clear_keeps_the_entry() {
        let registry = TicketRegistry::new();
        registry.set(1, ReplyDeadline::DueAt(5000));
        registry.clear(1);
        assert_eq!(registry.get(1), Some(ReplyDeadline::Cleared));
    }

    #[test]
    fn remove_deletes_the_entry() {
        let registry = TicketRegistry::new();
        registry.set(1, ReplyDeadline::Unset);
        assert!(registry.remove(1));
        assert_eq!(registry.get(1), None);
        assert!(!registry.remove(1));
    }

    #[test]
    fn due_only_when_deadline_lapsed() {
        assert!(!ReplyDeadline::Unset.is_due(i64::MAX));
        assert!(!ReplyDeadline::Cleared.is_due(i64::MAX));
        assert!(!ReplyDeadline::DueAt(100).is_due(99));
        assert!(ReplyDeadline::DueAt(100).is_due(100));
    }
}
