//! The `ticket-<user id>` channel-name convention.
//!
//! The name doubles as the uniqueness key: a requester can have at most one
//! channel with their name at a time, so the lookup-before-create check in
//! the lifecycle enforces the one-open-ticket invariant.

/// Prefix shared by every ticket channel name.
pub const TICKET_CHANNEL_PREFIX: &str = "ticket-";

/// Canonical channel name for a requester's ticket.
#[must_use]
pub fn ticket_channel_name(requester_id: u64) -> String {
    format!("{TICKET_CHANNEL_PREFIX}{requester_id}")
}

/// Whether a channel name follows the ticket naming convention.
#[must_use]
pub fn is_ticket_channel(name: &str) -> bool {
    name.starts_with(TICKET_CHANNEL_PREFIX)
}

/// Requester id encoded in a ticket channel name, if well-formed.
#[must_use]
pub fn requester_from_name(name: &str) -> Option<u64> {
    name.strip_prefix(TICKET_CHANNEL_PREFIX)?.parse().ok()
}
