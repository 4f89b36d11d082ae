/// Crate-wide result type for ticket operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed ticket errors.
///
/// `DuplicateTicket` and `NotATicketChannel` are recovered locally by the
/// caller and shown to the user; `Platform` wraps a chat-platform failure
/// the lifecycle cannot proceed without.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requester already has an open ticket channel.
    #[error("user {requester_id} already has an open ticket (channel {channel_id})")]
    DuplicateTicket { requester_id: u64, channel_id: u64 },

    /// A close action was invoked outside a ticket channel.
    #[error("channel {channel_id} is not a ticket channel")]
    NotATicketChannel { channel_id: u64 },

    /// Wrapped chat-platform failure.
    #[error("{context}: {source}")]
    Platform {
        context: String,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    #[must_use]
    pub fn platform(context: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Platform {
            context: context.into(),
            source,
        }
    }
}
