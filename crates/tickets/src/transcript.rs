//! Chronological export of a ticket channel, produced at close time.

use chrono::{DateTime, SecondsFormat};

/// Upper bound on messages included in a transcript.
pub const MAX_TRANSCRIPT_MESSAGES: usize = 100;

/// One archived line of a ticket conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptMessage {
    /// Creation time, unix ms.
    pub sent_at_ms: i64,
    /// Display tag of the author.
    pub author: String,
    pub content: String,
}

/// Ordered transcript of a ticket channel.
#[derive(Debug, Clone)]
pub struct Transcript {
    channel_name: String,
    messages: Vec<TranscriptMessage>,
}

impl Transcript {
    /// Build from messages as the platform returns them (typically newest
    /// first). Reorders ascending by creation time and keeps at most the
    /// most recent [`MAX_TRANSCRIPT_MESSAGES`].
    #[must_use]
    pub fn from_recent(channel_name: impl Into<String>, mut messages: Vec<TranscriptMessage>) -> Self {
        messages.sort_by_key(|m| m.sent_at_ms);
        if messages.len() > MAX_TRANSCRIPT_MESSAGES {
            let excess = messages.len() - MAX_TRANSCRIPT_MESSAGES;
            messages.drain(..excess);
        }
        Self {
            channel_name: channel_name.into(),
            messages,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Display name used for the archived paste.
    #[must_use]
    pub fn title(&self) -> String {
        format!("Ticket Log - {}", self.channel_name)
    }

    /// Render the transcript as plain text, one line per message.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("Ticket Log - Channel: #{}\n\n", self.channel_name);
        for message in &self.messages {
            out.push_str(&format!(
                "[{}] {}: {}\n",
                format_timestamp(message.sent_at_ms),
                message.author,
                message.content
            ));
        }
        out
    }
}

fn format_timestamp(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| ms.to_string())
}
