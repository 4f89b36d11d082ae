//! Destination for closed-ticket transcripts.

use async_trait::async_trait;

/// Uploads a transcript to an external archive.
#[async_trait]
pub trait ArchiveSink: Send + Sync {
    /// Upload `body` under the display name `title`; returns the public URL
    /// of the archive. One attempt, no retry — a failed upload degrades the
    /// close to "no log link".
    async fn upload(&self, title: &str, body: &str) -> anyhow::Result<String>;
}
