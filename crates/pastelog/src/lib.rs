//! Pastebin-backed archive sink for closed-ticket transcripts.
//!
//! Uploads are private, expire after one day, and are attempted exactly
//! once; any transport failure or non-URL response body is an error the
//! lifecycle degrades to "no log link".

use {
    anyhow::bail,
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    tracing::{debug, warn},
};

use deskbot_tickets::ArchiveSink;

/// Pastebin's paste-creation endpoint.
pub const PASTEBIN_POST_URL: &str = "https://pastebin.com/api/api_post.php";

/// Archive sink backed by the Pastebin HTTP API.
pub struct PastebinClient {
    http: reqwest::Client,
    api_key: Secret<String>,
    endpoint: String,
}

impl PastebinClient {
    #[must_use]
    pub fn new(api_key: Secret<String>) -> Self {
        Self::with_endpoint(api_key, PASTEBIN_POST_URL)
    }

    /// Point the client at a different endpoint. Used by tests.
    #[must_use]
    pub fn with_endpoint(api_key: Secret<String>, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            endpoint: endpoint.into(),
        }
    }
}

impl std::fmt::Debug for PastebinClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PastebinClient")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ArchiveSink for PastebinClient {
    async fn upload(&self, title: &str, body: &str) -> anyhow::Result<String> {
        let form = [
            ("api_dev_key", self.api_key.expose_secret().as_str()),
            ("api_option", "paste"),
            ("api_paste_code", body),
            ("api_paste_private", "1"),
            ("api_paste_name", title),
            ("api_paste_expire_date", "1D"),
        ];

        let response = self.http.post(&self.endpoint).form(&form).send().await?;
        let text = response.text().await?;
        let text = text.trim();

        // Pastebin signals success with a bare URL and errors with a plain
        // text message in the same 200 body.
        if text.starts_with("http") {
            debug!(url = text, "transcript uploaded");
            Ok(text.to_string())
        } else {
            warn!(body = text, "pastebin rejected upload");
            bail!("pastebin rejected upload: {text}")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {mockito::Matcher, secrecy::Secret};

    use super::*;

    fn client(endpoint: &str) -> PastebinClient {
        PastebinClient::with_endpoint(Secret::new("dev-key".into()), endpoint)
    }

    #[tokio::test]
    async fn upload_returns_paste_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/api_post.php")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_dev_key".into(), "dev-key".into()),
                Matcher::UrlEncoded("api_option".into(), "paste".into()),
                Matcher::UrlEncoded("api_paste_private".into(), "1".into()),
                Matcher::UrlEncoded("api_paste_name".into(), "Ticket Log - ticket-1".into()),
                Matcher::UrlEncoded("api_paste_expire_date".into(), "1D".into()),
            ]))
            .with_body("https://pastebin.com/abc123")
            .create_async()
            .await;

        let url = client(&format!("{}/api/api_post.php", server.url()))
            .upload("Ticket Log - ticket-1", "hello")
            .await
            .unwrap();
        assert_eq!(url, "https://pastebin.com/abc123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_url_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/api_post.php")
            .with_body("Bad API request, invalid api_dev_key")
            .create_async()
            .await;

        let err = client(&format!("{}/api/api_post.php", server.url()))
            .upload("t", "b")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid api_dev_key"));
    }

    #[tokio::test]
    async fn transport_failure_is_an_error() {
        // Nothing listens on this port.
        let result = client("http://127.0.0.1:1/api_post.php")
            .upload("t", "b")
            .await;
        assert!(result.is_err());
    }
}
