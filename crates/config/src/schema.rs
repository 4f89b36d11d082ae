use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskbotConfig {
    /// Discord bot token.
    #[serde(serialize_with = "serialize_secret")]
    pub discord_token: Secret<String>,

    /// Pastebin developer key used for transcript uploads.
    #[serde(serialize_with = "serialize_secret")]
    pub pastebin_api_key: Secret<String>,

    /// Role whose members count as support staff.
    pub staff_role_id: u64,

    /// Channel that hosts the persistent ticket panel.
    pub panel_channel_id: u64,

    /// Message id of the panel, recorded once it has been posted so the
    /// same panel is reused across restarts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel_message_id: Option<u64>,
}

impl Default for DeskbotConfig {
    fn default() -> Self {
        Self {
            discord_token: Secret::new(String::new()),
            pastebin_api_key: Secret::new(String::new()),
            staff_role_id: 0,
            panel_channel_id: 0,
            panel_message_id: None,
        }
    }
}

impl std::fmt::Debug for DeskbotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeskbotConfig")
            .field("discord_token", &"[REDACTED]")
            .field("pastebin_api_key", &"[REDACTED]")
            .field("staff_role_id", &self.staff_role_id)
            .field("panel_channel_id", &self.panel_channel_id)
            .field("panel_message_id", &self.panel_message_id)
            .finish()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_empty() {
        let cfg = DeskbotConfig::default();
        assert!(cfg.discord_token.expose_secret().is_empty());
        assert_eq!(cfg.staff_role_id, 0);
        assert_eq!(cfg.panel_message_id, None);
    }

    #[test]
    fn deserialize_from_json() {
        let json = r#"{
            "discord_token": "bot-token",
            "staff_role_id": 42,
            "panel_channel_id": 7
        }"#;
        let cfg: DeskbotConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.discord_token.expose_secret(), "bot-token");
        assert_eq!(cfg.staff_role_id, 42);
        assert_eq!(cfg.panel_channel_id, 7);
        // defaults for unspecified fields
        assert_eq!(cfg.panel_message_id, None);
        assert!(cfg.pastebin_api_key.expose_secret().is_empty());
    }

    #[test]
    fn serialize_roundtrip_keeps_secrets_and_panel_id() {
        let cfg = DeskbotConfig {
            discord_token: Secret::new("tok".into()),
            panel_message_id: Some(99),
            ..Default::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let cfg2: DeskbotConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg2.discord_token.expose_secret(), "tok");
        assert_eq!(cfg2.panel_message_id, Some(99));
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = DeskbotConfig {
            discord_token: Secret::new("very-secret".into()),
            ..Default::default()
        };
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
