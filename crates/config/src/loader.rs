use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::DeskbotConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["deskbot.toml", "deskbot.json"];

/// Load config from the given path (format chosen by extension).
pub fn load_config(path: &Path) -> anyhow::Result<DeskbotConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./deskbot.{toml,json}` (project-local)
/// 2. `~/.config/deskbot/deskbot.{toml,json}` (user-global)
///
/// Returns the path the config will be saved back to, alongside the config
/// itself (`DeskbotConfig::default()` when no file is found).
pub fn discover_and_load() -> (PathBuf, DeskbotConfig) {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return (path, cfg),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                return (path, DeskbotConfig::default());
            },
        }
    }
    debug!("no config file found, using defaults");
    (find_or_default_config_path(), DeskbotConfig::default())
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    // Project-local
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    // User-global: ~/.config/deskbot/
    if let Some(dirs) = directories::ProjectDirs::from("", "", "deskbot") {
        let config_dir = dirs.config_dir();
        for name in CONFIG_FILENAMES {
            let p = config_dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

/// Returns the path of an existing config file, or the default TOML path.
pub fn find_or_default_config_path() -> PathBuf {
    if let Some(path) = find_config_file() {
        return path;
    }
    directories::ProjectDirs::from("", "", "deskbot")
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deskbot.toml")
}

/// Serialize `config` and write the whole document to `path`.
///
/// Creates parent directories if needed. The document is always written as
/// a whole; callers mutate a copy and save it back.
pub fn save_config(config: &DeskbotConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let rendered = render_config(config, path)?;
    std::fs::write(path, rendered)?;
    debug!(path = %path.display(), "saved config");
    Ok(())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<DeskbotConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

fn render_config(config: &DeskbotConfig, path: &Path) -> anyhow::Result<String> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::to_string_pretty(config)?),
        "json" => Ok(serde_json::to_string_pretty(config)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use secrecy::{ExposeSecret, Secret};

    use super::*;

    #[test]
    fn toml_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deskbot.toml");

        let cfg = DeskbotConfig {
            discord_token: Secret::new("tok".into()),
            staff_role_id: 42,
            panel_channel_id: 7,
            panel_message_id: Some(99),
            ..Default::default()
        };
        save_config(&cfg, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.discord_token.expose_secret(), "tok");
        assert_eq!(loaded.staff_role_id, 42);
        assert_eq!(loaded.panel_message_id, Some(99));
    }

    #[test]
    fn json_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deskbot.json");

        let cfg = DeskbotConfig {
            pastebin_api_key: Secret::new("key".into()),
            ..Default::default()
        };
        save_config(&cfg, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.pastebin_api_key.expose_secret(), "key");
        assert_eq!(loaded.panel_message_id, None);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deskbot.yaml");
        std::fs::write(&path, "discord_token: x").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/deskbot.toml")).is_err());
    }
}
