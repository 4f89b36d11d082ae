//! Shared config handle that can persist the whole document after mutation.

use std::{path::PathBuf, sync::RwLock};

use tracing::info;

use crate::{loader::save_config, schema::DeskbotConfig};

/// In-memory config plus the path it is saved back to.
///
/// Mutations go through dedicated methods that update the in-memory copy
/// and rewrite the document whole, mirroring how the config was loaded.
#[derive(Debug)]
pub struct ConfigHandle {
    path: PathBuf,
    config: RwLock<DeskbotConfig>,
}

impl ConfigHandle {
    #[must_use]
    pub fn new(path: PathBuf, config: DeskbotConfig) -> Self {
        Self {
            path,
            config: RwLock::new(config),
        }
    }

    /// Snapshot of the current config.
    #[must_use]
    pub fn get(&self) -> DeskbotConfig {
        self.config.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Record the id of the freshly posted panel message and save.
    pub fn record_panel_message(&self, message_id: u64) -> anyhow::Result<()> {
        let snapshot = {
            let mut config = self.config.write().unwrap_or_else(|e| e.into_inner());
            config.panel_message_id = Some(message_id);
            config.clone()
        };
        save_config(&snapshot, &self.path)?;
        info!(message_id, path = %self.path.display(), "panel message id recorded");
        Ok(())
    }
}
