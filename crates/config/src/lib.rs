//! Configuration loading and persistence for deskbot.
//!
//! Config files: `deskbot.toml` or `deskbot.json`, searched in `./` then
//! `~/.config/deskbot/`. Supports `${ENV_VAR}` substitution in the raw
//! document, so tokens can live in the environment. The document is always
//! saved back whole (the panel message id is recorded this way once the
//! panel is posted).

pub mod env_subst;
pub mod handle;
pub mod loader;
pub mod schema;

pub use {
    handle::ConfigHandle,
    loader::{discover_and_load, find_or_default_config_path, load_config, save_config},
    schema::DeskbotConfig,
};
