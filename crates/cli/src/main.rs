use std::{path::PathBuf, sync::Arc};

use {
    clap::Parser,
    secrecy::ExposeSecret,
    tracing::info,
    tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter},
};

use {
    deskbot_config::{discover_and_load, load_config, ConfigHandle},
    deskbot_discord::TicketHandler,
    deskbot_pastelog::PastebinClient,
    deskbot_tickets::{ArchiveSink, TicketRegistry},
};

#[derive(Parser)]
#[command(name = "deskbot", about = "Deskbot — Discord support-ticket bot")]
struct Cli {
    /// Path to the config file (defaults to standard locations).
    #[arg(long, env = "DESKBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let (path, config) = match &cli.config {
        Some(path) => (path.clone(), load_config(path)?),
        None => discover_and_load(),
    };
    if config.discord_token.expose_secret().is_empty() {
        anyhow::bail!(
            "discord_token is not set; add it to {} (supports ${{ENV_VAR}} substitution)",
            path.display()
        );
    }

    info!(config = %path.display(), "starting deskbot");

    let token = config.discord_token.expose_secret().clone();
    let pastebin_key = config.pastebin_api_key.clone();

    let store = Arc::new(ConfigHandle::new(path, config));
    let registry = Arc::new(TicketRegistry::new());
    let archive: Arc<dyn ArchiveSink> = Arc::new(PastebinClient::new(pastebin_key));
    let handler = TicketHandler::new(store, registry, archive);

    deskbot_discord::run(&token, handler).await
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}
