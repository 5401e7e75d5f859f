use dotenvy::dotenv;
use std::{env, sync::Arc};
use tokenwatch::{
    bot, config,
    errors::{Error, Result},
    keepalive,
    moralis::{DEFAULT_BASE_URL, MoralisClient},
    refresh::RefreshRegistry,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = Arc::new(config::load_app_configuration()?);
    info!("Successfully processed application configuration.");

    // 4. Build the token data client, once, before any events are accepted
    let moralis_client = MoralisClient::new(
        &app_config.moralis_api_key,
        DEFAULT_BASE_URL,
        app_config.http_timeout(),
    )
    .inspect(|_| info!("Token data client initialized."))
    .inspect_err(|e| error!("Failed to initialize token data client: {}", e))?;
    let moralis_client = Arc::new(moralis_client);

    // 5. Start the keepalive self-ping, if configured
    if let Some(url) = app_config.keepalive_url.clone() {
        info!("Keepalive self-ping enabled for {}", url);
        keepalive::spawn(
            reqwest::Client::new(),
            url,
            app_config.keepalive_interval(),
        );
    }

    // 6. Run the bot
    // DISCORD_BOT_TOKEN is loaded here, directly before use, not stored in AppConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    let refresher = RefreshRegistry::new();
    bot::run_bot(token, Arc::clone(&app_config), moralis_client, refresher)
        .await
        .map_err(Error::from)?;

    Ok(())
}
