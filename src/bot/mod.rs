//! Bot layer - Discord-specific interface and interaction handlers
//!
//! This module provides the Discord interface for tokenwatch: the slash
//! commands, the refresh-button handler, embed rendering, and the framework
//! setup that wires them together.

/// Discord command implementations (price, general)
pub mod commands;
/// Embed and component rendering for price messages
pub mod embeds;
/// Discord interaction handlers (refresh button)
pub mod handlers;

use crate::{config::AppConfig, errors, moralis::MoralisClient, refresh::RefreshRegistry};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{info, instrument};

/// Shared data available to all bot commands and handlers.
///
/// Everything in here is constructed once in `main`, before the gateway
/// connection starts; handlers never initialize shared state lazily.
pub struct BotData {
    /// Immutable application configuration
    pub config: Arc<AppConfig>,
    /// Token data client for the Moralis gateway
    pub moralis: Arc<MoralisClient>,
    /// Registry of per-message auto-refresh tasks
    pub refresher: Arc<RefreshRegistry>,
}

impl BotData {
    /// Creates a new `BotData` instance holding the shared context for all
    /// commands and handlers.
    #[must_use]
    pub const fn new(
        config: Arc<AppConfig>,
        moralis: Arc<MoralisClient>,
        refresher: Arc<RefreshRegistry>,
    ) -> Self {
        Self {
            config,
            moralis,
            refresher,
        }
    }
}

// Type alias for the error type Poise will use
pub(crate) type Error = errors::Error;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            panic!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                tracing::error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Routes gateway events that arrive outside the command flow.
async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    data: &BotData,
) -> Result<(), Error> {
    if let serenity::FullEvent::InteractionCreate {
        interaction: serenity::Interaction::Component(component),
    } = event
    {
        handlers::component::handle_refresh(ctx, component, data).await?;
    }
    Ok(())
}

/// Builds the poise framework and runs the bot until the gateway connection
/// ends.
///
/// # Errors
/// Returns any error from client construction or the gateway connection.
#[instrument(skip(token, config, moralis, refresher))]
pub async fn run_bot(
    token: String,
    config: Arc<AppConfig>,
    moralis: Arc<MoralisClient>,
    refresher: Arc<RefreshRegistry>,
) -> Result<(), serenity::Error> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![commands::check(), commands::ping(), commands::help()],
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, _framework, data| Box::pin(handle_event(ctx, event, data)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(config, moralis, refresher))
            })
        })
        .build();

    // Slash commands and component interactions arrive without privileged
    // intents.
    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await;

    match client {
        Ok(mut c) => {
            info!("Starting bot client...");
            if let Err(why) = c.start().await {
                tracing::error!("Client error: {:?}", why);
                return Err(why);
            }
        }
        Err(e) => {
            tracing::error!("Error creating client: {:?}", e);
            return Err(e);
        }
    }
    Ok(())
}
