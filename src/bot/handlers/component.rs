//! Handler for the refresh-price button.
//!
//! The button's custom id carries the token address, so the handler needs no
//! state beyond the interaction itself. Discord expects an acknowledgement
//! within its response window, so the interaction is deferred before any
//! lookup starts.

use crate::{
    bot::{
        BotData,
        embeds::{self, RefreshKind},
    },
    errors::Result,
    moralis::Lookup,
};
use poise::serenity_prelude as serenity;
use std::{ops::ControlFlow, sync::Arc};
use tracing::{debug, info, warn};

/// Fixed notice sent ephemerally when a refresh cannot be completed.
const RETRY_LATER_NOTICE: &str =
    "There was an issue updating the price. Please try again later.";

/// Handles a component interaction if it belongs to the refresh button.
///
/// Unknown custom ids are ignored so other components can coexist. On
/// success the original message is edited in place and an auto-refresh
/// schedule is installed for it, replacing any earlier one.
pub async fn handle_refresh(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &BotData,
) -> Result<()> {
    let Some(address) = embeds::parse_refresh_custom_id(&component.data.custom_id) else {
        return Ok(());
    };
    let address = address.to_string();
    debug!("Refresh button pressed for {}", address);

    // Acknowledge before any network call; the lookup can outlast Discord's
    // response window.
    component.defer(&ctx.http).await?;

    match data.moralis.token_info(&address).await {
        Ok(Lookup::Found(info)) => {
            let embed = embeds::refreshed_price_embed(&info, &address, RefreshKind::Manual);
            let mut message = (*component.message).clone();

            if let Err(e) = message
                .edit(&ctx.http, serenity::EditMessage::new().embed(embed))
                .await
            {
                warn!("Failed to edit price message {}: {}", message.id, e);
                // Message gone; drop any schedule still attached to it.
                data.refresher.cancel(message.id.get());
                retry_later(ctx, component).await?;
                return Ok(());
            }

            info!("Refreshed price of {} ({})", info.name, address);
            schedule_auto_refresh(ctx, data, message.channel_id, message.id, &address);
        }
        Ok(Lookup::NotFound) => {
            warn!("Refresh found no token for {}", address);
            retry_later(ctx, component).await?;
        }
        Err(e) => {
            warn!("Refresh lookup for {} failed: {}", address, e);
            retry_later(ctx, component).await?;
        }
    }

    Ok(())
}

/// Installs (or replaces) the repeating auto-refresh task for a message.
fn schedule_auto_refresh(
    ctx: &serenity::Context,
    data: &BotData,
    channel_id: serenity::ChannelId,
    message_id: serenity::MessageId,
    address: &str,
) {
    let http = Arc::clone(&ctx.http);
    let moralis = Arc::clone(&data.moralis);
    let address = address.to_string();

    data.refresher
        .schedule(message_id.get(), data.config.refresh_interval(), move || {
            let http = Arc::clone(&http);
            let moralis = Arc::clone(&moralis);
            let address = address.clone();

            async move {
                let info = match moralis.token_info(&address).await {
                    Ok(Lookup::Found(info)) => info,
                    Ok(Lookup::NotFound) => {
                        debug!("No token data for {} this tick", address);
                        return ControlFlow::Continue(());
                    }
                    Err(e) => {
                        // Transient; the next tick may succeed.
                        warn!("Auto-refresh lookup for {} failed: {}", address, e);
                        return ControlFlow::Continue(());
                    }
                };

                let embed = embeds::refreshed_price_embed(&info, &address, RefreshKind::Auto);
                match channel_id
                    .edit_message(&http, message_id, serenity::EditMessage::new().embed(embed))
                    .await
                {
                    Ok(_) => {
                        debug!("Auto-updated price of {} ({})", info.name, address);
                        ControlFlow::Continue(())
                    }
                    Err(e) => {
                        // Message deleted or otherwise unreachable; stop.
                        warn!(
                            "Stopping auto-refresh for message {}: {}",
                            message_id, e
                        );
                        ControlFlow::Break(())
                    }
                }
            }
        });
}

/// Sends the fixed retry-later notice, visible only to the pressing user.
async fn retry_later(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
) -> Result<()> {
    component
        .create_followup(
            &ctx.http,
            serenity::CreateInteractionResponseFollowup::new()
                .content(RETRY_LATER_NOTICE)
                .ephemeral(true),
        )
        .await?;
    Ok(())
}
