//! The `/check` price lookup command.
//!
//! `/check` opens a modal asking for a contract address, looks the token up,
//! and posts the price embed (with its refresh button) to the invoking
//! channel. All user feedback for failed lookups is ephemeral, so a dead-end
//! lookup never clutters the channel.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, embeds},
        errors::{Error, Result},
        moralis::Lookup,
    };
    use poise::Modal as _;
    use poise::serenity_prelude as serenity;
    use tracing::{info, warn};

    /// Address input form shown in response to `/check`.
    ///
    /// Routed back to this command by the framework's per-interaction
    /// collector, so concurrent invocations from different channels cannot
    /// cross wires.
    #[derive(Debug, poise::Modal)]
    #[name = "Check price by address"]
    struct CheckPriceModal {
        #[name = "Contract Address (optional)"]
        #[placeholder = "Solana token contract address"]
        crypto_address: Option<String>,
    }

    /// Check price by address
    ///
    /// Opens a modal for the address, then posts an embed with the token
    /// name, price, and a refresh button into the channel the command was
    /// invoked from.
    #[poise::command(slash_command)]
    pub async fn check(ctx: poise::ApplicationContext<'_, BotData, Error>) -> Result<()> {
        let Some(submission) = CheckPriceModal::execute(ctx).await? else {
            // Modal dismissed or timed out; nothing to do.
            return Ok(());
        };

        let address = submission
            .crypto_address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        let Some(address) = address else {
            ctx.send(
                poise::CreateReply::default()
                    .content("❌ Please provide a contract address to look up.")
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        };

        match ctx.data().moralis.token_info(&address).await {
            Ok(Lookup::Found(info)) => {
                let message = serenity::CreateMessage::new()
                    .embed(embeds::price_embed(&info, &address))
                    .components(vec![embeds::refresh_button_row(&address)]);

                if let Err(e) = ctx
                    .channel_id()
                    .send_message(ctx.serenity_context(), message)
                    .await
                {
                    warn!("Failed to send price embed for {}: {}", address, e);
                    ctx.send(
                        poise::CreateReply::default()
                            .content("❌ Couldn't post the price here. Check my channel permissions.")
                            .ephemeral(true),
                    )
                    .await?;
                    return Ok(());
                }

                info!("Posted price for {} ({})", info.name, address);
            }
            Ok(Lookup::NotFound) => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!("❌ No token found for address `{address}`."))
                        .ephemeral(true),
                )
                .await?;
            }
            Err(e) => {
                warn!("Price lookup for {} failed: {}", address, e);
                ctx.send(
                    poise::CreateReply::default()
                        .content(
                            "❌ The price service is unreachable right now. Please try again later.",
                        )
                        .ephemeral(true),
                )
                .await?;
            }
        }

        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
