//! Embed and component rendering for price messages.
//!
//! Everything user-visible about a price message is built here: the embed
//! layout, the `$` price formatting, and the refresh button whose custom id
//! carries the token address back to the component handler.

use crate::moralis::TokenInfo;
use poise::serenity_prelude as serenity;

/// Fixed accent color of every price embed.
const EMBED_COLOR: u32 = 0x00FF00;

/// Custom id prefix routing component interactions to the refresh handler.
const REFRESH_PREFIX: &str = "refresh_price_";

/// Which refresh path produced an updated embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    /// The user pressed the refresh button.
    Manual,
    /// The scheduled refresh task fired.
    Auto,
}

/// Formats a USD price for display.
///
/// A missing price renders as a plain "unavailable" rather than a bogus
/// dollar amount.
#[must_use]
pub fn format_usd(price: Option<f64>) -> String {
    match price {
        Some(value) => format!("${value}"),
        None => "unavailable".to_string(),
    }
}

/// Builds the custom id of the refresh button for `address`.
#[must_use]
pub fn refresh_custom_id(address: &str) -> String {
    format!("{REFRESH_PREFIX}{address}")
}

/// Extracts the token address from a refresh-button custom id.
///
/// Returns `None` for custom ids that do not belong to the refresh handler.
#[must_use]
pub fn parse_refresh_custom_id(custom_id: &str) -> Option<&str> {
    custom_id
        .strip_prefix(REFRESH_PREFIX)
        .filter(|address| !address.is_empty())
}

/// Common scaffold of every price embed.
fn base_embed(info: &TokenInfo, address: &str) -> serenity::CreateEmbed {
    let timestamp = serenity::Timestamp::from_unix_timestamp(info.fetched_at.timestamp())
        .unwrap_or_else(|_| serenity::Timestamp::now());

    serenity::CreateEmbed::new()
        .colour(EMBED_COLOR)
        .title(info.name.clone())
        .field("Price Now", format_usd(info.usd_price), true)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Address: {address}"
        )))
        .timestamp(timestamp)
}

/// Embed for the first send, announcing the looked-up token.
#[must_use]
pub fn price_embed(info: &TokenInfo, address: &str) -> serenity::CreateEmbed {
    base_embed(info, address).author(serenity::CreateEmbedAuthor::new("New Coin Added! 🚀"))
}

/// Embed replacing the original message after a refresh.
#[must_use]
pub fn refreshed_price_embed(
    info: &TokenInfo,
    address: &str,
    kind: RefreshKind,
) -> serenity::CreateEmbed {
    let description = match kind {
        RefreshKind::Manual => format!("Updated price of **{}**:", info.name),
        RefreshKind::Auto => format!("Auto-updated price of **{}**:", info.name),
    };
    base_embed(info, address).description(description)
}

/// The action row holding the refresh button for `address`.
#[must_use]
pub fn refresh_button_row(address: &str) -> serenity::CreateActionRow {
    let button = serenity::CreateButton::new(refresh_custom_id(address))
        .label("🔄 Refresh Price")
        .style(serenity::ButtonStyle::Primary);
    serenity::CreateActionRow::Buttons(vec![button])
}
