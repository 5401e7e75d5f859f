//! General Discord commands - ping and help.
//! Simple commands with no external API calls, for connectivity checks and
//! user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Tokenwatch Help**\n\
        Here is a summary of all available commands.\n\n\
        **Price Commands**\n\
        • `/check` - Check a token's USD price by contract address. Opens a \
        form for the address and posts the price with a refresh button.\n\
        Press **🔄 Refresh Price** under a price message to update it; the \
        price then keeps auto-updating on a fixed interval.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
