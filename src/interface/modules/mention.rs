//! # Mention Reply
//!
//! Greets whoever mentions the bot by name outside of a command.

use async_trait::async_trait;

use crate::domain::traits::{ChatProvider, Module};
use crate::domain::types::{Handled, IncomingMessage, ModuleContext};
use crate::strings::messages;

pub const NAME: &str = "MentionCanni";

pub struct MentionCanni;

pub fn mentions(body: &str, bot_name: &str) -> bool {
    !bot_name.is_empty() && body.to_lowercase().contains(&bot_name.to_lowercase())
}

#[async_trait]
impl Module for MentionCanni {
    fn name(&self) -> &str {
        NAME
    }

    async fn on_message(
        &self,
        ctx: &ModuleContext,
        message: &IncomingMessage,
        chat: &dyn ChatProvider,
    ) -> anyhow::Result<Handled> {
        if message.command().is_some() || !mentions(&message.body, &ctx.bot_name) {
            return Ok(Handled::No);
        }
        tracing::debug!("Mentioned by {}", message.sender);
        chat.reply(&message.sender, &messages::mention_reply(&ctx.bot_name))
            .await
            .map_err(anyhow::Error::msg)?;
        Ok(Handled::Yes)
    }
}
