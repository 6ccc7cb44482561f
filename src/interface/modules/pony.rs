//! # Pony Opinions
//!
//! `!bestpony` / `!worstpony`. The answer can be overridden per module in the stage
//! config (`modules.BestPony.answer`); otherwise it is the identity-keyed default.

use async_trait::async_trait;

use crate::application::settings::{ConfigValue, define_value};
use crate::domain::traits::{ChatProvider, Module};
use crate::domain::types::{Handled, IncomingMessage, ModuleContext};
use crate::strings::messages;

pub const BEST: &str = "BestPony";
pub const WORST: &str = "WorstPony";

pub struct PonyModule {
    name: &'static str,
    command: &'static str,
    answer: ConfigValue<String>,
    format: fn(&str) -> String,
}

impl PonyModule {
    pub fn best() -> Self {
        Self {
            name: BEST,
            command: "bestpony",
            answer: ConfigValue::new(|| "Fluttershy".to_string())
                .with_alternate(|| "Autumn Blaze".to_string()),
            format: messages::best_pony,
        }
    }

    pub fn worst() -> Self {
        Self {
            name: WORST,
            command: "worstpony",
            answer: ConfigValue::new(|| "Cozy Glow".to_string()),
            format: messages::worst_pony,
        }
    }

    pub fn answer(&self, ctx: &ModuleContext) -> String {
        let configured = ctx
            .settings_for(self.name)
            .and_then(|s| s.get("answer"))
            .and_then(|a| a.as_str());
        match configured {
            Some(answer) => answer.to_string(),
            None => define_value(&ctx.identity, &self.answer),
        }
    }
}

#[async_trait]
impl Module for PonyModule {
    fn name(&self) -> &str {
        self.name
    }

    async fn on_message(
        &self,
        ctx: &ModuleContext,
        message: &IncomingMessage,
        chat: &dyn ChatProvider,
    ) -> anyhow::Result<Handled> {
        match message.command() {
            Some((cmd, _)) if cmd.eq_ignore_ascii_case(self.command) => {
                let reply = (self.format)(&self.answer(ctx));
                chat.send_message(&reply).await.map_err(anyhow::Error::msg)?;
                Ok(Handled::Yes)
            }
            _ => Ok(Handled::No),
        }
    }
}
