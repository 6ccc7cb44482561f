//! # Help Command
//!
//! Handles `!help` by listing the commands of every loaded module.

use async_trait::async_trait;

use crate::domain::traits::{ChatProvider, Module};
use crate::domain::types::{Handled, IncomingMessage, ModuleContext};
use crate::strings::help;

pub const NAME: &str = "Help";

pub struct Help;

impl Help {
    pub fn render(ctx: &ModuleContext) -> String {
        let lines: Vec<String> = ctx
            .loaded
            .iter()
            .filter_map(|name| super::usage(name).map(|usage| help::module_line(name, usage)))
            .collect();
        help::render(&lines)
    }
}

#[async_trait]
impl Module for Help {
    fn name(&self) -> &str {
        NAME
    }

    async fn on_message(
        &self,
        ctx: &ModuleContext,
        message: &IncomingMessage,
        chat: &dyn ChatProvider,
    ) -> anyhow::Result<Handled> {
        match message.command() {
            Some((cmd, _)) if cmd.eq_ignore_ascii_case("help") => {
                chat.send_message(&Self::render(ctx))
                    .await
                    .map_err(anyhow::Error::msg)?;
                Ok(Handled::Yes)
            }
            _ => Ok(Handled::No),
        }
    }
}
