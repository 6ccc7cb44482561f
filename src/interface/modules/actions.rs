//! # Action Commands
//!
//! `!boop`, `!bap`, `!hug`: the bot performs an action on whoever is named,
//! or on the sender when nobody is.

use async_trait::async_trait;

use crate::domain::traits::{ChatProvider, Module};
use crate::domain::types::{Handled, IncomingMessage, ModuleContext};
use crate::strings::messages;

#[derive(Debug, Clone, Copy)]
pub struct Action {
    pub name: &'static str,
    pub command: &'static str,
    pub verb: &'static str,
    pub usage: &'static str,
}

pub const ACTIONS: &[Action] = &[
    Action {
        name: "Boop",
        command: "boop",
        verb: "boops",
        usage: "`!boop [who]`",
    },
    Action {
        name: "Bap",
        command: "bap",
        verb: "baps",
        usage: "`!bap [who]`",
    },
    Action {
        name: "Hug",
        command: "hug",
        verb: "hugs",
        usage: "`!hug [who]`",
    },
];

pub struct ActionModule {
    action: &'static Action,
}

impl ActionModule {
    pub fn new(action: &'static Action) -> Self {
        Self { action }
    }

    pub fn respond(&self, message: &IncomingMessage) -> Option<String> {
        let (cmd, args) = message.command()?;
        if !cmd.eq_ignore_ascii_case(self.action.command) {
            return None;
        }
        let target = if args.is_empty() {
            message.sender.as_str()
        } else {
            args
        };
        Some(messages::action(self.action.verb, target))
    }
}

#[async_trait]
impl Module for ActionModule {
    fn name(&self) -> &str {
        self.action.name
    }

    async fn on_message(
        &self,
        _ctx: &ModuleContext,
        message: &IncomingMessage,
        chat: &dyn ChatProvider,
    ) -> anyhow::Result<Handled> {
        let Some(reply) = self.respond(message) else {
            return Ok(Handled::No);
        };
        tracing::trace!("{} responding to {}", self.action.name, message.sender);
        chat.send_message(&reply).await.map_err(anyhow::Error::msg)?;
        Ok(Handled::Yes)
    }
}
