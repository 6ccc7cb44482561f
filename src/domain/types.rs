//! # Domain Types
//!
//! Common data structures passed between the framework and its modules.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::COMMAND_PREFIX;
use crate::domain::env::{Identity, RuntimeMode};

/// A text message received in a room, already filtered for the bot's own messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub room_id: String,
    pub sender: String,
    pub body: String,
}

impl IncomingMessage {
    pub fn new(room_id: &str, sender: &str, body: &str) -> Self {
        Self {
            room_id: room_id.to_string(),
            sender: sender.to_string(),
            body: body.to_string(),
        }
    }

    /// Splits `!cmd args` into `("cmd", "args")`. `None` when the body is not a command.
    pub fn command(&self) -> Option<(&str, &str)> {
        let rest = self.body.trim().strip_prefix(COMMAND_PREFIX)?;
        match rest.split_once(char::is_whitespace) {
            Some((cmd, args)) => Some((cmd, args.trim())),
            None if !rest.is_empty() => Some((rest, "")),
            None => None,
        }
    }
}

/// Outcome of offering a message to a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Yes,
    No,
}

/// Read-only context shared by all modules.
#[derive(Debug, Clone)]
pub struct ModuleContext {
    /// Names of the modules that were actually loaded, in registration order
    pub loaded: Arc<[String]>,
    pub identity: Identity,
    pub runtime: RuntimeMode,
    pub bot_name: String,
    pub settings: Arc<HashMap<String, serde_yaml::Value>>,
}

impl ModuleContext {
    pub fn settings_for(&self, module: &str) -> Option<&serde_yaml::Value> {
        self.settings.get(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        let msg = IncomingMessage::new("!room", "@a:x", "  !boop   Twilight Sparkle ");
        assert_eq!(msg.command(), Some(("boop", "Twilight Sparkle")));

        let msg = IncomingMessage::new("!room", "@a:x", "!help");
        assert_eq!(msg.command(), Some(("help", "")));

        let msg = IncomingMessage::new("!room", "@a:x", "!");
        assert_eq!(msg.command(), None);

        let msg = IncomingMessage::new("!room", "@a:x", "hello there");
        assert_eq!(msg.command(), None);
    }
}
