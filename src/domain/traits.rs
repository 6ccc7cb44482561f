//! # Domain Traits
//!
//! Abstract interfaces for the pluggable parts of the bot (Chat, Modules, Lifecycle).
//! Concrete implementations live in the Infrastructure and Interface layers.

use async_trait::async_trait;

use crate::domain::types::{Handled, IncomingMessage, ModuleContext};

/// Abstract interface for a Chat Provider scoped to one room (e.g., Matrix, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message to the room
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Send a notification (not tracked/editable)
    async fn send_notification(&self, content: &str) -> Result<(), String>;

    /// Reply to a specific user in the room
    async fn reply(&self, sender: &str, content: &str) -> Result<(), String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// A named, independently registrable command-handling unit.
#[async_trait]
pub trait Module: Send + Sync {
    fn name(&self) -> &str;

    /// Called once, in registration order, before the first message is dispatched.
    async fn on_start(&self, _ctx: &ModuleContext) -> anyhow::Result<()> {
        Ok(())
    }

    /// Offered every incoming message until some module reports [`Handled::Yes`].
    async fn on_message(
        &self,
        ctx: &ModuleContext,
        message: &IncomingMessage,
        chat: &dyn ChatProvider,
    ) -> anyhow::Result<Handled>;

    /// Called once when the application stops. Must not block.
    fn on_stop(&self) {}
}

/// Anything that can be asked to stop. Calling `stop` repeatedly must be harmless.
pub trait Stoppable: Send + Sync {
    fn stop(&self);
}
