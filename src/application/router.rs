//! # Module Router
//!
//! Offers each incoming message to the loaded modules, in registration order,
//! until one of them reports it as handled.

use std::sync::Arc;

use crate::domain::traits::{ChatProvider, Module};
use crate::domain::types::{Handled, IncomingMessage, ModuleContext};

pub struct ModuleRouter {
    modules: Arc<[Arc<dyn Module>]>,
    ctx: ModuleContext,
}

impl ModuleRouter {
    pub fn new(modules: Arc<[Arc<dyn Module>]>, ctx: ModuleContext) -> Self {
        Self { modules, ctx }
    }

    #[cfg(test)]
    pub fn context(&self) -> &ModuleContext {
        &self.ctx
    }

    #[cfg(test)]
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    /// Returns the name of the module that handled the message, if any.
    /// A failing module is logged and skipped.
    pub async fn route(
        &self,
        chat: &dyn ChatProvider,
        message: &IncomingMessage,
    ) -> Option<String> {
        tracing::debug!(
            "Router offering message from '{}' in {} to {} modules",
            message.sender,
            message.room_id,
            self.modules.len()
        );

        for module in self.modules.iter() {
            match module.on_message(&self.ctx, message, chat).await {
                Ok(Handled::Yes) => {
                    tracing::debug!("Message handled by {}", module.name());
                    return Some(module.name().to_string());
                }
                Ok(Handled::No) => {}
                Err(e) => tracing::error!("Module {} failed: {:#}", module.name(), e),
            }
        }
        None
    }
}
