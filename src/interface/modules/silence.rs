//! # No Message Processor
//!
//! Claims every message no earlier module handled. Sits last in the baseline.

use async_trait::async_trait;

use crate::domain::traits::{ChatProvider, Module};
use crate::domain::types::{Handled, IncomingMessage, ModuleContext};

pub const NAME: &str = "NoMessageProcessor";

pub struct NoMessageProcessor;

#[async_trait]
impl Module for NoMessageProcessor {
    fn name(&self) -> &str {
        NAME
    }

    async fn on_message(
        &self,
        _ctx: &ModuleContext,
        message: &IncomingMessage,
        _chat: &dyn ChatProvider,
    ) -> anyhow::Result<Handled> {
        tracing::trace!("Unprocessed message from {}", message.sender);
        Ok(Handled::Yes)
    }
}
