//! # Direct Client
//!
//! Standalone login flow that bypasses the module framework: log in with `TOKEN`,
//! answer `ping` with `pong`, and sync until a signal arrives.

use anyhow::Result;
use matrix_sdk::config::SyncSettings;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::events::room::message::SyncRoomMessageEvent;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::Notify;

use crate::application::error::AppError;
use crate::domain::traits::{ChatProvider, Stoppable};
use crate::infrastructure::matrix::{self, MatrixService};
use crate::infrastructure::signals::SignalHandler;
use crate::strings::{logs, messages};

/// Reply for a message body, if it is one the direct client answers.
pub fn auto_reply(body: &str) -> Option<&'static str> {
    (body == "ping").then_some(messages::PONG)
}

/// Wakes the sync loop's owner when a signal arrives.
struct StopNotify(Notify);

impl Stoppable for StopNotify {
    fn stop(&self) {
        self.0.notify_one();
    }
}

pub async fn run(homeserver: &str, token: Option<&str>) -> Result<()> {
    let token = token.ok_or(AppError::MissingToken)?;
    let client = matrix::login_with_token(homeserver, token).await?;

    let user = client
        .user_id()
        .map(|id| id.to_string())
        .unwrap_or_default();
    tracing::info!("{}", logs::login_success(&user));

    let start_time = SystemTime::now();
    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| async move {
        let Some(message) = matrix::incoming_text(&ev, &room, start_time) else {
            return;
        };
        if let Some(reply) = auto_reply(&message.body) {
            let chat = MatrixService::new(room);
            if let Err(e) = chat.reply(&message.sender, reply).await {
                tracing::warn!("Failed to reply to {}: {}", message.sender, e);
            }
        }
    });

    let stop = Arc::new(StopNotify(Notify::new()));
    let signals = SignalHandler::new(stop.clone());
    let listener = signals.install();

    tracing::info!("{}", logs::SYNC_LOOP_START);
    let result = tokio::select! {
        res = client.sync(SyncSettings::default()) => res.map_err(anyhow::Error::from),
        _ = stop.0.notified() => Ok(()),
    };
    listener.abort();
    result
}
