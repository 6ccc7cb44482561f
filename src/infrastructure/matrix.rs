//! # Matrix Service Adapter
//!
//! Implements the `ChatProvider` trait for the Matrix protocol using `matrix_sdk`,
//! plus the login and event-conversion helpers shared by both runtime flows.

use crate::domain::config::MatrixConfig;
use crate::domain::traits::ChatProvider;
use crate::domain::types::IncomingMessage;
use crate::strings::logs;
use anyhow::{Context, Result};
use async_trait::async_trait;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::events::room::message::{
    MessageType, RoomMessageEventContent, SyncRoomMessageEvent,
};
use matrix_sdk::Client;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Clone)]
pub struct MatrixService {
    room: Room,
}

impl MatrixService {
    pub fn new(room: Room) -> Self {
        Self { room }
    }
}

#[async_trait]
impl ChatProvider for MatrixService {
    fn room_id(&self) -> String {
        self.room.room_id().as_str().to_string()
    }

    async fn send_message(&self, content: &str) -> Result<String, String> {
        tracing::info!("Bot sending message to {}: {}", self.room_id(), content);
        self.room
            .send(RoomMessageEventContent::text_markdown(content))
            .await
            .map(|resp| resp.event_id.to_string())
            .map_err(|e| e.to_string())
    }

    async fn send_notification(&self, content: &str) -> Result<(), String> {
        self.room
            .send(RoomMessageEventContent::notice_markdown(content))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn reply(&self, sender: &str, content: &str) -> Result<(), String> {
        self.send_message(&format!("{sender}: {content}"))
            .await
            .map(|_| ())
    }
}

/// Logs in with the account from the stage config.
pub async fn login_with_password(config: &MatrixConfig) -> Result<Client> {
    let client = Client::builder()
        .homeserver_url(&config.homeserver)
        .build()
        .await
        .context(logs::CLIENT_BUILD_ERROR)?;

    client
        .matrix_auth()
        .login_username(&config.username, &config.password)
        .send()
        .await
        .context(logs::LOGIN_ERROR)?;

    if let Some(name) = &config.display_name {
        tracing::info!("{}", logs::setting_display_name(name));
        if let Err(e) = client.account().set_display_name(Some(name.as_str())).await {
            tracing::warn!("{}", logs::set_display_name_fail(&e.to_string()));
        }
    }

    Ok(client)
}

/// Logs in with a one-shot login token.
pub async fn login_with_token(homeserver: &str, token: &str) -> Result<Client> {
    let client = Client::builder()
        .homeserver_url(homeserver)
        .build()
        .await
        .context(logs::CLIENT_BUILD_ERROR)?;

    client
        .matrix_auth()
        .login_token(token)
        .send()
        .await
        .context(logs::LOGIN_ERROR)?;

    Ok(client)
}

/// Converts a sync event into an [`IncomingMessage`].
///
/// Skips redacted events, non-text messages, the bot's own messages and anything
/// sent before `start_time` (history replayed by the initial sync).
pub fn incoming_text(
    ev: &SyncRoomMessageEvent,
    room: &Room,
    start_time: SystemTime,
) -> Option<IncomingMessage> {
    let original = ev.as_original()?;

    let event_time = UNIX_EPOCH + Duration::from_millis(ev.origin_server_ts().get().into());
    if event_time < start_time {
        return None;
    }
    if original.sender == room.own_user_id() {
        return None;
    }

    match &original.content.msgtype {
        MessageType::Text(text) => Some(IncomingMessage::new(
            room.room_id().as_str(),
            original.sender.as_str(),
            &text.body,
        )),
        _ => None,
    }
}
