//! Test doubles shared across unit tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::traits::ChatProvider;

/// Chat provider that records everything sent through it.
#[derive(Default)]
pub struct RecordingChat {
    pub sent: Mutex<Vec<String>>,
}

impl RecordingChat {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for RecordingChat {
    async fn send_message(&self, content: &str) -> Result<String, String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(content.to_string());
        Ok(format!("$event{}", sent.len()))
    }

    async fn send_notification(&self, content: &str) -> Result<(), String> {
        self.send_message(content).await.map(|_| ())
    }

    async fn reply(&self, sender: &str, content: &str) -> Result<(), String> {
        self.send_message(&format!("{sender}: {content}"))
            .await
            .map(|_| ())
    }

    fn room_id(&self) -> String {
        "!test:example.org".to_string()
    }
}
