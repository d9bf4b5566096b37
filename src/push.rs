mod fcm;

pub use self::fcm::FcmClient;

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    /// Device token of the receiver.
    pub token: String,
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

/// Delivers push notifications to a device.
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, message: PushMessage) -> Result<()>;
}

/// Used when no push credentials are configured: messages are logged and dropped.
pub struct DisabledPush;

#[async_trait]
impl PushSender for DisabledPush {
    async fn send(&self, message: PushMessage) -> Result<()> {
        warn!("Push is not configured, dropping notification: {}", message.title);
        Ok(())
    }
}

/// Cuts `text` to at most `max_chars` characters, appending an ellipsis when cut.
pub fn truncate_body(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_body("ngắn", 10), "ngắn");
        assert_eq!(truncate_body("Tiết kiệm", 5), "Tiết…");
        assert_eq!(truncate_body("Tiết kiệm", 5).chars().count(), 5);
    }
}
