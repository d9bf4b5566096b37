use crate::app_state::AppState;
use crate::genai::prompts::PUSH_TITLE;
use crate::models::{ChatMessage, Sender};
use crate::push::{truncate_body, PushMessage};
use std::collections::BTreeMap;
use tracing::{error, info};

const MAX_PUSH_BODY_CHARS: usize = 200;

/// Pushes assistant messages to the owner's device. Users without a token are skipped.
pub async fn on_chat_message_created(app_state: &AppState, message: &ChatMessage) {
    if message.sender != Sender::Ai {
        return;
    }

    let Some(token) = app_state.user_db.device_token(&message.user_id) else {
        info!(
            "No device token for user {}, skipping push of message {}",
            message.user_id, message.id
        );
        return;
    };

    let push = PushMessage {
        token,
        title: PUSH_TITLE.to_string(),
        body: truncate_body(&message.text, MAX_PUSH_BODY_CHARS),
        data: BTreeMap::from([
            ("type".to_string(), "chat".to_string()),
            ("messageId".to_string(), message.id.clone()),
        ]),
    };

    match app_state.push.send(push).await {
        Ok(()) => info!("Pushed message {} to user {}", message.id, message.user_id),
        Err(e) => error!("Error pushing message {}: {}", message.id, e),
    }
}
