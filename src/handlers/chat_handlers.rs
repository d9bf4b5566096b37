use crate::app_state::AppState;
use crate::error::{Error, Result};
use crate::genai::prompts::{CHAT_APOLOGY, CHAT_WELCOME};
use crate::genai::{chat_about_expenses, history_window};
use crate::models::{current_month, ChatExchange, ChatMessage, ChatRequest, Sender};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info};

const DEFAULT_CHAT_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct ChatHistoryQuery {
    pub limit: Option<usize>,
}

fn welcome_message(user_id: &str) -> ChatMessage {
    ChatMessage {
        id: "welcome".to_string(),
        user_id: user_id.to_string(),
        sender: Sender::Ai,
        text: CHAT_WELCOME.to_string(),
        timestamp: Utc::now(),
        expense_context: None,
    }
}

pub async fn chat_history_handler(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ChatHistoryQuery>,
) -> Json<Vec<ChatMessage>> {
    let limit = query.limit.unwrap_or(DEFAULT_CHAT_LIMIT);
    let messages = app_state.chat_message_db.find_by_user(&user_id, limit);
    if messages.is_empty() {
        return Json(vec![welcome_message(&user_id)]);
    }
    Json(messages)
}

/// Stores the question, asks the persona and stores exactly one reply.
pub async fn send_chat_message_handler(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatExchange>> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(Error::Validation("text is empty".to_string()));
    }

    let window = app_state.settings.chat_history_window;
    let prior = app_state.chat_message_db.latest_by_user(&user_id, window);
    let user_message =
        app_state.add_chat_message(ChatMessage::new(&user_id, Sender::User, text))?;

    let context = app_state.user_context(&user_id, &current_month());
    let reply_text = match chat_about_expenses(
        app_state.model.as_ref(),
        &app_state.persona_prompt.current(),
        text,
        history_window(&prior, window),
        &context,
    )
    .await
    {
        Ok(reply) if !reply.trim().is_empty() => reply,
        Ok(_) => {
            error!("Blank AI response for user {}", user_id);
            CHAT_APOLOGY.to_string()
        }
        Err(e) => {
            error!("Error getting AI response for user {}: {}", user_id, e);
            CHAT_APOLOGY.to_string()
        }
    };

    let reply = app_state.add_chat_message(ChatMessage::new(&user_id, Sender::Ai, reply_text))?;

    Ok(Json(ChatExchange {
        user_message,
        reply,
    }))
}

pub async fn delete_chat_history_handler(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode> {
    let removed = app_state.chat_message_db.delete_by_user(&user_id)?;
    info!("Deleted {} chat messages of user {}", removed, user_id);
    Ok(StatusCode::NO_CONTENT)
}
