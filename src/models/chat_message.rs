use super::{new_document_id, ExpenseSnapshot, HasId, Sortable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    User,
    /// The persona assistant.
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub user_id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_context: Option<ExpenseSnapshot>,
}

impl ChatMessage {
    pub fn new(user_id: &str, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: new_document_id(),
            user_id: user_id.to_string(),
            sender,
            text: text.into(),
            timestamp: Utc::now(),
            expense_context: None,
        }
    }

    pub fn with_expense_context(mut self, snapshot: ExpenseSnapshot) -> Self {
        self.expense_context = Some(snapshot);
        self
    }
}

impl HasId for ChatMessage {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Sortable for ChatMessage {
    fn sortable_value(&self) -> impl Ord {
        self.timestamp
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatExchange {
    pub user_message: ChatMessage,
    pub reply: ChatMessage,
}
