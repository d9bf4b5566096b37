/*!
Persona chat: a short window of prior turns plus the persona prompt and the user's
spending context, sent as the opening of a chat session. The reply is prose and is
returned untouched.
*/

use super::api::GenerativeModel;
use super::gemini_request::{Content, GenerateContentRequest, GenerationConfig, Role};
use super::prompts::format_vnd;
use crate::error::Result;
use crate::models::{ChatMessage, ExpenseSnapshot, Sender};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl From<&ChatMessage> for ChatTurn {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: match message.sender {
                Sender::User => Role::User,
                Sender::Ai => Role::Model,
            },
            text: message.text.clone(),
        }
    }
}

/// Turns of the last `window` messages, oldest first.
pub fn history_window(messages: &[ChatMessage], window: usize) -> Vec<ChatTurn> {
    let skip = messages.len().saturating_sub(window);
    messages[skip..].iter().map(ChatTurn::from).collect()
}

/// Drops leading model turns; a chat session has to open with a user turn.
pub fn normalize_history(turns: Vec<ChatTurn>) -> Vec<ChatTurn> {
    let leading = turns
        .iter()
        .take_while(|it| it.role == Role::Model)
        .count();
    turns.into_iter().skip(leading).collect()
}

/// What the assistant knows about the user's month.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub monthly_budget: Option<f64>,
    pub current_spending: Option<f64>,
    pub recent_expenses: Vec<ExpenseSnapshot>,
}

impl UserContext {
    /// Vietnamese context block; zero figures are left out.
    pub fn render(&self) -> String {
        let mut lines = vec!["Thông tin ngữ cảnh người dùng:".to_string()];

        if let Some(budget) = self.monthly_budget.filter(|it| *it != 0.0) {
            lines.push(format!("- Ngân sách tháng: {} VNĐ", format_vnd(budget)));
        }
        if let Some(spending) = self.current_spending.filter(|it| *it != 0.0) {
            lines.push(format!("- Đã chi tiêu: {} VNĐ", format_vnd(spending)));
        }
        if !self.recent_expenses.is_empty() {
            lines.push("- Chi tiêu gần đây:".to_string());
            for expense in &self.recent_expenses {
                lines.push(format!(
                    "  + {} VNĐ - {} ({})",
                    format_vnd(expense.amount),
                    expense.description,
                    expense.category.as_deref().unwrap_or("Khác")
                ));
            }
        }

        lines.join("\n")
    }
}

pub fn build_system_prompt(persona_prompt: &str, context: &UserContext) -> String {
    format!(
        "{}\nDữ liệu ngữ cảnh người dùng:\n{}",
        persona_prompt.trim(),
        context.render()
    )
}

fn chat_request(
    persona_prompt: &str,
    user_message: &str,
    history: Vec<ChatTurn>,
    context: &UserContext,
) -> GenerateContentRequest {
    let mut contents: Vec<Content> = normalize_history(history)
        .into_iter()
        .map(|turn| Content::text(turn.role, turn.text))
        .collect();

    contents.push(Content::text(
        Role::User,
        format!(
            "{}\n\nUser: {}",
            build_system_prompt(persona_prompt, context),
            user_message
        ),
    ));

    GenerateContentRequest::new(contents, GenerationConfig::plain_text())
}

/// Sends one chat turn and returns the raw reply. Errors are left to the caller.
pub async fn chat_about_expenses(
    model: &dyn GenerativeModel,
    persona_prompt: &str,
    user_message: &str,
    history: Vec<ChatTurn>,
    context: &UserContext,
) -> Result<String> {
    let request = chat_request(persona_prompt, user_message, history, context);
    info!(
        "Calling Gemini for a chat reply with {} prior turns",
        request.contents.len() - 1
    );
    model.generate_content(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: Role, text: &str) -> ChatTurn {
        ChatTurn {
            role,
            text: text.to_string(),
        }
    }

    #[test]
    fn drops_exactly_the_leading_model_turns() {
        let turns = vec![
            turn(Role::Model, "welcome"),
            turn(Role::Model, "comment"),
            turn(Role::User, "question"),
            turn(Role::Model, "answer"),
        ];
        let normalized = normalize_history(turns);

        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0], turn(Role::User, "question"));
        assert_eq!(normalized[1].role, Role::Model);
    }

    #[test]
    fn only_model_turns_normalize_to_empty() {
        let normalized = normalize_history(vec![turn(Role::Model, "a"), turn(Role::Model, "b")]);
        assert!(normalized.is_empty());
    }

    #[test]
    fn history_starting_with_user_is_untouched() {
        let turns = vec![turn(Role::User, "a"), turn(Role::Model, "b")];
        assert_eq!(normalize_history(turns.clone()), turns);
    }

    #[test]
    fn window_keeps_the_latest_messages() {
        let messages: Vec<ChatMessage> = (0..8)
            .map(|i| {
                let sender = if i % 2 == 0 { Sender::User } else { Sender::Ai };
                ChatMessage::new("u1", sender, format!("m{}", i))
            })
            .collect();
        let window = history_window(&messages, 6);

        assert_eq!(window.len(), 6);
        assert_eq!(window[0].text, "m2");
        assert_eq!(window[5], turn(Role::Model, "m7"));
        assert_eq!(history_window(&messages[..2], 6).len(), 2);
    }

    #[test]
    fn context_omits_zero_figures() {
        let context = UserContext {
            monthly_budget: Some(5_000_000.0),
            current_spending: Some(0.0),
            recent_expenses: vec![ExpenseSnapshot {
                amount: 45000.0,
                description: "Cà phê".to_string(),
                category: Some("Ăn uống".to_string()),
                merchant_name: None,
            }],
        };
        let rendered = context.render();

        assert!(rendered.contains("- Ngân sách tháng: 5.000.000 VNĐ"));
        assert!(!rendered.contains("Đã chi tiêu"));
        assert!(rendered.contains("  + 45.000 VNĐ - Cà phê (Ăn uống)"));
    }

    #[test]
    fn request_ends_with_prompt_and_user_message() {
        let history = vec![turn(Role::Model, "welcome"), turn(Role::User, "hi"), turn(Role::Model, "hello")];
        let request = chat_request("PERSONA", "Tháng này tôi tiêu nhiều không?", history, &UserContext::default());

        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[0].role, Role::User);
        let last = request.contents.last().unwrap();
        assert_eq!(last.role, Role::User);
        let text = last.parts[0].text.as_deref().unwrap();
        assert!(text.starts_with("PERSONA\n"));
        assert!(text.ends_with("\n\nUser: Tháng này tôi tiêu nhiều không?"));
    }
}
