use crate::app_state::AppState;
use crate::genai::prompts::{format_vnd, EXPENSE_REPLY_FALLBACK};
use crate::genai::{Content, GenerateContentRequest, GenerationConfig, Role};
use crate::models::{ChatMessage, Expense, Sender};
use tracing::{error, info, warn};

/// Chat line written on the user's behalf for a new expense.
pub fn expense_summary_line(expense: &Expense) -> String {
    let mut line = format!(
        "Tôi vừa chi {} VNĐ cho {}",
        format_vnd(expense.amount),
        expense.description
    );
    if let Some(merchant) = &expense.merchant_name {
        line.push_str(&format!(" tại {}", merchant));
    }
    if let Some(category) = &expense.category {
        line.push_str(&format!(" ({})", category));
    }
    line
}

fn persona_request(persona_prompt: &str, expense: &Expense) -> GenerateContentRequest {
    let expense_json = serde_json::to_string_pretty(&expense.snapshot())
        .unwrap_or_else(|_| expense_summary_line(expense));
    let prompt = format!(
        "{}\n\nChi tiêu mới của người dùng:\n{}",
        persona_prompt.trim(),
        expense_json
    );
    GenerateContentRequest::new(
        vec![Content::text(Role::User, prompt)],
        GenerationConfig::plain_text(),
    )
}

/// Records the expense in the chat log and answers it in the persona's voice.
pub async fn on_expense_created(app_state: &AppState, expense: &Expense) {
    info!("Expense created: {}", expense.id);

    let user_line = ChatMessage::new(&expense.user_id, Sender::User, expense_summary_line(expense))
        .with_expense_context(expense.snapshot());
    if let Err(e) = app_state.add_chat_message(user_line) {
        error!("Error saving expense chat line for {}: {}", expense.id, e);
    }

    let persona_prompt = app_state.persona_prompt.refresh();

    let reply = match app_state
        .model
        .generate_content(persona_request(&persona_prompt, expense))
        .await
    {
        Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
        Ok(_) => {
            warn!("Empty persona reply for expense {}", expense.id);
            EXPENSE_REPLY_FALLBACK.to_string()
        }
        Err(e) => {
            error!("Persona reply failed for expense {}: {}", expense.id, e);
            EXPENSE_REPLY_FALLBACK.to_string()
        }
    };

    let reply_line = ChatMessage::new(&expense.user_id, Sender::Ai, reply)
        .with_expense_context(expense.snapshot());
    if let Err(e) = app_state.add_chat_message(reply_line) {
        error!("Error saving persona reply for {}: {}", expense.id, e);
    }
}
