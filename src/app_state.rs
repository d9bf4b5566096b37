use crate::config::{parse_categories, Config, DEFAULT_CATEGORIES};
use crate::db::{BudgetsDb, ChatMessagesDb, ExpensesDb, NotificationsDb, PromptsDb, UsersDb};
use crate::error::Result;
use crate::genai::{GenerativeModel, PersonaPrompt, UserContext};
use crate::models::{ChatMessage, Expense, MonthlySummary};
use crate::push::PushSender;
use crate::triggers::{EventBus, StoreEvent};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Number of recent expenses shown in summaries and sent as chat context.
pub const RECENT_EXPENSES: usize = 5;

#[derive(Debug, Clone)]
pub struct Settings {
    pub expense_categories: Vec<String>,
    pub chat_history_window: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            expense_categories: parse_categories(DEFAULT_CATEGORIES),
            chat_history_window: 6,
        }
    }
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            expense_categories: config.expense_categories.clone(),
            chat_history_window: config.chat_history_window,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub expense_db: ExpensesDb,
    pub budget_db: BudgetsDb,
    pub chat_message_db: ChatMessagesDb,
    pub user_db: UsersDb,
    pub notification_db: NotificationsDb,
    pub persona_prompt: PersonaPrompt,
    pub model: Arc<dyn GenerativeModel>,
    pub push: Arc<dyn PushSender>,
    pub events: EventBus,
    pub settings: Settings,
}

impl AppState {
    /// Opens every collection under `db_dir`. The receiver feeds the trigger loop.
    pub fn open(
        db_dir: &Path,
        model: Arc<dyn GenerativeModel>,
        push: Arc<dyn PushSender>,
        settings: Settings,
    ) -> Result<(Self, UnboundedReceiver<StoreEvent>)> {
        let (events, receiver) = EventBus::new();
        let app_state = AppState {
            expense_db: ExpensesDb::new_expense_db(db_dir)?,
            budget_db: BudgetsDb::new_budget_db(db_dir)?,
            chat_message_db: ChatMessagesDb::new_chat_message_db(db_dir)?,
            user_db: UsersDb::new_user_db(db_dir)?,
            notification_db: NotificationsDb::new_notification_db(db_dir)?,
            persona_prompt: PersonaPrompt::new(PromptsDb::new_prompt_db(db_dir)?),
            model,
            push,
            events,
            settings,
        };
        Ok((app_state, receiver))
    }

    /// Stores a new expense and fires the expense-created trigger.
    pub fn add_expense(&self, expense: Expense) -> Result<Expense> {
        self.expense_db.upsert(expense.clone())?;
        self.events.publish(StoreEvent::ExpenseCreated(expense.clone()));
        Ok(expense)
    }

    /// Appends to a user's chat log and fires the message-created trigger.
    pub fn add_chat_message(&self, message: ChatMessage) -> Result<ChatMessage> {
        self.chat_message_db.upsert(message.clone())?;
        self.events
            .publish(StoreEvent::ChatMessageCreated(message.clone()));
        Ok(message)
    }

    pub fn monthly_summary(&self, user_id: &str, month: &str) -> MonthlySummary {
        let expenses = self.expense_db.find_by_user_and_month(user_id, month);
        let total_budget = self
            .budget_db
            .find_by_user_and_month(user_id, month)
            .map(|it| it.total_budget);
        let total_spent: f64 = expenses.iter().map(|it| it.amount).sum();

        MonthlySummary {
            month: month.to_string(),
            total_budget,
            total_spent,
            remaining: total_budget.map(|budget| budget - total_spent),
            expense_count: expenses.len(),
            recent_expenses: expenses
                .iter()
                .rev()
                .take(RECENT_EXPENSES)
                .map(Expense::snapshot)
                .collect(),
        }
    }

    pub fn user_context(&self, user_id: &str, month: &str) -> UserContext {
        let summary = self.monthly_summary(user_id, month);
        UserContext {
            monthly_budget: summary.total_budget,
            current_spending: Some(summary.total_spent),
            recent_expenses: summary.recent_expenses,
        }
    }
}
