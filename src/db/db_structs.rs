use super::db_base::StructFileDb;
use crate::error::Result;
use crate::models::{
    Budget, ChatMessage, Expense, NotificationRequest, NotificationStatus, PromptTemplate,
    UserProfile,
};
use std::path::Path;
use tracing::info;

pub type ExpensesDb = StructFileDb<Expense>;

impl ExpensesDb {
    pub fn new_expense_db(db_dir: &Path) -> Result<Self> {
        let res = StructFileDb::<Expense>::new(db_dir.join("expenses.json"));
        info!("Expenses DB initialized.");
        res
    }

    /// Expenses of one user in one month, oldest first.
    pub fn find_by_user_and_month(&self, user_id: &str, month: &str) -> Vec<Expense> {
        self.filter(|it| it.user_id == user_id && it.month == month)
    }

    pub fn find_for_user(&self, user_id: &str, id: &str) -> Option<Expense> {
        self.find_by_id(id).filter(|it| it.user_id == user_id)
    }
}

pub type BudgetsDb = StructFileDb<Budget>;

impl BudgetsDb {
    pub fn new_budget_db(db_dir: &Path) -> Result<Self> {
        let res = StructFileDb::<Budget>::new(db_dir.join("budgets.json"));
        info!("Budgets DB initialized.");
        res
    }

    pub fn find_by_user_and_month(&self, user_id: &str, month: &str) -> Option<Budget> {
        self.find_by_id(&Budget::document_id(user_id, month))
    }
}

pub type ChatMessagesDb = StructFileDb<ChatMessage>;

impl ChatMessagesDb {
    pub fn new_chat_message_db(db_dir: &Path) -> Result<Self> {
        let res = StructFileDb::<ChatMessage>::new(db_dir.join("chat_messages.json"));
        info!("Chat messages DB initialized.");
        res
    }

    /// First `limit` messages of a user in timestamp order.
    pub fn find_by_user(&self, user_id: &str, limit: usize) -> Vec<ChatMessage> {
        let mut messages = self.filter(|it| it.user_id == user_id);
        messages.truncate(limit);
        messages
    }

    /// Last `count` messages of a user in timestamp order.
    pub fn latest_by_user(&self, user_id: &str, count: usize) -> Vec<ChatMessage> {
        let messages = self.filter(|it| it.user_id == user_id);
        let skip = messages.len().saturating_sub(count);
        messages.into_iter().skip(skip).collect()
    }

    pub fn delete_by_user(&self, user_id: &str) -> Result<usize> {
        self.delete_where(|it| it.user_id == user_id)
    }
}

pub type UsersDb = StructFileDb<UserProfile>;

impl UsersDb {
    pub fn new_user_db(db_dir: &Path) -> Result<Self> {
        let res = StructFileDb::<UserProfile>::new(db_dir.join("users.json"));
        info!("Users DB initialized.");
        res
    }

    pub fn device_token(&self, user_id: &str) -> Option<String> {
        self.find_by_id(user_id)
            .and_then(|it| it.fcm_token)
            .filter(|it| !it.is_empty())
    }
}

pub type PromptsDb = StructFileDb<PromptTemplate>;

impl PromptsDb {
    pub fn new_prompt_db(db_dir: &Path) -> Result<Self> {
        let res = StructFileDb::<PromptTemplate>::new(db_dir.join("prompts.json"));
        info!("Prompts DB initialized.");
        res
    }
}

pub type NotificationsDb = StructFileDb<NotificationRequest>;

impl NotificationsDb {
    pub fn new_notification_db(db_dir: &Path) -> Result<Self> {
        let res = StructFileDb::<NotificationRequest>::new(db_dir.join("notifications.json"));
        info!("Notifications DB initialized.");
        res
    }

    pub fn pending(&self) -> Vec<NotificationRequest> {
        self.filter(|it| it.status == NotificationStatus::Pending)
    }

    /// Moves every pending request to `sending` and returns them, so a concurrent drain
    /// cannot pick them up again.
    pub fn claim_pending(&self) -> Result<Vec<NotificationRequest>> {
        self.update_where(
            |it| it.status == NotificationStatus::Pending,
            |it| it.status = NotificationStatus::Sending,
        )
    }
}
