/*!
Reactions to newly created documents.

Inserts publish a [`StoreEvent`] on the [`EventBus`]; [`run_trigger_loop`] handles each
event in its own task. Events are not de-duplicated and carry no ordering guarantee
between each other.
*/

mod chat_message_created;
mod expense_created;
mod notification_queue;

pub use self::chat_message_created::on_chat_message_created;
pub use self::expense_created::{expense_summary_line, on_expense_created};
pub use self::notification_queue::{enqueue_notification, process_notification_queue, run_notification_queue_job};

use crate::app_state::AppState;
use crate::models::{ChatMessage, Expense};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub enum StoreEvent {
    ExpenseCreated(Expense),
    ChatMessageCreated(ChatMessage),
}

#[derive(Clone)]
pub struct EventBus {
    sender: UnboundedSender<StoreEvent>,
}

impl EventBus {
    pub fn new() -> (Self, UnboundedReceiver<StoreEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn publish(&self, event: StoreEvent) {
        if let Err(e) = self.sender.send(event) {
            warn!("Trigger loop is gone, event dropped: {:?}", e.0);
        }
    }
}

pub async fn handle_event(app_state: &AppState, event: StoreEvent) {
    match event {
        StoreEvent::ExpenseCreated(expense) => on_expense_created(app_state, &expense).await,
        StoreEvent::ChatMessageCreated(message) => {
            on_chat_message_created(app_state, &message).await
        }
    }
}

/// Dispatches events until the channel closes.
pub async fn run_trigger_loop(app_state: AppState, mut receiver: UnboundedReceiver<StoreEvent>) {
    info!("Trigger loop started.");
    while let Some(event) = receiver.recv().await {
        debug!("Dispatching {:?}", event);
        let app_state = app_state.clone();
        tokio::spawn(async move {
            handle_event(&app_state, event).await;
        });
    }
    info!("Trigger loop stopped.");
}
