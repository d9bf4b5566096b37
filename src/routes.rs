use crate::app_state::AppState;
use crate::handlers::{
    analyze_expense_handler, chat_history_handler, create_expense_handler,
    delete_chat_history_handler, expenses_to_csv_handler, extract_image_bill_handler,
    extract_text_bill_handler, get_budget_handler, get_prompt_handler, list_expenses_handler,
    monthly_summary_handler, queue_notification_handler, save_budget_handler,
    save_device_token_handler, save_prompt_handler, send_chat_message_handler,
};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        // `GET /` goes to `root`
        .route("/", get(root))
        .route(
            "/bills/extract/image",
            post(extract_image_bill_handler).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
        )
        .route("/bills/extract/text", post(extract_text_bill_handler))
        .route(
            "/users/{user_id}/expenses",
            get(list_expenses_handler).post(create_expense_handler),
        )
        .route("/users/{user_id}/expenses/csv", get(expenses_to_csv_handler))
        .route(
            "/users/{user_id}/expenses/{expense_id}/analysis",
            post(analyze_expense_handler),
        )
        .route(
            "/users/{user_id}/budget",
            get(get_budget_handler).put(save_budget_handler),
        )
        .route("/users/{user_id}/summary", get(monthly_summary_handler))
        .route(
            "/users/{user_id}/chat",
            get(chat_history_handler)
                .post(send_chat_message_handler)
                .delete(delete_chat_history_handler),
        )
        .route("/users/{user_id}/device-token", put(save_device_token_handler))
        .route(
            "/users/{user_id}/notifications",
            post(queue_notification_handler),
        )
        .route("/prompt", get(get_prompt_handler).put(save_prompt_handler))
        .with_state(app_state)
}

async fn root() -> String {
    "ok".to_string()
}
