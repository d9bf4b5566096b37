mod common;

use bill_persona_connector::genai::prompts::{DEFAULT_PERSONA_PROMPT, EXPENSE_REPLY_FALLBACK, PUSH_TITLE};
use bill_persona_connector::handlers::new_expense;
use bill_persona_connector::models::{
    ChatMessage, Expense, ExpenseSource, NewExpense, NotificationInput, NotificationStatus, Sender,
    UserProfile,
};
use bill_persona_connector::triggers::{
    enqueue_notification, expense_summary_line, handle_event, on_chat_message_created,
    on_expense_created, process_notification_queue, StoreEvent,
};
use common::{test_app, test_app_with_push, unavailable, RecordingPush};
use std::collections::BTreeMap;
use std::time::Duration;

fn cafe_expense() -> Expense {
    new_expense(
        "u1",
        NewExpense {
            amount: 45000.0,
            description: "Cà phê sữa đá".to_string(),
            merchant_name: Some("Highlands".to_string()),
            category: Some("Ăn uống".to_string()),
            source: ExpenseSource::Camera,
            ..Default::default()
        },
    )
    .unwrap()
}

fn register_device(app: &common::TestApp, user_id: &str) {
    app.app_state
        .user_db
        .upsert(UserProfile {
            id: user_id.to_string(),
            fcm_token: Some("device-token".to_string()),
            ..Default::default()
        })
        .unwrap();
}

#[test]
fn summary_line_mentions_amount_merchant_and_category() {
    assert_eq!(
        expense_summary_line(&cafe_expense()),
        "Tôi vừa chi 45.000 VNĐ cho Cà phê sữa đá tại Highlands (Ăn uống)"
    );
}

#[tokio::test]
async fn expense_created_records_user_line_then_persona_reply() {
    let mut app = test_app(vec![Ok("  Lại cà phê à? Ví của bạn đang khóc đấy!  ".to_string())]);
    let expense = cafe_expense();

    on_expense_created(&app.app_state, &expense).await;

    let log = app.app_state.chat_message_db.find_by_user("u1", 50);
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].sender, Sender::User);
    assert_eq!(log[0].expense_context, Some(expense.snapshot()));
    assert_eq!(log[1].sender, Sender::Ai);
    assert_eq!(log[1].text, "Lại cà phê à? Ví của bạn đang khóc đấy!");

    let prompt = app.model.requests()[0].all_text();
    assert!(prompt.starts_with(DEFAULT_PERSONA_PROMPT));
    assert!(prompt.contains("\"merchantName\": \"Highlands\""));

    // both lines go through the message-created trigger
    assert_eq!(app.drain_events().len(), 2);
}

#[tokio::test]
async fn expense_created_uses_fallback_when_model_fails_or_is_blank() {
    for reply in [Err(unavailable()), Ok("   ".to_string())] {
        let app = test_app(vec![reply]);
        on_expense_created(&app.app_state, &cafe_expense()).await;

        let log = app.app_state.chat_message_db.find_by_user("u1", 50);
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].text, EXPENSE_REPLY_FALLBACK);
    }
}

#[tokio::test]
async fn expense_created_reads_the_stored_persona() {
    let app = test_app(vec![Ok("ok".to_string())]);
    app.app_state
        .persona_prompt
        .set("Bạn là một ông cụ hay cằn nhằn.")
        .unwrap();

    on_expense_created(&app.app_state, &cafe_expense()).await;

    assert!(app.model.requests()[0]
        .all_text()
        .starts_with("Bạn là một ông cụ hay cằn nhằn."));
}

#[tokio::test]
async fn assistant_message_is_pushed_to_registered_device() {
    let app = test_app(vec![]);
    register_device(&app, "u1");
    let message = ChatMessage::new("u1", Sender::Ai, "Tháng này bạn đã tiêu 80% ngân sách.");

    on_chat_message_created(&app.app_state, &message).await;

    let sent = app.push.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].token, "device-token");
    assert_eq!(sent[0].title, PUSH_TITLE);
    assert_eq!(sent[0].body, message.text);
    assert_eq!(sent[0].data.get("messageId"), Some(&message.id));
}

#[tokio::test]
async fn user_messages_and_unknown_devices_are_not_pushed() {
    let app = test_app(vec![]);
    register_device(&app, "u1");

    on_chat_message_created(&app.app_state, &ChatMessage::new("u1", Sender::User, "hi")).await;
    on_chat_message_created(&app.app_state, &ChatMessage::new("u2", Sender::Ai, "hi")).await;

    assert!(app.push.sent().is_empty());
}

#[tokio::test]
async fn duplicate_events_are_not_deduplicated() {
    let app = test_app(vec![Ok("một".to_string()), Ok("hai".to_string())]);
    let expense = cafe_expense();

    handle_event(&app.app_state, StoreEvent::ExpenseCreated(expense.clone())).await;
    handle_event(&app.app_state, StoreEvent::ExpenseCreated(expense)).await;

    assert_eq!(app.app_state.chat_message_db.find_by_user("u1", 50).len(), 4);
}

#[tokio::test]
async fn notification_queue_marks_sent_skipped_and_failed() {
    let app = test_app(vec![]);
    register_device(&app, "u1");
    let input = |title: &str| NotificationInput {
        title: title.to_string(),
        body: "body".to_string(),
        data: BTreeMap::new(),
    };

    let sent = enqueue_notification(&app.app_state, "u1", input("a")).unwrap();
    let skipped = enqueue_notification(&app.app_state, "u2", input("b")).unwrap();

    assert_eq!(process_notification_queue(&app.app_state).await.unwrap(), 2);
    let db = &app.app_state.notification_db;
    assert_eq!(db.find_by_id(&sent.id).unwrap().status, NotificationStatus::Sent);
    assert_eq!(db.find_by_id(&skipped.id).unwrap().status, NotificationStatus::Skipped);
    assert!(db.pending().is_empty());
    assert_eq!(app.push.sent().len(), 1);

    // already processed requests are not sent again
    assert_eq!(process_notification_queue(&app.app_state).await.unwrap(), 0);

    let failing = test_app_with_push(
        vec![],
        RecordingPush {
            fail: true,
            ..Default::default()
        },
    );
    register_device(&failing, "u1");
    let request = enqueue_notification(&failing.app_state, "u1", input("c")).unwrap();
    process_notification_queue(&failing.app_state).await.unwrap();
    assert_eq!(
        failing.app_state.notification_db.find_by_id(&request.id).unwrap().status,
        NotificationStatus::Failed
    );
}

#[tokio::test]
async fn overlapping_queue_drains_send_each_request_once() {
    let app = test_app_with_push(
        vec![],
        RecordingPush {
            delay: Some(Duration::from_millis(50)),
            ..Default::default()
        },
    );
    register_device(&app, "u1");
    for title in ["a", "b"] {
        let input = NotificationInput {
            title: title.to_string(),
            body: "body".to_string(),
            data: BTreeMap::new(),
        };
        enqueue_notification(&app.app_state, "u1", input).unwrap();
    }

    let (first, second) = tokio::join!(
        process_notification_queue(&app.app_state),
        process_notification_queue(&app.app_state)
    );

    assert_eq!(first.unwrap() + second.unwrap(), 2);
    assert_eq!(app.push.sent().len(), 2);
    assert!(app
        .app_state
        .notification_db
        .data()
        .iter()
        .all(|it| it.status == NotificationStatus::Sent));
}
