//! Queue of notifications requested through the API, drained by a scheduled job.

use crate::app_state::AppState;
use crate::error::Result;
use crate::models::{new_document_id, NotificationInput, NotificationRequest, NotificationStatus};
use crate::push::PushMessage;
use chrono::Utc;
use tracing::{error, info, warn};

pub fn enqueue_notification(
    app_state: &AppState,
    user_id: &str,
    input: NotificationInput,
) -> Result<NotificationRequest> {
    let request = NotificationRequest {
        id: new_document_id(),
        user_id: user_id.to_string(),
        title: input.title,
        body: input.body,
        data: input.data,
        status: NotificationStatus::Pending,
        created_at: Utc::now(),
        processed_at: None,
    };
    app_state.notification_db.upsert(request.clone())?;
    info!("Notification queued for user: {}", user_id);
    Ok(request)
}

/// Sends every pending notification once and records the result.
pub async fn process_notification_queue(app_state: &AppState) -> Result<usize> {
    let pending = app_state.notification_db.claim_pending()?;
    let count = pending.len();

    for request in pending {
        let status = match app_state.user_db.device_token(&request.user_id) {
            None => {
                warn!("No device token for user {}, skipping notification {}", request.user_id, request.id);
                NotificationStatus::Skipped
            }
            Some(token) => {
                let message = PushMessage {
                    token,
                    title: request.title.clone(),
                    body: request.body.clone(),
                    data: request.data.clone(),
                };
                match app_state.push.send(message).await {
                    Ok(()) => NotificationStatus::Sent,
                    Err(e) => {
                        error!("Error sending notification {}: {}", request.id, e);
                        NotificationStatus::Failed
                    }
                }
            }
        };

        app_state.notification_db.update(&request.id, |it| {
            it.status = status;
            it.processed_at = Some(Utc::now());
        })?;
    }

    Ok(count)
}

pub fn run_notification_queue_job(app_state: AppState) {
    tokio::spawn(async move {
        match process_notification_queue(&app_state).await {
            Ok(0) => {}
            Ok(count) => info!("Processed {} queued notifications.", count),
            Err(e) => error!("Error processing notification queue: {}", e),
        }
    });
}
