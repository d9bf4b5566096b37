use crate::app_state::AppState;
use crate::error::{Error, Result};
use crate::models::{DeviceTokenInput, NotificationInput, NotificationRequest, UserProfile};
use crate::triggers::enqueue_notification;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::info;

/// Merges the device token into the profile, other fields are kept.
pub async fn save_device_token_handler(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<DeviceTokenInput>,
) -> Result<Json<UserProfile>> {
    let token = input.token.trim();
    if token.is_empty() {
        return Err(Error::Validation("token is empty".to_string()));
    }

    let mut profile = app_state
        .user_db
        .find_by_id(&user_id)
        .unwrap_or_else(|| UserProfile {
            id: user_id.clone(),
            ..Default::default()
        });
    profile.fcm_token = Some(token.to_string());
    profile.fcm_token_updated_at = Some(Utc::now());
    if input.platform.is_some() {
        profile.platform = input.platform;
    }

    app_state.user_db.upsert(profile.clone())?;
    info!("Device token saved for user {}", user_id);
    Ok(Json(profile))
}

pub async fn queue_notification_handler(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<NotificationInput>,
) -> Result<(StatusCode, Json<NotificationRequest>)> {
    if input.title.trim().is_empty() {
        return Err(Error::Validation("title is empty".to_string()));
    }
    let request = enqueue_notification(&app_state, &user_id, input)?;
    Ok((StatusCode::ACCEPTED, Json(request)))
}
