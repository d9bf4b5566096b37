use crate::app_state::AppState;
use crate::error::{Error, Result};
use crate::genai::{extract_or_manual_entry, BillInput};
use crate::models::ExtractionOutcome;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TextBillRequest {
    pub text: String,
}

/// Raw image body; the MIME type comes from `Content-Type`.
pub async fn extract_image_bill_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ExtractionOutcome>> {
    if body.is_empty() {
        return Err(Error::Validation("image body is empty".to_string()));
    }

    let mime_type = headers
        .get(CONTENT_TYPE)
        .and_then(|it| it.to_str().ok())
        .filter(|it| it.starts_with("image/"))
        .unwrap_or("image/jpeg")
        .to_string();

    let input = BillInput::Image {
        bytes: body.to_vec(),
        mime_type,
    };
    Ok(Json(
        extract_or_manual_entry(
            app_state.model.as_ref(),
            &input,
            &app_state.settings.expense_categories,
        )
        .await,
    ))
}

pub async fn extract_text_bill_handler(
    State(app_state): State<AppState>,
    Json(request): Json<TextBillRequest>,
) -> Result<Json<ExtractionOutcome>> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(Error::Validation("text is empty".to_string()));
    }

    let input = BillInput::Text(text.to_string());
    Ok(Json(
        extract_or_manual_entry(
            app_state.model.as_ref(),
            &input,
            &app_state.settings.expense_categories,
        )
        .await,
    ))
}
