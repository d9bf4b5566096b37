use crate::app_state::AppState;
use crate::error::{Error, Result};
use crate::models::{PromptInput, PromptTemplate};
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

pub async fn get_prompt_handler(State(app_state): State<AppState>) -> Json<Value> {
    Json(json!({ "text": app_state.persona_prompt.current() }))
}

pub async fn save_prompt_handler(
    State(app_state): State<AppState>,
    Json(input): Json<PromptInput>,
) -> Result<Json<PromptTemplate>> {
    if input.text.trim().is_empty() {
        return Err(Error::Validation("text is empty".to_string()));
    }
    Ok(Json(app_state.persona_prompt.set(&input.text)?))
}

pub fn run_refresh_prompt_job(app_state: AppState) {
    tokio::spawn(async move {
        app_state.persona_prompt.refresh();
        debug!("Persona prompt refreshed.");
    });
}
