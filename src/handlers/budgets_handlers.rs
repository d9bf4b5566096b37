use super::{resolve_month, MonthQuery};
use crate::app_state::AppState;
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetInput, MonthlySummary};
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use tracing::info;

/// Overwrites the whole budget record of the month.
pub async fn save_budget_handler(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<BudgetInput>,
) -> Result<Json<Budget>> {
    if !input.total_budget.is_finite() || input.total_budget <= 0.0 {
        return Err(Error::Validation(
            "totalBudget must be greater than 0".to_string(),
        ));
    }
    let month = resolve_month(input.month.as_deref())?;

    let now = Utc::now();
    let budget = Budget {
        id: Budget::document_id(&user_id, &month),
        user_id: user_id.clone(),
        month,
        total_budget: input.total_budget,
        created_at: now,
        updated_at: now,
    };
    app_state.budget_db.upsert(budget.clone())?;
    info!("Saved budget {}", budget.id);

    Ok(Json(budget))
}

pub async fn get_budget_handler(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Budget>> {
    let month = query.resolve()?;
    app_state
        .budget_db
        .find_by_user_and_month(&user_id, &month)
        .map(Json)
        .ok_or_else(|| Error::NotFound(format!("budget for {}", month)))
}

pub async fn monthly_summary_handler(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlySummary>> {
    let month = query.resolve()?;
    Ok(Json(app_state.monthly_summary(&user_id, &month)))
}
