use super::MonthQuery;
use crate::app_state::AppState;
use crate::csv::{ExpenseCsv, VecToCsv};
use crate::error::{Error, Result};
use crate::genai::{analyze_expense, ExpenseAnalysis};
use crate::models::{month_key, new_document_id, Expense, NewExpense};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::info;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|it| it.trim().to_string())
        .filter(|it| !it.is_empty())
}

/// Validates a capture and turns it into an expense of the current month.
pub fn new_expense(user_id: &str, input: NewExpense) -> Result<Expense> {
    if !input.amount.is_finite() || input.amount <= 0.0 {
        return Err(Error::Validation("amount must be greater than 0".to_string()));
    }
    let description = input.description.trim();
    if description.is_empty() {
        return Err(Error::Validation("description is required".to_string()));
    }

    let created_at = Utc::now();
    Ok(Expense {
        id: new_document_id(),
        user_id: user_id.to_string(),
        amount: input.amount,
        description: description.to_string(),
        merchant_name: non_blank(input.merchant_name),
        category: non_blank(input.category),
        month: month_key(created_at),
        created_at,
        source: input.source,
        extracted_date: input.extracted_date,
        items: input.items,
        confidence: input.confidence,
        raw_text: input.raw_text,
        image_url: non_blank(input.image_url),
    })
}

pub async fn create_expense_handler(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<NewExpense>,
) -> Result<(StatusCode, Json<Expense>)> {
    let expense = app_state.add_expense(new_expense(&user_id, input)?)?;
    info!("Saved expense {} for user {}", expense.id, user_id);
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn list_expenses_handler(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<Expense>>> {
    let month = query.resolve()?;
    Ok(Json(
        app_state.expense_db.find_by_user_and_month(&user_id, &month),
    ))
}

pub async fn expenses_to_csv_handler(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Result<String> {
    let month = query.resolve()?;
    let expenses_csv: Vec<ExpenseCsv> = app_state
        .expense_db
        .find_by_user_and_month(&user_id, &month)
        .iter()
        .map(|it| it.into())
        .collect();
    Ok(expenses_csv.to_csv())
}

pub async fn analyze_expense_handler(
    State(app_state): State<AppState>,
    Path((user_id, expense_id)): Path<(String, String)>,
) -> Result<Json<ExpenseAnalysis>> {
    let expense = app_state
        .expense_db
        .find_for_user(&user_id, &expense_id)
        .ok_or_else(|| Error::NotFound(format!("expense {}", expense_id)))?;

    let summary = app_state.monthly_summary(&user_id, &expense.month);
    Ok(Json(
        analyze_expense(
            app_state.model.as_ref(),
            &expense,
            summary.total_budget,
            Some(summary.total_spent),
        )
        .await,
    ))
}
