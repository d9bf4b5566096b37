use super::api::GenerativeModel;
use super::extraction::{extract_json, string_field};
use super::gemini_request::{Content, GenerateContentRequest, GenerationConfig, Role};
use super::prompts::{analysis_prompt, format_vnd, ANALYSIS_FALLBACK_COMMENT};
use crate::error::Result;
use crate::models::Expense;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use tracing::{error, info};

#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Warning,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseAnalysis {
    pub comment: String,
    pub sentiment: Sentiment,
    pub suggestions: Vec<String>,
    pub financial_tip: Option<String>,
}

impl Default for ExpenseAnalysis {
    fn default() -> Self {
        Self {
            comment: ANALYSIS_FALLBACK_COMMENT.to_string(),
            sentiment: Sentiment::Neutral,
            suggestions: Vec::new(),
            financial_tip: None,
        }
    }
}

pub fn parse_expense_analysis(reply: &str) -> std::result::Result<ExpenseAnalysis, super::ExtractionError> {
    let json = extract_json(reply)?;

    Ok(ExpenseAnalysis {
        comment: string_field(&json, "comment")
            .unwrap_or_else(|| ANALYSIS_FALLBACK_COMMENT.to_string()),
        sentiment: string_field(&json, "sentiment")
            .and_then(|it| Sentiment::from_str(&it).ok())
            .unwrap_or_default(),
        suggestions: json
            .get("suggestions")
            .and_then(Value::as_array)
            .map(|it| {
                it.iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .take(2)
                    .collect()
            })
            .unwrap_or_default(),
        financial_tip: string_field(&json, "financialTip"),
    })
}

fn expense_block(expense: &Expense) -> String {
    let mut lines = vec![
        format!("Chi tiêu: {} VNĐ", format_vnd(expense.amount)),
        format!("Mô tả: {}", expense.description),
        format!("Danh mục: {}", expense.category.as_deref().unwrap_or("Khác")),
    ];
    if let Some(merchant) = &expense.merchant_name {
        lines.push(format!("Nơi mua: {}", merchant));
    }
    lines.join("\n")
}

fn budget_block(monthly_budget: Option<f64>, current_spending: Option<f64>) -> String {
    match monthly_budget.filter(|it| *it != 0.0) {
        Some(budget) => format!(
            "Ngân sách tháng này: {} VNĐ. Đã chi: {} VNĐ.",
            format_vnd(budget),
            format_vnd(current_spending.unwrap_or(0.0))
        ),
        None => String::new(),
    }
}

async fn request_analysis(
    model: &dyn GenerativeModel,
    expense: &Expense,
    monthly_budget: Option<f64>,
    current_spending: Option<f64>,
) -> Result<ExpenseAnalysis> {
    let prompt = analysis_prompt(
        &expense_block(expense),
        &budget_block(monthly_budget, current_spending),
    );
    let request = GenerateContentRequest::new(
        vec![Content::text(Role::User, prompt)],
        GenerationConfig::json(),
    );
    let reply = model.generate_content(request).await?;
    Ok(parse_expense_analysis(&reply)?)
}

/// Comments on one expense; every failure yields the default analysis.
pub async fn analyze_expense(
    model: &dyn GenerativeModel,
    expense: &Expense,
    monthly_budget: Option<f64>,
    current_spending: Option<f64>,
) -> ExpenseAnalysis {
    match request_analysis(model, expense, monthly_budget, current_spending).await {
        Ok(analysis) => {
            info!("Expense {} analysed as {}", expense.id, analysis.sentiment);
            analysis
        }
        Err(e) => {
            error!("Error analyzing expense {}: {}", expense.id, e);
            ExpenseAnalysis::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_analysis() {
        let reply = "```json\n{\"comment\": \"Hợp lý!\", \"sentiment\": \"Warning\", \"suggestions\": [\"a\", \"b\", \"c\"], \"financialTip\": null}\n```";
        let analysis = parse_expense_analysis(reply).unwrap();

        assert_eq!(analysis.comment, "Hợp lý!");
        assert_eq!(analysis.sentiment, Sentiment::Warning);
        assert_eq!(analysis.suggestions, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(analysis.financial_tip, None);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let analysis = parse_expense_analysis("{}").unwrap();
        assert_eq!(analysis, ExpenseAnalysis::default());
    }

    #[test]
    fn budget_block_is_empty_without_budget() {
        assert_eq!(budget_block(None, Some(1000.0)), "");
        assert_eq!(
            budget_block(Some(2_000_000.0), None),
            "Ngân sách tháng này: 2.000.000 VNĐ. Đã chi: 0 VNĐ."
        );
    }
}
