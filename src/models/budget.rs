use super::{HasId, Sortable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Monthly budget, one per (user, month), overwritten wholesale on each save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// `{user_id}_{month}`
    pub id: String,
    pub user_id: String,
    pub month: String,
    pub total_budget: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn document_id(user_id: &str, month: &str) -> String {
        format!("{}_{}", user_id, month)
    }
}

impl HasId for Budget {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Sortable for Budget {
    fn sortable_value(&self) -> impl Ord {
        self.id.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetInput {
    pub total_budget: f64,
    #[serde(default)]
    pub month: Option<String>,
}

/// Budget view of one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub month: String,
    pub total_budget: Option<f64>,
    pub total_spent: f64,
    pub remaining: Option<f64>,
    pub expense_count: usize,
    pub recent_expenses: Vec<super::ExpenseSnapshot>,
}
