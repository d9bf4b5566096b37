/*!
Expenses confirmed by the user, one document per captured or typed bill.
*/

use super::{BillItem, Confidence, HasId, Sortable};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How the bill was captured.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExpenseSource {
    Camera,
    Text,
    Audio,
    #[default]
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub description: String,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// `YYYY-MM` of `created_at`.
    pub month: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub source: ExpenseSource,
    /// Bill date as read from the receipt, may differ from `created_at`.
    #[serde(default)]
    pub extracted_date: Option<NaiveDate>,
    #[serde(default)]
    pub items: Option<Vec<BillItem>>,
    #[serde(default)]
    pub confidence: Option<Confidence>,
    #[serde(default)]
    pub raw_text: Option<String>,
    /// Reference into external image storage.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Expense {
    pub fn snapshot(&self) -> ExpenseSnapshot {
        ExpenseSnapshot {
            amount: self.amount,
            description: self.description.clone(),
            category: self.category.clone(),
            merchant_name: self.merchant_name.clone(),
        }
    }
}

impl HasId for Expense {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Sortable for Expense {
    fn sortable_value(&self) -> impl Ord {
        self.created_at
    }
}

/// The few expense fields copied into chat messages and prompts.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSnapshot {
    pub amount: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
}

/// Request body for creating an expense.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewExpense {
    pub amount: f64,
    pub description: String,
    pub merchant_name: Option<String>,
    pub category: Option<String>,
    pub source: ExpenseSource,
    pub extracted_date: Option<NaiveDate>,
    pub items: Option<Vec<BillItem>>,
    pub confidence: Option<Confidence>,
    pub raw_text: Option<String>,
    pub image_url: Option<String>,
}
