/*!
Structured bill data produced by the extraction model.
*/

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Description used when the model (or the user) gives none.
pub const FALLBACK_DESCRIPTION: &str = "Chi tiêu";

/// Self-reported certainty the model attaches to its own extraction.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Confidence {
    /// Clear bill.
    High,
    /// Some fields uncertain.
    Medium,
    /// Unclear bill or missing information.
    #[default]
    Low,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillItem {
    pub name: String,
    /// Unit price.
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
}

fn default_quantity() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillExtraction {
    pub amount: Option<f64>,
    pub merchant_name: Option<String>,
    pub description: String,
    pub date: Option<NaiveDate>,
    pub items: Option<Vec<BillItem>>,
    /// Model reply exactly as received.
    pub raw_text: String,
    pub confidence: Confidence,
    pub category: Option<String>,
}

impl BillExtraction {
    /// Empty form the user fills in by hand when extraction failed.
    pub fn manual_entry(raw_text: impl Into<String>) -> Self {
        Self {
            amount: None,
            merchant_name: None,
            description: FALLBACK_DESCRIPTION.to_string(),
            date: None,
            items: None,
            raw_text: raw_text.into(),
            confidence: Confidence::Low,
            category: None,
        }
    }
}

/// Response of the bill capture endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionOutcome {
    pub extraction: BillExtraction,
    /// True when extraction failed and the caller should show the manual form.
    pub manual_entry: bool,
    pub error: Option<String>,
}

impl ExtractionOutcome {
    pub fn extracted(extraction: BillExtraction) -> Self {
        Self {
            extraction,
            manual_entry: false,
            error: None,
        }
    }

    pub fn manual(raw_text: impl Into<String>, error: impl ToString) -> Self {
        Self {
            extraction: BillExtraction::manual_entry(raw_text),
            manual_entry: true,
            error: Some(error.to_string()),
        }
    }
}
