/*!
Bill extraction: ask the model to read a bill and turn its reply into a [`BillExtraction`].

The reply is free text that is expected to contain a JSON object, possibly wrapped in
Markdown code fences. Only presence checks are applied to the decoded object; missing
fields get default values.
*/

use super::api::GenerativeModel;
use super::gemini_request::{Content, GenerateContentRequest, GenerationConfig, Part};
use super::prompts::bill_extraction_prompt;
use crate::error::Result;
use crate::models::{BillExtraction, BillItem, Confidence, ExtractionOutcome, FALLBACK_DESCRIPTION};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{info, warn};

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\n?").expect("valid code fence regex"));

// greedy: from the first `{` to the last `}`
static JSON_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid JSON span regex"));

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Không tìm thấy dữ liệu JSON trong phản hồi")]
    NoJsonFound,

    #[error("Invalid JSON in model reply: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

/// What the user captured.
#[derive(Debug, Clone)]
pub enum BillInput {
    Image { bytes: Vec<u8>, mime_type: String },
    Text(String),
}

/// Strips code fences and decodes the first-to-last brace span of `reply`.
pub fn extract_json(reply: &str) -> std::result::Result<Value, ExtractionError> {
    let cleaned = CODE_FENCE.replace_all(reply, "");
    let span = JSON_SPAN
        .find(cleaned.trim())
        .ok_or(ExtractionError::NoJsonFound)?;
    serde_json::from_str(span.as_str()).map_err(ExtractionError::InvalidJson)
}

pub fn parse_bill_extraction(reply: &str) -> std::result::Result<BillExtraction, ExtractionError> {
    let json = extract_json(reply)?;

    Ok(BillExtraction {
        amount: number_field(&json, "amount").filter(|it| *it != 0.0),
        merchant_name: string_field(&json, "merchantName"),
        description: string_field(&json, "description")
            .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string()),
        date: string_field(&json, "date")
            .and_then(|it| NaiveDate::parse_from_str(&it, "%Y-%m-%d").ok()),
        items: json.get("items").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(|it| serde_json::from_value::<BillItem>(it.clone()).ok())
                .collect()
        }),
        raw_text: reply.to_string(),
        confidence: string_field(&json, "confidence")
            .and_then(|it| Confidence::from_str(&it).ok())
            .unwrap_or_default(),
        category: string_field(&json, "category"),
    })
}

/// Non-blank string value of `key`.
pub(crate) fn string_field(json: &Value, key: &str) -> Option<String> {
    json.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|it| !it.is_empty())
        .map(String::from)
}

/// Finite number value of `key`, numeric strings accepted.
pub(crate) fn number_field(json: &Value, key: &str) -> Option<f64> {
    let number = match json.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|it| it.is_finite())
}

fn extraction_request(input: &BillInput, categories: &[String]) -> GenerateContentRequest {
    let mut parts = vec![Part::text(bill_extraction_prompt(categories))];
    match input {
        BillInput::Image { bytes, mime_type } => {
            parts.push(Part::inline_data(mime_type.clone(), STANDARD.encode(bytes)));
        }
        BillInput::Text(text) => parts.push(Part::text(text.clone())),
    }
    GenerateContentRequest::new(vec![Content::user(parts)], GenerationConfig::json())
}

/// Calls the model once and parses its reply.
pub async fn extract_bill(
    model: &dyn GenerativeModel,
    input: &BillInput,
    categories: &[String],
) -> Result<BillExtraction> {
    let reply = model
        .generate_content(extraction_request(input, categories))
        .await?;
    Ok(parse_bill_extraction(&reply)?)
}

/// Like [`extract_bill`], but any failure ends in the manual entry form.
pub async fn extract_or_manual_entry(
    model: &dyn GenerativeModel,
    input: &BillInput,
    categories: &[String],
) -> ExtractionOutcome {
    let reply = match model
        .generate_content(extraction_request(input, categories))
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Bill extraction call failed: {}", e);
            return ExtractionOutcome::manual("", e);
        }
    };

    match parse_bill_extraction(&reply) {
        Ok(extraction) => {
            info!(
                "Bill extracted with {} confidence, amount {:?}",
                extraction.confidence, extraction.amount
            );
            ExtractionOutcome::extracted(extraction)
        }
        Err(e) => {
            warn!("Could not parse bill extraction reply: {}", e);
            ExtractionOutcome::manual(reply, e)
        }
    }
}
