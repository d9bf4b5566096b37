//! Service configuration, read from `.env` and the process environment.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_CATEGORIES: &str =
    "Ăn uống,Di chuyển,Mua sắm,Giải trí,Hóa đơn,Sức khỏe,Giáo dục,Khác";

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub fcm_project_id: Option<String>,
    pub fcm_access_token: Option<String>,
    pub listen_addr: String,
    pub db_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub prompt_refresh_minutes: u32,
    pub notification_poll_seconds: u32,
    /// Number of prior chat messages sent along with a new question.
    pub chat_history_window: usize,
    pub expense_categories: Vec<String>,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let gemini_api_key = dotenv::var("GEMINI_API_KEY")
            .map_err(|_| Error::Config("GEMINI_API_KEY is not set".to_string()))?;

        Ok(Self {
            gemini_api_key,
            gemini_model: var_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_base_url: var_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            fcm_project_id: optional_var("FCM_PROJECT_ID"),
            fcm_access_token: optional_var("FCM_ACCESS_TOKEN"),
            listen_addr: var_or("LISTEN_ADDR", "0.0.0.0:3000"),
            db_dir: PathBuf::from(var_or("DB_DIR", "db")),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", 60)?,
            prompt_refresh_minutes: parse_var("PROMPT_REFRESH_MINUTES", 10)?,
            notification_poll_seconds: parse_var("NOTIFICATION_POLL_SECONDS", 30)?,
            chat_history_window: parse_var::<usize>("CHAT_HISTORY_WINDOW", 6)?.clamp(2, 6),
            expense_categories: parse_categories(&var_or(
                "EXPENSE_CATEGORIES",
                DEFAULT_CATEGORIES,
            )),
            log_level: parse_var("LOG_LEVEL", tracing::Level::DEBUG)?,
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    dotenv::var(key).ok().filter(|it| !it.trim().is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    optional_var(key).unwrap_or_else(|| default.to_string())
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T> {
    match optional_var(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| Error::Config(format!("{} has an invalid value: {}", key, value))),
        None => Ok(default),
    }
}

pub fn parse_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|it| !it.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_trimmed_and_empty_entries_dropped() {
        assert_eq!(
            parse_categories(" Ăn uống , ,Khác,"),
            vec!["Ăn uống".to_string(), "Khác".to_string()]
        );
    }

    #[test]
    fn default_categories_parse() {
        let categories = parse_categories(DEFAULT_CATEGORIES);
        assert_eq!(categories.len(), 8);
        assert_eq!(categories.last().map(String::as_str), Some("Khác"));
    }
}
