mod bill;
mod budget;
mod chat_message;
mod expense;
mod notification;
mod prompt_template;
mod user;

pub use self::bill::*;
pub use self::budget::*;
pub use self::chat_message::*;
pub use self::expense::*;
pub use self::notification::*;
pub use self::prompt_template::*;
pub use self::user::*;

use chrono::{DateTime, Utc};

pub trait HasId {
    fn id(&self) -> &str;
}

pub trait Sortable {
    fn sortable_value(&self) -> impl Ord;
}

/// Month key (`YYYY-MM`) of a UTC timestamp, the partition used by expenses and budgets.
pub fn month_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

pub fn current_month() -> String {
    month_key(Utc::now())
}

/// Accepts only `YYYY-MM` with a real month number.
pub fn is_valid_month(month: &str) -> bool {
    let bytes = month.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return false;
    }
    let digits = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || b.is_ascii_digit());
    digits && matches!(month[5..].parse::<u8>(), Ok(1..=12))
}

pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
