mod bills_handlers;
mod budgets_handlers;
mod chat_handlers;
mod expenses_handlers;
mod prompt_handlers;
mod users_handlers;

pub use self::bills_handlers::*;
pub use self::budgets_handlers::*;
pub use self::chat_handlers::*;
pub use self::expenses_handlers::*;
pub use self::prompt_handlers::*;
pub use self::users_handlers::*;

use crate::error::{Error, Result};
use crate::models::{current_month, is_valid_month};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

impl MonthQuery {
    /// Requested month, the current UTC month when absent.
    pub fn resolve(&self) -> Result<String> {
        resolve_month(self.month.as_deref())
    }
}

pub(crate) fn resolve_month(month: Option<&str>) -> Result<String> {
    match month.map(str::trim).filter(|it| !it.is_empty()) {
        None => Ok(current_month()),
        Some(month) if is_valid_month(month) => Ok(month.to_string()),
        Some(month) => Err(Error::Validation(format!(
            "month must be YYYY-MM, got {}",
            month
        ))),
    }
}
