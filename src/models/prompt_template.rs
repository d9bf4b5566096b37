use super::{HasId, Sortable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id of the single persona template document.
pub const PERSONA_PROMPT_ID: &str = "persona";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplate {
    pub id: String,
    pub text: String,
    pub updated_at: DateTime<Utc>,
}

impl HasId for PromptTemplate {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Sortable for PromptTemplate {
    fn sortable_value(&self) -> impl Ord {
        self.id.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptInput {
    pub text: String,
}
