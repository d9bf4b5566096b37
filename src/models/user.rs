use super::{HasId, Sortable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Id of the user in the external auth provider.
    pub id: String,
    #[serde(default)]
    pub fcm_token: Option<String>,
    #[serde(default)]
    pub fcm_token_updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub platform: Option<String>,
}

impl HasId for UserProfile {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Sortable for UserProfile {
    fn sortable_value(&self) -> impl Ord {
        self.id.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceTokenInput {
    pub token: String,
    #[serde(default)]
    pub platform: Option<String>,
}
