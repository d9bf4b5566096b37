//! Sends notifications through the FCM HTTP v1 API.

use super::{PushMessage, PushSender};
use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

const FCM_BASE_URL: &str = "https://fcm.googleapis.com";

#[derive(Clone)]
pub struct FcmClient {
    client: Client,
    project_id: String,
    access_token: String,
}

impl FcmClient {
    /// `None` unless both the project id and an access token are configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        Some(Self {
            client: Client::new(),
            project_id: config.fcm_project_id.clone()?,
            access_token: config.fcm_access_token.clone()?,
        })
    }
}

#[async_trait]
impl PushSender for FcmClient {
    async fn send(&self, message: PushMessage) -> Result<()> {
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            FCM_BASE_URL, self.project_id
        );
        let body = json!({
            "message": {
                "token": message.token,
                "notification": {
                    "title": message.title,
                    "body": message.body,
                },
                "data": message.data,
            }
        });

        debug!("Sending push notification: {}", message.title);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let text = response.text().await?;
            warn!("FCM call failed with status: {} {}", status, text);
            Err(Error::Push(format!("FCM returned {}", status)))
        }
    }
}
