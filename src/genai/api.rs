use super::gemini_request::GenerateContentRequest;
use super::gemini_response::GeminiResponse;
use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

/// A model answering `generateContent` requests with text.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate_content(&self, request: GenerateContentRequest) -> Result<String>;
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_content(&self, request: GenerateContentRequest) -> Result<String> {
        debug!("Prompt: \n{}", request.all_text());

        // Perform the POST request
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("Gemini call failed with status: {} {}", status, text);
            return Err(Error::Gemini {
                status: status.as_u16(),
                message: text,
            });
        }

        let response: GeminiResponse = serde_json::from_str(&text)?;
        let reply = response.text().ok_or(Error::EmptyResponse)?;
        debug!("Gemini reply: \n{}", reply);
        Ok(reply)
    }
}
