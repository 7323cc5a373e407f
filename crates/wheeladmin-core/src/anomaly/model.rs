//! Generative model seam and the REST client behind it

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use wheeladmin_config::ModelConfig;

use super::AnomalyError;

/// A model that answers a prompt with JSON shaped by `schema`
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    fn name(&self) -> &str;

    /// Raw reply text; callers validate it
    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String, AnomalyError>;
}

/// Model reference type
pub type ModelRef = Arc<dyn GenerativeModel>;

/// Client for a `generateContent` style REST endpoint
pub struct GeminiModel {
    client: reqwest::Client,
    endpoint: String,
    name: String,
    api_key: Option<String>,
    temperature: Option<f32>,
}

impl GeminiModel {
    /// The client keeps reqwest's default timeouts.
    pub fn new(config: &ModelConfig, api_key: Option<String>) -> Result<Self, AnomalyError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AnomalyError::Request(format!("Failed to create model client: {}", e)))?;

        if api_key.is_none() {
            log::warn!(
                "No model API key found in ${}; anomaly detection will fail until it is set",
                config.api_key_env
            );
        }

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            name: config.name.clone(),
            api_key,
            temperature: config.temperature,
        })
    }

    fn request_body(&self, prompt: &str, schema: &Value) -> Value {
        let mut generation = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
        if let Some(t) = self.temperature {
            generation["temperature"] = json!(t);
        }
        json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": generation,
        })
    }
}

/// Concatenated text parts of the first candidate
fn reply_text(body: &Value) -> Option<String> {
    let parts = body
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String, AnomalyError> {
        let api_key = self.api_key.as_deref().ok_or(AnomalyError::MissingApiKey)?;
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.name);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&self.request_body(prompt, schema))
            .send()
            .await
            .map_err(|e| AnomalyError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AnomalyError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AnomalyError::Request(format!("Failed to parse model response: {}", e)))?;

        reply_text(&body).ok_or(AnomalyError::EmptyResponse)
    }
}
