use serde_json::Value;
use thiserror::Error;

use crate::config::{AiConfig, SparkConfig};

/// Returned by `habit_motivation` whenever the model can't be reached.
pub const MOTIVATION_FALLBACK: &str = "Keep going! You're doing great.";

#[derive(Debug, Error)]
pub enum AiError {
    #[error("no API key configured")]
    MissingKey,

    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("no text in API response")]
    EmptyResponse,
}

/// Client for the Gemini `generateContent` endpoint.
pub struct AiService {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl AiService {
    pub fn new(config: &AiConfig, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &SparkConfig) -> Self {
        Self::new(&config.ai, config.api_key())
    }

    /// Without a key no request is ever attempted.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send one prompt and return the trimmed reply. Single attempt, no retries.
    pub async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::MissingKey)?;

        let body = serde_json::json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        );
        log::debug!("Requesting completion from {}", url);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Status { status, body });
        }

        let api_resp: Value = resp.json().await?;
        extract_text(&api_resp).ok_or(AiError::EmptyResponse)
    }

    /// A short motivational line for a habit; `MOTIVATION_FALLBACK` on any failure.
    pub async fn habit_motivation(&self, habit_title: &str, current_streak: u32) -> String {
        if !self.is_enabled() {
            return MOTIVATION_FALLBACK.to_string();
        }
        match self
            .generate(&motivation_prompt(habit_title, current_streak))
            .await
        {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Motivation request failed: {}", e);
                MOTIVATION_FALLBACK.to_string()
            }
        }
    }

    /// Rewrite note content per `instruction`; the content comes back unchanged on any failure.
    pub async fn refine_note(&self, content: &str, instruction: &str) -> String {
        if !self.is_enabled() || instruction.trim().is_empty() {
            return content.to_string();
        }
        match self.generate(&refine_prompt(content, instruction)).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Refine request failed: {}", e);
                content.to_string()
            }
        }
    }
}

fn motivation_prompt(habit_title: &str, current_streak: u32) -> String {
    format!(
        "Give me a very short, punchy (max 15 words) motivational quote specific to the habit \"{}\" and a current streak of {} days.",
        habit_title, current_streak
    )
}

fn refine_prompt(content: &str, instruction: &str) -> String {
    format!(
        "Rewrite the following note content based on this instruction: \"{}\".\n\nNote Content:\n{}",
        instruction, content
    )
}

/// Join the text parts of the first candidate. `None` when there is no non-blank text.
fn extract_text(resp: &Value) -> Option<String> {
    let parts = resp["candidates"]
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|candidate| candidate["content"]["parts"].as_array())?;

    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
