//! OpenAI-compatible HTTP provider (feature `openai`)
//!
//! One chat-completions client covering OpenAI and any API-compatible local
//! server. Configuration comes from the environment; the client is created
//! once and reused across requests.

use crate::{AnalyzeRequest, LlmError, LlmInterface};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Provider configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl LlmConfig {
    /// Read configuration from `OPENAI_API_KEY` / `LLM_BASE_URL` / `LLM_MODEL`.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| LlmError::NotConfigured("OPENAI_API_KEY is not set".to_string()))?;
        let base_url =
            std::env::var("LLM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self {
            api_key,
            base_url,
            model,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }
}

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiClient {
    config: LlmConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    async fn chat(&self, system: &str, user: &str) -> Result<Value, LlmError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": 0.2,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Network(e.to_string())
                }
            })?;

        if response.status().as_u16() == 429 {
            let retry_after_ms = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(1000);
            return Err(LlmError::RateLimited { retry_after_ms });
        }
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("{}: {}", status, text)));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmError::InvalidResponse("missing message content".to_string()))?;

        // Models often wrap JSON in markdown fences; strip them before parsing.
        let cleaned = content
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();
        serde_json::from_str(cleaned)
            .map_err(|_| LlmError::InvalidResponse(format!("not valid JSON: {}", cleaned)))
    }
}

#[async_trait]
impl LlmInterface for OpenAiClient {
    async fn analyze(&self, request: AnalyzeRequest) -> Result<Value, LlmError> {
        let mut user = request.prompt.clone();
        for (key, value) in &request.context {
            user.push_str(&format!("\n\n## {}\n{}", key, value));
        }
        self.chat(
            "You are an analyst extracting structured persona attributes from interview transcripts. Respond with JSON only.",
            &user,
        )
        .await
    }

    async fn generate_structured(&self, prompt: &str, schema: &Value) -> Result<Value, LlmError> {
        let user = format!(
            "{}\n\nRespond with JSON matching this schema exactly:\n{}",
            prompt, schema
        );
        self.chat(
            "You generate JSON conforming to the provided schema. No prose, JSON only.",
            &user,
        )
        .await
    }
}
