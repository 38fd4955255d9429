//! LLM service boundary
//!
//! The evidence-linking engine treats the LLM as an opaque async service:
//! `analyze(request) -> response` for free-form analysis and
//! `generate_structured(prompt, schema) -> value` for schema-shaped output.
//! The boundary must tolerate arbitrary latency, transient failures, and
//! malformed or partial responses: LLM failures degrade to the deterministic
//! fallback extraction, never to a crash in span/offset logic.

pub mod fallback;
#[cfg(feature = "openai")]
pub mod providers;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

pub use fallback::extract_fallback_attributes;

/// Errors crossing the LLM boundary.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request timed out")]
    Timeout,
    #[error("network failure: {0}")]
    Network(String),
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },
    #[error("provider error: {0}")]
    Api(String),
    #[error("malformed response: {0}")]
    InvalidResponse(String),
    #[error("no provider configured: {0}")]
    NotConfigured(String),
}

/// A free-form analysis request.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeRequest {
    pub prompt: String,
    /// Named context blocks (e.g. "scoped_text", "speaker").
    pub context: HashMap<String, String>,
}

impl AnalyzeRequest {
    pub fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            context: HashMap::new(),
        }
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }
}

/// Async interface every LLM provider implements.
#[async_trait]
pub trait LlmInterface: Send + Sync {
    /// Free-form analysis; response shape is provider-defined JSON.
    async fn analyze(&self, request: AnalyzeRequest) -> Result<Value, LlmError>;

    /// Generate output that should conform to the given JSON schema. The
    /// caller still validates the shape; conformance is best-effort.
    async fn generate_structured(&self, prompt: &str, schema: &Value) -> Result<Value, LlmError>;
}

// ============================================================================
// Mock provider
// ============================================================================

/// Deterministic provider for tests and offline runs. Cycles through canned
/// JSON responses.
pub struct MockProvider {
    responses: Vec<Value>,
    cursor: std::sync::atomic::AtomicUsize,
}

impl MockProvider {
    pub fn new(responses: Vec<Value>) -> Self {
        Self {
            responses,
            cursor: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn always(response: Value) -> Self {
        Self::new(vec![response])
    }

    fn next(&self) -> Value {
        if self.responses.is_empty() {
            return Value::Null;
        }
        let idx = self
            .cursor
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.responses[idx % self.responses.len()].clone()
    }
}

#[async_trait]
impl LlmInterface for MockProvider {
    async fn analyze(&self, _request: AnalyzeRequest) -> Result<Value, LlmError> {
        Ok(self.next())
    }

    async fn generate_structured(&self, _prompt: &str, _schema: &Value) -> Result<Value, LlmError> {
        Ok(self.next())
    }
}

/// Provider that always fails; used to exercise degradation paths.
pub struct FailingProvider;

#[async_trait]
impl LlmInterface for FailingProvider {
    async fn analyze(&self, _request: AnalyzeRequest) -> Result<Value, LlmError> {
        Err(LlmError::Api("provider unavailable".to_string()))
    }

    async fn generate_structured(&self, _prompt: &str, _schema: &Value) -> Result<Value, LlmError> {
        Err(LlmError::Api("provider unavailable".to_string()))
    }
}

/// Select a provider by name.
pub fn create_provider(name: &str) -> Result<Box<dyn LlmInterface>, LlmError> {
    match name {
        "mock" => Ok(Box::new(MockProvider::always(Value::Null))),
        #[cfg(feature = "openai")]
        "openai" => {
            let config = providers::LlmConfig::from_env()?;
            Ok(Box::new(providers::OpenAiClient::new(config)))
        }
        other => Err(LlmError::NotConfigured(format!(
            "unknown provider '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_provider_cycles() {
        let provider = MockProvider::new(vec![json!({"a": 1}), json!({"b": 2})]);
        let first = provider.analyze(AnalyzeRequest::new("x")).await.unwrap();
        let second = provider.analyze(AnalyzeRequest::new("x")).await.unwrap();
        let third = provider.analyze(AnalyzeRequest::new("x")).await.unwrap();
        assert_eq!(first, json!({"a": 1}));
        assert_eq!(second, json!({"b": 2}));
        assert_eq!(third, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_failing_provider() {
        let result = FailingProvider.analyze(AnalyzeRequest::new("x")).await;
        assert!(matches!(result, Err(LlmError::Api(_))));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        assert!(create_provider("nope").is_err());
        assert!(create_provider("mock").is_ok());
    }
}
