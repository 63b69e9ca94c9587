// OpenAI-compatible chat/completions adapter

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};

use crate::providers::provider_trait::{CompletionProvider, ProviderError};

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            endpoint: "https://api.siliconflow.cn/v1/chat/completions".to_string(),
            model: "deepseek-ai/DeepSeek-R1".to_string(),
            temperature: 0.3,
        }
    }
}

impl ProviderConfig {
    /// Defaults with environment overrides for headless deployments.
    pub fn from_env() -> Self {
        let defaults = ProviderConfig::default();
        ProviderConfig {
            endpoint: std::env::var("DEBATE_COMPLETIONS_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.endpoint),
            model: std::env::var("DEBATE_MODEL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.model),
            temperature: std::env::var("DEBATE_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.temperature),
        }
    }
}

pub struct OpenAiCompatibleProvider {
    client: Client,
    config: ProviderConfig,
    api_key: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: ProviderConfig, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120)) // LLM responses can be slow
            .connect_timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        OpenAiCompatibleProvider {
            client,
            config,
            api_key,
        }
    }

    fn map_status(status: reqwest::StatusCode) -> ProviderError {
        match status.as_u16() {
            401 | 403 => ProviderError::Unauthenticated,
            429 => ProviderError::RateLimited,
            s if s >= 500 => ProviderError::ServiceUnavailable(s),
            s => ProviderError::Transport(format!("provider returned unexpected status {}", s)),
        }
    }
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAiCompatibleProvider {
    async fn complete(
        &self,
        system_instruction: &str,
        user_instruction: &str,
    ) -> Result<String, ProviderError> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system_instruction},
                {"role": "user", "content": user_instruction},
            ],
            "temperature": self.config.temperature,
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            eprintln!("[Provider] error ({}): {}", status, error_text);
            return Err(Self::map_status(status));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(format!("malformed response body: {}", e)))?;

        let choice = json["choices"]
            .as_array()
            .and_then(|c| c.first())
            .ok_or_else(|| ProviderError::Transport("no choices in response".to_string()))?;

        // A safety-filtered completion must not pass as an empty debate turn.
        if choice["finish_reason"].as_str() == Some("content_filter") {
            return Err(ProviderError::Blocked);
        }

        choice["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| ProviderError::Transport("no content in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            OpenAiCompatibleProvider::map_status(StatusCode::UNAUTHORIZED),
            ProviderError::Unauthenticated
        );
        assert_eq!(
            OpenAiCompatibleProvider::map_status(StatusCode::FORBIDDEN),
            ProviderError::Unauthenticated
        );
        assert_eq!(
            OpenAiCompatibleProvider::map_status(StatusCode::TOO_MANY_REQUESTS),
            ProviderError::RateLimited
        );
        assert_eq!(
            OpenAiCompatibleProvider::map_status(StatusCode::SERVICE_UNAVAILABLE),
            ProviderError::ServiceUnavailable(503)
        );
        assert!(matches!(
            OpenAiCompatibleProvider::map_status(StatusCode::NOT_FOUND),
            ProviderError::Transport(_)
        ));
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(ProviderError::RateLimited.is_retryable());
        assert!(ProviderError::ServiceUnavailable(503).is_retryable());
        assert!(!ProviderError::Blocked.is_retryable());
        assert!(!ProviderError::Transport("boom".into()).is_retryable());
        assert!(!ProviderError::Unauthenticated.is_retryable());
    }
}
