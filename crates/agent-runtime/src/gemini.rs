//! Gemini LLM Provider
//!
//! Implementation of `LlmProvider` over the Generative Language REST API.

use std::fmt;
use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, TokenUsage},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Header carrying the API key, so it never appears in request URLs
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; the only credential the advisor needs
    pub api_key: String,

    /// API root, without trailing slash
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: 60,
        }
    }

    /// Build from an optional key; blank keys count as missing
    pub fn from_key(api_key: Option<String>) -> Option<Self> {
        api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(Self::new)
    }

    /// Load from `GEMINI_API_KEY`, `GEMINI_BASE_URL`, `GEMINI_TIMEOUT_SECS`
    ///
    /// Returns `None` when no key is set, which callers treat as
    /// "model path disabled".
    pub fn from_env() -> Option<Self> {
        let mut config = Self::from_key(std::env::var("GEMINI_API_KEY").ok())?;
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout_secs = secs;
        }
        Some(config)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<RemoteModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteModel {
    name: String,
    display_name: Option<String>,
    input_token_limit: Option<u32>,
}

/// Gemini LLM provider
pub struct GeminiProvider {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create from configuration
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(format!("HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.config.base_url)
    }

    fn build_request(prompt: &str, options: &GenerationOptions) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt.to_string() }],
            }],
            generation_config: GenerationConfig {
                temperature: options.temperature,
                top_p: options.top_p,
                max_output_tokens: options.max_tokens,
            },
        }
    }

    /// Convert a Gemini payload to a completion, joining the first candidate's parts
    fn convert_response(response: GenerateResponse, model: &str) -> Result<Completion> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::EmptyResponse(model.to_string()))?;

        let content: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(AgentError::EmptyResponse(model.to_string()));
        }

        let finish_reason = candidate.finish_reason.as_deref().map(|r| match r {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::Length,
            "SAFETY" | "RECITATION" | "BLOCKLIST" => FinishReason::ContentFilter,
            _ => FinishReason::Error,
        });

        Ok(Completion {
            content,
            model: model.to_string(),
            usage: response.usage_metadata.map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
            finish_reason,
        })
    }

    fn transport_error(e: reqwest::Error) -> AgentError {
        let e = e.without_url();
        if e.is_timeout() || e.is_connect() {
            AgentError::ProviderUnavailable(e.to_string())
        } else {
            AgentError::classify_message(e.to_string())
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn health_check(&self) -> Result<bool> {
        match self.list_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Gemini health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(&self, prompt: &str, options: &GenerationOptions) -> Result<Completion> {
        let request = Self::build_request(prompt, options);

        let response = self
            .client
            .post(self.generate_url(&options.model))
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::from_status(status.as_u16(), &body));
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Parse(e.to_string()))?;

        Self::convert_response(payload, &options.model)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .client
            .get(format!("{}/models", self.config.base_url))
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .send()
            .await
            .map_err(Self::transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::from_status(status.as_u16(), &body));
        }

        let list: ModelList = response
            .json()
            .await
            .map_err(|e| AgentError::Parse(e.to_string()))?;

        Ok(list
            .models
            .into_iter()
            .map(|m| {
                let id = m.name.trim_start_matches("models/").to_string();
                ModelInfo {
                    name: m.display_name.unwrap_or_else(|| id.clone()),
                    id,
                    context_length: m.input_token_limit,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_missing() {
        assert!(GeminiConfig::from_key(None).is_none());
        assert!(GeminiConfig::from_key(Some("   ".into())).is_none());

        let config = GeminiConfig::from_key(Some(" abc ".into())).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_request_wire_format() {
        let options = GenerationOptions::for_model("gemini-2.5-flash");
        let request = GeminiProvider::build_request("Explain DCA", &options);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "Explain DCA");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn test_generate_url() {
        let provider = GeminiProvider::new(GeminiConfig::new("k")).unwrap();
        assert_eq!(
            provider.generate_url("gemini-1.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_response_conversion() {
        let payload: GenerateResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "Stake "}, {"text": "with Jito."}], "role": "model"},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 4, "totalTokenCount": 14}
            }"#,
        )
        .unwrap();

        let completion = GeminiProvider::convert_response(payload, "gemini-2.5-flash").unwrap();
        assert_eq!(completion.content, "Stake with Jito.");
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage.unwrap().total_tokens, 14);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transient() {
        let mut config = GeminiConfig::new("k");
        config.base_url = "http://127.0.0.1:9".into();
        let provider = GeminiProvider::new(config).unwrap();

        let err = provider
            .complete("hello", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert!(!provider.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_api_key_never_in_error_text() {
        let mut config = GeminiConfig::new("SECRET-KEY-123");
        config.base_url = "http://127.0.0.1:9".into();
        assert!(!format!("{config:?}").contains("SECRET-KEY-123"));
        let provider = GeminiProvider::new(config).unwrap();

        let err = provider
            .complete("hello", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(!err.to_string().contains("SECRET-KEY-123"));

        let err = provider.list_models().await.unwrap_err();
        assert!(!err.to_string().contains("SECRET-KEY-123"));
        assert!(!err.to_string().contains("127.0.0.1:9/models"));
    }

    #[test]
    fn test_blocked_prompt_is_empty_response() {
        let payload: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();

        let err = GeminiProvider::convert_response(payload, "gemini-2.5-flash").unwrap_err();
        assert!(matches!(err, AgentError::EmptyResponse(_)));
        assert!(!err.is_transient());
    }
}
