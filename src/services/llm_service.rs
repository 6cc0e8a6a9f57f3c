use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::errors::LlmError;
use crate::models::{ChatMessage, CompletionRequest};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for the completion provider
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl LlmConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run one chat completion and return the first choice's text
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;

    fn model(&self) -> &str;
}

/// OpenAI API request/response structures
#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: usize,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// OpenAI chat-completions provider. One HTTP call per completion, no retries.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    endpoint: String,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            client,
        })
    }

    async fn call_openai(&self, request: &OpenAiRequest<'_>) -> Result<OpenAiResponse, LlmError> {
        let response = self.client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();

        if status == 429 {
            return Err(LlmError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError(format!("HTTP {}: {}", status, error_text)));
        }

        response.json::<OpenAiResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        info!(
            "➡️ Sending completion request (model: {}, messages: {}, max_tokens: {})",
            self.model,
            request.messages.len(),
            request.max_tokens
        );

        let body = OpenAiRequest {
            model: &self.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
        };

        let response = self.call_openai(&body).await?;

        if let Some(usage) = &response.usage {
            info!(
                "✅ Completion received. Tokens: {} prompt + {} completion = {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        response.choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?
            .message
            .content
            .ok_or_else(|| LlmError::InvalidResponse("Choice has no content".to_string()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Entry point for completions. Holds no state besides the provider.
pub struct LlmService {
    provider: Option<Arc<dyn LlmProvider>>,
}

impl LlmService {
    pub fn new(config: &LlmConfig) -> Self {
        if config.api_key.trim().is_empty() {
            warn!("LLM API key is empty. LLM features disabled.");
            return Self::disabled();
        }
        match OpenAiProvider::new(config) {
            Ok(provider) => {
                info!("Initializing LLM service (model: {}, endpoint base: {})", config.model, config.base_url);
                Self::with_provider(Arc::new(provider))
            }
            Err(e) => {
                error!("Failed to initialize OpenAI provider: {}. LLM features disabled.", e);
                Self::disabled()
            }
        }
    }

    pub fn with_provider(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider: Some(provider) }
    }

    pub fn disabled() -> Self {
        Self { provider: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub fn model(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.model())
    }

    pub async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let provider = self.provider.as_ref()
            .ok_or(LlmError::Disabled)?;

        provider.complete(request).await
    }

    /// Single user-message completion, used for short narratives.
    pub async fn generate_completion(
        &self,
        prompt: String,
        max_tokens: usize,
        temperature: f32,
    ) -> Result<String, LlmError> {
        self.complete(CompletionRequest {
            messages: vec![ChatMessage::user(prompt)],
            temperature,
            top_p: None,
            max_tokens,
        })
        .await
    }
}
