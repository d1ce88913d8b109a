//! @ai:module:intent Chat-completion API client used to summarize articles
//! @ai:module:layer infrastructure
//! @ai:module:public_api CompletionClient, CompletionError, OpenAiClient, MockCompletionClient
//! @ai:module:stateless false

use crate::config::ApiConfig;
use crate::error::{Result, SummarizerError};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use thiserror::Error;
use tokio::sync::Mutex;

/// @ai:intent Failure of one completion request, tagged by how the caller should react
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// Provider rejected the request for exceeding its rate limit (HTTP 429)
    #[error("rate limit exceeded: {message}")]
    RateLimited { message: String },

    /// Provider answered with any other error status
    #[error("API error ({status}): {message}")]
    Service { status: u16, message: String },

    /// Transport failure, timeout, or a response we could not use
    #[error("{0}")]
    Unexpected(String),
}

impl CompletionError {
    /// @ai:intent Whether the retry policy should back off and try again
    /// @ai:effects pure
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Service { .. })
    }
}

/// @ai:intent Trait for a chat-completion backend
#[allow(async_fn_in_trait)]
pub trait CompletionClient: Send + Sync {
    /// @ai:intent Send a system + user conversation and return the first choice's text
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
    ) -> std::result::Result<String, CompletionError>;
}

/// @ai:intent Chat-completion request body
#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// @ai:intent Chat-completion response body
#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// @ai:intent OpenAI-compatible chat-completion client
pub struct OpenAiClient {
    client: reqwest::Client,
    config: ApiConfig,
    api_key: String,
}

impl OpenAiClient {
    /// @ai:intent Create a new client from config and the credential in the environment
    /// @ai:pre the env var named by config.api_key_env is set and non-empty
    /// @ai:effects env
    pub fn new(config: ApiConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SummarizerError::MissingCredential(config.api_key_env.clone()))?;

        Self::with_api_key(config, api_key)
    }

    /// @ai:intent Create a client with an explicit key
    /// @ai:effects pure
    pub fn with_api_key(config: ApiConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

impl CompletionClient for OpenAiClient {
    /// @ai:intent Send the conversation and classify the outcome
    /// @ai:effects network
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
    ) -> std::result::Result<String, CompletionError> {
        let request = ApiRequest {
            model: &self.config.model,
            messages: [
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Unexpected(format!("request failed: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_error(status.as_u16(), &error_text));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Unexpected(format!("failed to parse response: {e}")))?;

        first_choice_text(api_response)
    }
}

/// @ai:intent Map an error status and body onto a CompletionError variant
/// @ai:post status == 429 => RateLimited, other statuses => Service
/// @ai:effects pure
pub fn classify_error(status: u16, body: &str) -> CompletionError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    if status == 429 {
        CompletionError::RateLimited { message }
    } else {
        CompletionError::Service { status, message }
    }
}

/// @ai:intent Pull the trimmed text of the first choice
/// @ai:effects pure
fn first_choice_text(response: ApiResponse) -> std::result::Result<String, CompletionError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| {
            CompletionError::Unexpected("response contained no message content".to_string())
        })
}

/// @ai:intent Scripted client for dry runs and tests
///
/// Outcomes queued with `with_script` are returned in order; after that every
/// call gets the fallback outcome.
pub struct MockCompletionClient {
    script: Mutex<VecDeque<std::result::Result<String, CompletionError>>>,
    fallback: std::result::Result<String, CompletionError>,
    calls: AtomicU32,
    #[cfg(test)]
    prompts: Mutex<Vec<String>>,
}

impl MockCompletionClient {
    /// @ai:intent Create a mock that always succeeds with a fixed response
    /// @ai:effects pure
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_fallback(Ok(response.into()))
    }

    /// @ai:intent Create a mock that always fails with the given error
    /// @ai:effects pure
    pub fn failing(error: CompletionError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: std::result::Result<String, CompletionError>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicU32::new(0),
            #[cfg(test)]
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// @ai:intent Queue outcomes to return before falling back
    /// @ai:effects pure
    pub fn with_script(
        self,
        outcomes: impl IntoIterator<Item = std::result::Result<String, CompletionError>>,
    ) -> Self {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            ..self
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    #[cfg(test)]
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        _system: &str,
        _prompt: &str,
    ) -> std::result::Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        #[cfg(test)]
        self.prompts.lock().await.push(_prompt.to_string());

        match self.script.lock().await.pop_front() {
            Some(outcome) => outcome,
            None => self.fallback.clone(),
        }
    }
}
