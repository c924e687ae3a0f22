/// Anthropic Messages API client implementation.
///
/// This module provides `AnthropicClient` for making synchronous HTTP
/// requests to the Messages API, along with error types and a builder for
/// configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pinned model used when neither the builder nor the environment supplies
/// one.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";

/// Messages API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Messages API version header value.
const API_VERSION: &str = "2023-06-01";

/// Fixed output budget for one suggestion reply.
const MAX_TOKENS: u32 = 300;

/// Errors that can occur when interacting with the Anthropic API.
///
/// Every variant means the same thing to the caller: the suggestion request
/// failed. They differ only in the message they carry.
#[derive(Debug, Error)]
pub enum AnthropicError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// API-reported errors (rate limits, invalid requests, overloads)
    #[error("Anthropic API error: {message}")]
    Api { message: String },

    /// Response bodies that do not match the Messages API shape
    #[error("Invalid API response: {0}")]
    InvalidResponse(#[source] reqwest::Error),

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No API key was configured
    #[error("Missing API key: set ANTHROPIC_API_KEY")]
    MissingApiKey,
}

/// One content block of a Messages API reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    /// Block type as reported by the API, e.g. `"text"`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Text payload; empty for non-text blocks.
    #[serde(default)]
    pub text: String,
}

impl ContentBlock {
    /// Creates a text-type block. Used by tests and mock clients.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Trait for completion clients.
///
/// This trait enables mocking in unit tests and provides a clean interface
/// for the single-turn request the tagger makes.
pub trait CompletionClient: Send + Sync {
    /// Sends one user-role message and returns the reply's content blocks.
    ///
    /// The call blocks until the service answers or the connection fails;
    /// there is no timeout, retry, or cancellation.
    fn complete(&self, prompt: &str) -> Result<Vec<ContentBlock>, AnthropicError>;
}

/// Builder for constructing `AnthropicClient` instances.
///
/// # Examples
///
/// ```no_run
/// use vtag::AnthropicClientBuilder;
///
/// let client = AnthropicClientBuilder::new()
///     .api_key("sk-ant-...")
///     .build()
///     .expect("Failed to create client");
/// ```
#[derive(Debug, Default)]
pub struct AnthropicClientBuilder {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
}

impl AnthropicClientBuilder {
    /// Creates a new `AnthropicClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model identifier, overriding the pinned default.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the API base URL. Only useful for tests.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builds the `AnthropicClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// If `api_key()` was not called, the `ANTHROPIC_API_KEY` environment
    /// variable is used; if that is also unset, building fails. If `model()`
    /// was not called, the `ANTHROPIC_MODEL` environment variable is
    /// checked, falling back to [`DEFAULT_MODEL`].
    ///
    /// # Errors
    ///
    /// Returns `AnthropicError::MissingApiKey` without a key and
    /// `AnthropicError::InvalidUrl` for an unparseable base URL.
    pub fn build(self) -> Result<AnthropicClient, AnthropicError> {
        let api_key = match self.api_key {
            Some(key) => key,
            None => std::env::var("ANTHROPIC_API_KEY")
                .map_err(|_| AnthropicError::MissingApiKey)?,
        };

        let model = if let Some(m) = self.model {
            m
        } else {
            std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string())
        };

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        reqwest::Url::parse(&base_url)
            .map_err(|e| AnthropicError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        // No request timeout: the run blocks until the service replies.
        // The blocking client defaults to 30 seconds, so it must be
        // disabled explicitly.
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(AnthropicError::Network)?;

        Ok(AnthropicClient {
            client,
            base_url,
            api_key,
            model,
        })
    }
}

/// Synchronous HTTP client for the Anthropic Messages API.
///
/// Each invocation of the tagger makes exactly one request through this
/// client. It should be constructed using `AnthropicClientBuilder`.
pub struct AnthropicClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AnthropicClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model identifier configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn complete_internal(&self, prompt: &str) -> Result<Vec<ContentBlock>, AnthropicError> {
        let url = format!("{}/v1/messages", self.base_url);
        let request_body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request_body)
            .send()
            .map_err(AnthropicError::Network)?;

        let status = response.status();
        if !status.is_success() {
            // Prefer the API's own message when the error body parses.
            if let Ok(body) = response.json::<ErrorResponse>() {
                return Err(AnthropicError::Api {
                    message: body.error.message,
                });
            }
            return Err(AnthropicError::Http {
                status: status.as_u16(),
            });
        }

        let body: MessagesResponse = response.json().map_err(AnthropicError::InvalidResponse)?;
        Ok(body.content)
    }
}

impl CompletionClient for AnthropicClient {
    fn complete(&self, prompt: &str) -> Result<Vec<ContentBlock>, AnthropicError> {
        self.complete_internal(prompt)
    }
}
