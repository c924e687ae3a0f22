/// Anthropic Messages API client module.
///
/// This module provides a blocking HTTP client for the Anthropic Messages
/// API, along with the error taxonomy and the trait seam used for mocking
/// in tests.
mod client;

pub use client::{
    AnthropicClient, AnthropicClientBuilder, AnthropicError, CompletionClient, ContentBlock,
    DEFAULT_MODEL,
};
