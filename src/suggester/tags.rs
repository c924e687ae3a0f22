//! Strict parsing of tag-suggestion replies.

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;

use crate::anthropic::{AnthropicError, CompletionClient, ContentBlock};

use super::prompt::build_prompt;

/// Errors from one suggestion request.
///
/// All variants abort the invocation; there is no partial acceptance of a
/// malformed reply and no retry.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// The underlying API call failed.
    #[error("Suggestion request failed: {0}")]
    Client(#[from] AnthropicError),

    /// The reply did not contain exactly one content block.
    #[error("Expected exactly one content block in response, got {0}")]
    UnexpectedBlockCount(usize),

    /// The reply's single block was not of text type.
    #[error("Expected a text content block, got '{0}'")]
    NonTextBlock(String),

    /// The reply text was not valid JSON.
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The reply parsed as JSON but was not an array of strings.
    #[error("Response is not a JSON array of strings")]
    NotAStringArray,
}

/// Builder for constructing `TagSuggester` instances.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use vtag::{AnthropicClientBuilder, TagSuggesterBuilder};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AnthropicClientBuilder::new().api_key("sk-ant-...").build()?;
///
/// let suggester = TagSuggesterBuilder::new()
///     .client(Arc::new(client))
///     .build();
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct TagSuggesterBuilder {
    client: Option<Arc<dyn CompletionClient>>,
}

impl TagSuggesterBuilder {
    /// Creates a new `TagSuggesterBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the completion client to use for suggestion requests.
    pub fn client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the `TagSuggester` with the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if `client()` was not called before `build()`.
    #[must_use]
    pub fn build(self) -> TagSuggester {
        TagSuggester {
            client: self.client.expect("client must be set via client() method"),
        }
    }
}

/// Requests tag suggestions for one note from a completion client.
pub struct TagSuggester {
    client: Arc<dyn CompletionClient>,
}

impl TagSuggester {
    /// Creates a new `TagSuggester` with the given client.
    ///
    /// Prefer `TagSuggesterBuilder` for construction.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Requests suggested tags for a note.
    ///
    /// Builds the prompt from the note's title, full text, current tags,
    /// and the vault vocabulary, then sends one single-turn request.
    ///
    /// # Errors
    ///
    /// Returns `SuggestError` if the API call fails or the reply deviates
    /// from the contract in any way: more or fewer than one content block,
    /// a non-text block, invalid JSON, a non-array top level, or an array
    /// containing a non-string element.
    pub fn suggest(
        &self,
        title: &str,
        body: &str,
        current_tags: &[String],
        vocabulary: &BTreeSet<String>,
    ) -> Result<Vec<String>, SuggestError> {
        let prompt = build_prompt(title, body, current_tags, vocabulary);
        let blocks = self.client.complete(&prompt)?;
        parse_reply(&blocks)
    }
}

/// Validates a Messages API reply into a tag list.
fn parse_reply(blocks: &[ContentBlock]) -> Result<Vec<String>, SuggestError> {
    if blocks.len() != 1 {
        return Err(SuggestError::UnexpectedBlockCount(blocks.len()));
    }

    let block = &blocks[0];
    if block.kind != "text" {
        return Err(SuggestError::NonTextBlock(block.kind.clone()));
    }

    let value: serde_json::Value = serde_json::from_str(block.text.trim())?;
    let Some(items) = value.as_array() else {
        return Err(SuggestError::NotAStringArray);
    };

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(String::from)
                .ok_or(SuggestError::NotAStringArray)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockClient {
        blocks: Vec<ContentBlock>,
    }

    impl CompletionClient for MockClient {
        fn complete(&self, _prompt: &str) -> Result<Vec<ContentBlock>, AnthropicError> {
            Ok(self.blocks.clone())
        }
    }

    struct FailingClient;

    impl CompletionClient for FailingClient {
        fn complete(&self, _prompt: &str) -> Result<Vec<ContentBlock>, AnthropicError> {
            Err(AnthropicError::Http { status: 500 })
        }
    }

    fn suggester(blocks: Vec<ContentBlock>) -> TagSuggester {
        TagSuggesterBuilder::new()
            .client(Arc::new(MockClient { blocks }))
            .build()
    }

    fn suggest(s: &TagSuggester) -> Result<Vec<String>, SuggestError> {
        s.suggest("title", "body", &[], &BTreeSet::new())
    }

    #[test]
    fn valid_array_reply_yields_tags() {
        let s = suggester(vec![ContentBlock::text(r#"["rust", "notes"]"#)]);
        assert_eq!(suggest(&s).unwrap(), vec!["rust", "notes"]);
    }

    #[test]
    fn empty_array_reply_yields_no_tags() {
        let s = suggester(vec![ContentBlock::text("[]")]);
        assert!(suggest(&s).unwrap().is_empty());
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let s = suggester(vec![ContentBlock::text("\n  [\"a\"]  \n")]);
        assert_eq!(suggest(&s).unwrap(), vec!["a"]);
    }

    #[test]
    fn zero_blocks_is_an_error() {
        let s = suggester(vec![]);
        assert!(matches!(
            suggest(&s),
            Err(SuggestError::UnexpectedBlockCount(0))
        ));
    }

    #[test]
    fn multiple_blocks_is_an_error() {
        let s = suggester(vec![
            ContentBlock::text("[\"a\"]"),
            ContentBlock::text("[\"b\"]"),
        ]);
        assert!(matches!(
            suggest(&s),
            Err(SuggestError::UnexpectedBlockCount(2))
        ));
    }

    #[test]
    fn non_text_block_is_an_error() {
        let block = ContentBlock {
            kind: "tool_use".to_string(),
            text: String::new(),
        };
        let s = suggester(vec![block]);
        assert!(matches!(suggest(&s), Err(SuggestError::NonTextBlock(_))));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let s = suggester(vec![ContentBlock::text("here are some tags: a, b")]);
        assert!(matches!(suggest(&s), Err(SuggestError::InvalidJson(_))));
    }

    #[test]
    fn json_object_is_an_error() {
        let s = suggester(vec![ContentBlock::text(r#"{"tags": ["a"]}"#)]);
        assert!(matches!(suggest(&s), Err(SuggestError::NotAStringArray)));
    }

    #[test]
    fn array_with_non_string_element_is_an_error() {
        let s = suggester(vec![ContentBlock::text(r#"["a", 42]"#)]);
        assert!(matches!(suggest(&s), Err(SuggestError::NotAStringArray)));
    }

    #[test]
    fn client_failure_propagates() {
        let s = TagSuggesterBuilder::new()
            .client(Arc::new(FailingClient))
            .build();
        let err = suggest(&s).unwrap_err();
        assert!(matches!(err, SuggestError::Client(_)));
        assert!(err.to_string().contains("Suggestion request failed"));
    }
}
