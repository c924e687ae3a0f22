//! Tag suggestion via an LLM completion client.
//!
//! This module builds the suggestion prompt from a note's title, body,
//! current tags, and the vault-wide tag vocabulary, sends it through a
//! [`CompletionClient`](crate::anthropic::CompletionClient), and validates
//! the reply strictly: anything other than a single text block containing a
//! JSON array of strings is a hard failure. No partial acceptance, no
//! fabricated fallback tags.

mod prompt;
mod tags;

pub use prompt::build_prompt;
pub use tags::{SuggestError, TagSuggester, TagSuggesterBuilder};
