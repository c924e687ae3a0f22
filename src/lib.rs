pub mod anthropic;
pub mod frontmatter;
pub mod service;
pub mod suggester;
pub mod vault;

pub use anthropic::{
    AnthropicClient, AnthropicClientBuilder, AnthropicError, CompletionClient, ContentBlock,
};
pub use service::{TagReport, TaggingService};
pub use suggester::{SuggestError, TagSuggester, TagSuggesterBuilder};
pub use vault::Vault;
