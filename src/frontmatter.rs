//! YAML frontmatter codec for markdown notes.
//!
//! Parsing is best-effort: a note without a frontmatter block, or with a
//! malformed one, parses to an empty mapping rather than an error. Updating
//! is the opposite of destructive: if the existing block cannot be re-parsed
//! or re-serialized, the original note text is returned untouched.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Errors from the frontmatter update path.
///
/// These never escape [`update_tags`]; they exist so the fallback path can
/// print a precise diagnostic.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// The note opens a frontmatter block but never closes it.
    #[error("frontmatter block has no closing '---' line")]
    Unterminated,

    /// The block parsed as YAML but is not a key/value mapping.
    #[error("frontmatter is not a YAML mapping")]
    NotAMapping,

    /// YAML parse or serialize failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parses the leading YAML frontmatter block of a note.
///
/// Returns an empty mapping if the note does not start with a `---` line,
/// the block is unterminated, or the enclosed YAML is empty or malformed.
/// Parse failures are swallowed so that one bad note never aborts a vault
/// scan.
pub fn parse(content: &str) -> Mapping {
    let Some((yaml, _body)) = split(content) else {
        return Mapping::new();
    };

    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(map)) => map,
        _ => Mapping::new(),
    }
}

/// Extracts the normalized tag list from a note's content.
///
/// A bare-string `tags` value is treated as a one-element list; a sequence
/// contributes its string elements; a missing or malformed field yields an
/// empty list.
pub fn current_tags(content: &str) -> Vec<String> {
    parse(content)
        .get("tags")
        .map(tags_from_value)
        .unwrap_or_default()
}

/// Normalizes a frontmatter `tags` value into a list of strings.
///
/// Obsidian accepts both `tags: foo` and `tags: [foo, bar]`; both forms are
/// handled on the read and write paths. Non-string sequence elements (for
/// example a bare `42`) are dropped rather than stringified: the tag set
/// only ever holds string entries.
pub fn tags_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::String(tag) => vec![tag.clone()],
        Value::Sequence(seq) => seq
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        _ => Vec::new(),
    }
}

/// Rewrites the `tags` field of a note's frontmatter.
///
/// The tag list is sorted and deduplicated before writing. A note without a
/// frontmatter block gets a new one containing only the tag list. All other
/// frontmatter keys round-trip with their original values.
///
/// On any parse or reconstruct failure the original text is returned
/// unmodified and a diagnostic is printed to stderr. The note is never
/// corrupted or truncated by a codec failure.
pub fn update_tags(content: &str, tags: &[String]) -> String {
    match try_update_tags(content, tags) {
        Ok(updated) => updated,
        Err(e) => {
            eprintln!("Error updating frontmatter, keeping original text: {e}");
            content.to_string()
        }
    }
}

/// Fallible inner implementation of [`update_tags`].
fn try_update_tags(content: &str, tags: &[String]) -> Result<String, FrontmatterError> {
    let tag_value = sorted_tag_value(tags);

    let Some((yaml, body)) = split(content) else {
        if has_open_delimiter(content) {
            // Opened but never closed: rewriting would swallow the stray
            // delimiter into the body, so leave the note alone.
            return Err(FrontmatterError::Unterminated);
        }

        // No frontmatter: prepend a block containing only the tag list.
        let mut map = Mapping::new();
        map.insert(Value::String("tags".to_string()), tag_value);
        let rendered = serde_yaml::to_string(&Value::Mapping(map))?;
        return Ok(format!("---\n{rendered}---\n\n{content}"));
    };

    let mut map = if yaml.trim().is_empty() {
        Mapping::new()
    } else {
        match serde_yaml::from_str::<Value>(yaml)? {
            Value::Mapping(map) => map,
            Value::Null => Mapping::new(),
            _ => return Err(FrontmatterError::NotAMapping),
        }
    };

    map.insert(Value::String("tags".to_string()), tag_value);

    let rendered = serde_yaml::to_string(&Value::Mapping(map))?;
    Ok(format!("---\n{rendered}---\n{body}"))
}

/// Splits a note into its raw frontmatter YAML and the body after the
/// closing delimiter. Returns `None` when there is no complete block.
fn split(content: &str) -> Option<(&str, &str)> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    // The closing delimiter is a line consisting exactly of "---".
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

/// Whether the note starts a frontmatter block at all.
fn has_open_delimiter(content: &str) -> bool {
    content.starts_with("---\n") || content.starts_with("---\r\n")
}

/// Builds a YAML sequence value from a tag list, sorted and deduplicated.
fn sorted_tag_value(tags: &[String]) -> Value {
    let mut sorted: Vec<&String> = tags.iter().collect();
    sorted.sort();
    sorted.dedup();

    Value::Sequence(
        sorted
            .into_iter()
            .map(|tag| Value::String(tag.clone()))
            .collect(),
    )
}
