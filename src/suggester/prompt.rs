//! Prompt construction for tag suggestion.

use std::collections::BTreeSet;

/// Instructional preamble for the suggestion prompt.
///
/// The "papers" rule is a deliberate special case: the tag fits only when
/// the note is a clipping of the arxiv page itself, not a note that merely
/// links one. The title-equals-paper-title heuristic is spelled out so the
/// model applies it consistently.
const PROMPT_HEADER: &str = "\
You are a helpful assistant that suggests relevant tags for Obsidian markdown notes.
- Given the following note contents and existing tags, suggest additional relevant tags.
- Only suggest tags that would be genuinely useful for organization and retrieval, and are directly relevant to the note, not just tentatively related.
- Only suggest the \"papers\" tag if the note is a clipping of the arxiv link itself, not just if it's a note containing the arxiv link. A good heuristic is whether the note's title is the paper title.";

/// Closing instruction pinning the reply format to a bare JSON array.
const PROMPT_FOOTER: &str = "\
Reply with only a JSON array of suggested new tags. Include both completely new tags and relevant existing vault tags that aren't currently applied to this note.
Example response format: [\"tag1\", \"tag2\", \"tag3\"]";

/// Builds the suggestion prompt for one note.
///
/// The output is deterministic for a given input: the vocabulary is a
/// sorted set and both tag lists are comma-joined in their given order.
pub fn build_prompt(
    title: &str,
    body: &str,
    current_tags: &[String],
    vocabulary: &BTreeSet<String>,
) -> String {
    let vault_tags = vocabulary
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let note_tags = current_tags.join(", ");

    format!(
        "{PROMPT_HEADER}\n\n\
         Existing tags in vault: {vault_tags}\n\
         Current note tags: {note_tags}\n\n\
         Note contents:\n\n\
         <title>\n{title}\n</title>\n\n\
         <note>\n{body}\n</note>\n\n\
         {PROMPT_FOOTER}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn prompt_embeds_title_and_body() {
        let prompt = build_prompt("My Note", "note body text", &[], &BTreeSet::new());
        assert!(prompt.contains("<title>\nMy Note\n</title>"));
        assert!(prompt.contains("<note>\nnote body text\n</note>"));
    }

    #[test]
    fn prompt_joins_vocabulary_sorted() {
        let prompt = build_prompt("t", "b", &[], &vocab(&["zebra", "alpha", "mid"]));
        assert!(prompt.contains("Existing tags in vault: alpha, mid, zebra"));
    }

    #[test]
    fn prompt_joins_current_tags() {
        let current = vec!["foo".to_string(), "bar".to_string()];
        let prompt = build_prompt("t", "b", &current, &BTreeSet::new());
        assert!(prompt.contains("Current note tags: foo, bar"));
    }

    #[test]
    fn prompt_requests_json_array_reply() {
        let prompt = build_prompt("t", "b", &[], &BTreeSet::new());
        assert!(prompt.contains("Reply with only a JSON array"));
        assert!(prompt.contains("[\"tag1\", \"tag2\", \"tag3\"]"));
    }

    #[test]
    fn prompt_states_papers_heuristic() {
        let prompt = build_prompt("t", "b", &[], &BTreeSet::new());
        assert!(prompt.contains("\"papers\" tag"));
        assert!(prompt.contains("title is the paper title"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let current = vec!["a".to_string()];
        let vocabulary = vocab(&["x", "y"]);
        let first = build_prompt("t", "b", &current, &vocabulary);
        let second = build_prompt("t", "b", &current, &vocabulary);
        assert_eq!(first, second);
    }
}
