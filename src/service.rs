//! Tagging orchestration: the linear pipeline for one note.
//!
//! One invocation reads the target note, collects the vault vocabulary,
//! requests suggestions, merges them into the note's tag list, and writes
//! the note back in place. There is no branching, retrying, or rollback.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::frontmatter;
use crate::suggester::TagSuggester;
use crate::vault::Vault;

/// Result of one tagging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReport {
    /// The note path, relative to the vault root.
    pub path: PathBuf,

    /// The full tag list now present on the note, sorted.
    pub final_tags: Vec<String>,

    /// Tags actually added by this run, sorted: the suggested tags that
    /// were not already on the note and survived the write.
    pub added_tags: Vec<String>,
}

/// Ties the vault, codec, and suggester together for one target note.
pub struct TaggingService {
    vault: Vault,
    suggester: TagSuggester,
}

impl TaggingService {
    /// Creates a new `TaggingService` over a vault and a suggester.
    pub fn new(vault: Vault, suggester: TagSuggester) -> Self {
        Self { vault, suggester }
    }

    /// Returns the vault this service operates on.
    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Runs the tagging pipeline for one note.
    ///
    /// Steps, strictly in order: read the note; parse its current tags;
    /// collect the vault vocabulary (the target note included, with no
    /// special exclusion); derive the title from the file stem; request
    /// suggestions; union suggested into current tags (case-sensitive, no
    /// near-duplicate normalization); rewrite the frontmatter; write the
    /// note back in place.
    ///
    /// # Errors
    ///
    /// Read failures, suggestion failures, and write failures are fatal
    /// and abort the run. A frontmatter rewrite failure is not: the codec
    /// falls back to the original text, and the report's `added_tags`
    /// reflects what was actually applied (in that case, nothing).
    pub fn run(&self, note_path: &Path) -> Result<TagReport> {
        let content = self.vault.read_note(note_path)?;
        let current_tags = frontmatter::current_tags(&content);

        let vocabulary = self.vault.collect_vocabulary();

        let title = note_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .with_context(|| format!("Cannot derive a title from {}", note_path.display()))?;

        let suggested = self
            .suggester
            .suggest(title, &content, &current_tags, &vocabulary)
            .context("Tag suggestion failed")?;

        let merged: BTreeSet<&String> = current_tags.iter().chain(suggested.iter()).collect();
        let final_tags: Vec<String> = merged.into_iter().cloned().collect();

        let updated = frontmatter::update_tags(&content, &final_tags);
        self.vault.write_note(note_path, &updated)?;

        // Report additions from the written text, not the computed list,
        // so a codec fallback never claims tags it did not apply.
        let applied = frontmatter::current_tags(&updated);
        let current_set: BTreeSet<&str> = current_tags.iter().map(String::as_str).collect();
        let added_tags: Vec<String> = applied
            .iter()
            .filter(|tag| !current_set.contains(tag.as_str()))
            .cloned()
            .collect();

        Ok(TagReport {
            path: note_path.to_path_buf(),
            final_tags: applied,
            added_tags,
        })
    }
}
