//! Vault access: note reads/writes and vault-wide tag vocabulary collection.
//!
//! A vault is a directory tree of markdown notes. All note paths are
//! relative to the vault root.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::frontmatter;

/// A markdown note vault rooted at a single directory.
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    /// Creates a vault rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the vault root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads a note's UTF-8 text, addressed relative to the vault root.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the resolved path if the file is missing,
    /// unreadable, or not valid UTF-8.
    pub fn read_note(&self, rel_path: &Path) -> Result<String> {
        let path = self.root.join(rel_path);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Writes a note's text back in place, addressed relative to the vault
    /// root. Overwrites without any atomic-replace protection.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the resolved path if the write fails.
    pub fn write_note(&self, rel_path: &Path, content: &str) -> Result<()> {
        let path = self.root.join(rel_path);
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Collects every tag declared in any markdown note under the vault
    /// root into one vocabulary set.
    ///
    /// The scan is best-effort: unreadable files are reported to stderr and
    /// skipped, and a note with a malformed frontmatter block simply
    /// contributes no tags. One bad file never aborts the scan.
    pub fn collect_vocabulary(&self) -> BTreeSet<String> {
        let mut vocabulary = BTreeSet::new();

        for entry in WalkDir::new(&self.root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    eprintln!("Error scanning vault: {e}");
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_markdown(entry.path()) {
                continue;
            }

            let content = match fs::read_to_string(entry.path()) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("Error processing {}: {e}", entry.path().display());
                    continue;
                }
            };

            vocabulary.extend(frontmatter::current_tags(&content));
        }

        vocabulary
    }
}

/// Whether a path has a markdown extension.
fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn read_note_resolves_relative_to_root() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "note.md", "hello\n");

        let vault = Vault::new(dir.path());
        let content = vault.read_note(Path::new("note.md")).unwrap();
        assert_eq!(content, "hello\n");
    }

    #[test]
    fn read_note_reports_path_on_missing_file() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path());

        let err = vault.read_note(Path::new("missing.md")).unwrap_err();
        assert!(err.to_string().contains("missing.md"));
    }

    #[test]
    fn write_note_overwrites_in_place() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "note.md", "old\n");

        let vault = Vault::new(dir.path());
        vault.write_note(Path::new("note.md"), "new\n").unwrap();
        assert_eq!(vault.read_note(Path::new("note.md")).unwrap(), "new\n");
    }

    #[test]
    fn vocabulary_unions_tags_across_notes() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "one.md", "---\ntags:\n- a\n- b\n---\n");
        write_file(&dir, "two.md", "---\ntags:\n- b\n- c\n---\n");
        write_file(&dir, "three.md", "no frontmatter here\n");

        let vault = Vault::new(dir.path());
        let vocab = vault.collect_vocabulary();
        let expected: BTreeSet<String> =
            ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(vocab, expected);
    }

    #[test]
    fn vocabulary_recurses_into_subdirectories() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "sub/deep/note.md", "---\ntags: nested\n---\n");

        let vault = Vault::new(dir.path());
        assert!(vault.collect_vocabulary().contains("nested"));
    }

    #[test]
    fn vocabulary_skips_non_markdown_files() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "note.txt", "---\ntags: ignored\n---\n");
        write_file(&dir, "note.md", "---\ntags: kept\n---\n");

        let vault = Vault::new(dir.path());
        let vocab = vault.collect_vocabulary();
        assert!(vocab.contains("kept"));
        assert!(!vocab.contains("ignored"));
    }

    #[test]
    fn vocabulary_skips_malformed_frontmatter() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "bad.md", "---\ntags: foo\nnever closed\n");
        write_file(&dir, "good.md", "---\ntags: ok\n---\n");

        let vault = Vault::new(dir.path());
        let vocab = vault.collect_vocabulary();
        assert_eq!(vocab.len(), 1);
        assert!(vocab.contains("ok"));
    }

    #[test]
    fn vocabulary_includes_bare_string_tags() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "note.md", "---\ntags: solo\n---\n");

        let vault = Vault::new(dir.path());
        assert!(vault.collect_vocabulary().contains("solo"));
    }

    #[test]
    fn vocabulary_is_empty_for_empty_vault() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path());
        assert!(vault.collect_vocabulary().is_empty());
    }
}
