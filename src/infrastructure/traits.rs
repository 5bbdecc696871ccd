//! I/O boundary traits for testability
//!
//! These traits abstract the filesystem and the spell-check collaborator,
//! allowing sessions and commands to be tested with substitute implementations.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use regex::Regex;
use tracing::debug;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// One misspelled word found in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellIssue {
    pub word: String,
    /// Text the word was found in
    pub context: String,
    /// Character offset of the word inside `context`
    pub offset: usize,
    /// Length of the word in characters
    pub length: usize,
    pub suggestions: Vec<String>,
}

/// Spell-check collaborator.
///
/// Failures are reported as plain messages; callers treat them as "no issues".
pub trait SpellChecker: Send + Sync {
    fn check(&self, text: &str) -> Result<Vec<SpellIssue>, String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Spell checker used when no dictionary is configured.
#[derive(Debug, Default)]
pub struct DisabledSpellChecker;

impl SpellChecker for DisabledSpellChecker {
    fn check(&self, _text: &str) -> Result<Vec<SpellIssue>, String> {
        Ok(Vec::new())
    }
}

/// Maximum number of suggestions reported per word.
pub const MAX_SUGGESTIONS: usize = 10;

/// Word-list spell checker.
///
/// Words are compared case-insensitively. Suggestions are dictionary words
/// with the same first letter and a length within one character.
#[derive(Debug)]
pub struct DictionarySpellChecker {
    words: BTreeSet<String>,
    word_pattern: Regex,
}

impl DictionarySpellChecker {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            words,
            word_pattern: Regex::new(r"\p{Alphabetic}+(?:'\p{Alphabetic}+)*")
                .expect("valid word pattern"),
        }
    }

    /// Load a word list, one word per line; `#` starts a comment line.
    pub fn from_file(fs: &dyn FileSystem, path: &Path) -> io::Result<Self> {
        let content = fs.read_to_string(path)?;
        let checker = Self::new(
            content
                .lines()
                .filter(|line| !line.trim_start().starts_with('#')),
        );
        debug!("loaded {} dictionary words from {}", checker.len(), path.display());
        Ok(checker)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    fn suggestions(&self, word: &str) -> Vec<String> {
        let word = word.to_lowercase();
        let Some(first) = word.chars().next() else {
            return Vec::new();
        };
        let len = word.chars().count();
        self.words
            .iter()
            .filter(|candidate| candidate.starts_with(first))
            .filter(|candidate| candidate.chars().count().abs_diff(len) <= 1)
            .take(MAX_SUGGESTIONS)
            .cloned()
            .collect()
    }
}

impl SpellChecker for DictionarySpellChecker {
    fn check(&self, text: &str) -> Result<Vec<SpellIssue>, String> {
        let issues = self
            .word_pattern
            .find_iter(text)
            .filter(|m| !self.contains(m.as_str()))
            .map(|m| SpellIssue {
                word: m.as_str().to_string(),
                context: text.to_string(),
                offset: text[..m.start()].chars().count(),
                length: m.as_str().chars().count(),
                suggestions: self.suggestions(m.as_str()),
            })
            .collect();
        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> DictionarySpellChecker {
        DictionarySpellChecker::new(["hello", "help", "world", "word", "words", "wordsmith"])
    }

    #[test]
    fn given_known_words_when_checking_then_no_issues() {
        assert!(checker().check("Hello World").unwrap().is_empty());
    }

    #[test]
    fn given_unknown_word_when_checking_then_reports_char_position() {
        let issues = checker().check("héllo wrld").unwrap();
        let wrld = issues.iter().find(|i| i.word == "wrld").unwrap();
        assert_eq!(wrld.offset, 6);
        assert_eq!(wrld.length, 4);
        assert_eq!(wrld.context, "héllo wrld");
        assert_eq!(wrld.suggestions, vec!["word", "words", "world"]);
    }

    #[test]
    fn given_disabled_checker_when_checking_then_never_reports() {
        assert!(DisabledSpellChecker.check("zzzz qqqq").unwrap().is_empty());
    }
}
