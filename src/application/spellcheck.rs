//! Spell checking of document content

use std::sync::Arc;

use tracing::{instrument, warn};

use crate::domain::DocumentTree;
use crate::infrastructure::traits::{SpellChecker, SpellIssue};

pub const NO_SPELLING_ERRORS: &str = "No spelling errors found.";

/// Runs a [`SpellChecker`] over every element and flags the ones with issues.
#[derive(Clone)]
pub struct SpellCheckService {
    checker: Arc<dyn SpellChecker>,
}

impl SpellCheckService {
    pub fn new(checker: Arc<dyn SpellChecker>) -> Self {
        Self { checker }
    }

    /// Check every element's text and return the report.
    ///
    /// Sets each element's spelling flag; elements without text are cleared.
    /// This is an annotation, not an edit, so history is left alone.
    #[instrument(level = "debug", skip_all)]
    pub fn check_document(&self, tree: &mut DocumentTree) -> String {
        let nodes: Vec<_> = tree.iter().map(|(idx, _)| idx).collect();
        let mut report = String::new();

        for idx in nodes {
            let Some(element) = tree.get_node_mut(idx) else {
                continue;
            };
            if element.content.is_empty() {
                element.spell_error = false;
                continue;
            }
            let issues = match self.checker.check(&element.content) {
                Ok(issues) => issues,
                Err(e) => {
                    warn!("spell check failed for element '{}': {}", element.id, e);
                    Vec::new()
                }
            };
            element.spell_error = !issues.is_empty();
            for issue in &issues {
                write_issue(&mut report, &element.id, issue);
            }
        }

        if report.is_empty() {
            NO_SPELLING_ERRORS.to_string()
        } else {
            report.trim_end().to_string()
        }
    }
}

fn write_issue(report: &mut String, id: &str, issue: &SpellIssue) {
    let suggestions = if issue.suggestions.is_empty() {
        "No suggestions available".to_string()
    } else {
        issue.suggestions.join(", ")
    };
    report.push_str(&format!(
        "Element '{}' - Misspelled word: '{}'\n  Context: '{}'\n  Position: Offset {}, Length {}\n  Suggestions: {}\n\n",
        id, issue.word, issue.context, issue.offset, issue.length, suggestions
    ));
}
