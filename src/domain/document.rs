//! A document under edit: the live tree plus its own history.

use tracing::instrument;

use crate::domain::error::DomainResult;
use crate::domain::history::HistoryManager;
use crate::domain::parser::DocumentParser;
use crate::domain::render::{render_decorated, render_nested, DecoratedOptions};
use crate::domain::tree::DocumentTree;

/// Live tree and history of one open document.
///
/// Every successful edit is recorded, and the initial state is recorded on
/// construction, so undo never empties the history.
#[derive(Debug)]
pub struct Document {
    tree: DocumentTree,
    history: HistoryManager,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty html/head/body document.
    pub fn new() -> Self {
        Self::from_tree(DocumentTree::new())
    }

    /// Document read from its serialized form.
    pub fn parse(content: &str) -> Self {
        Self::from_tree(DocumentParser::new().parse(content))
    }

    pub fn from_tree(tree: DocumentTree) -> Self {
        let mut history = HistoryManager::new();
        history.save_state(&tree);
        Self { tree, history }
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    /// Mutable access for annotations that are not edits (spell flags).
    pub fn tree_mut(&mut self) -> &mut DocumentTree {
        &mut self.tree
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    #[instrument(level = "debug", skip(self, content))]
    pub fn insert(&mut self, tag: &str, id: &str, before: &str, content: &str) -> DomainResult<String> {
        self.tree.insert_before(tag, id, before, content)?;
        self.commit();
        Ok(format!("Element '{id}' inserted before '{before}'."))
    }

    #[instrument(level = "debug", skip(self, content))]
    pub fn append(&mut self, tag: &str, id: &str, parent: &str, content: &str) -> DomainResult<String> {
        self.tree.append_child(tag, id, parent, content)?;
        self.commit();
        Ok(format!("Element '{id}' appended to '{parent}'."))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn edit_id(&mut self, old_id: &str, new_id: &str) -> DomainResult<String> {
        self.tree.rename_id(old_id, new_id)?;
        if old_id != new_id {
            self.commit();
        }
        Ok(format!("ID of '{old_id}' changed to '{new_id}'."))
    }

    #[instrument(level = "debug", skip(self, content))]
    pub fn edit_text(&mut self, id: &str, content: &str) -> DomainResult<String> {
        self.tree.edit_text(id, content)?;
        self.commit();
        Ok(format!("Text of element '{id}' updated."))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: &str) -> DomainResult<String> {
        self.tree.delete(id)?;
        self.commit();
        Ok(format!("Element '{id}' deleted."))
    }

    pub fn undo(&mut self) -> DomainResult<String> {
        self.tree = self.history.undo()?;
        Ok("Undo completed.".to_string())
    }

    pub fn redo(&mut self) -> DomainResult<String> {
        self.tree = self.history.redo()?;
        Ok("Redo completed.".to_string())
    }

    pub fn render_nested(&self, indent_width: usize) -> String {
        render_nested(&self.tree, indent_width)
    }

    pub fn render_decorated(&self, options: &DecoratedOptions) -> String {
        render_decorated(&self.tree, options)
    }

    fn commit(&mut self) {
        self.history.save_state(&self.tree);
    }
}
