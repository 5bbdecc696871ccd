//! Validated tree edits.
//!
//! Every operation checks all preconditions before touching the tree, so a
//! failed call leaves the document exactly as it was.

use tracing::{debug, instrument};

use crate::domain::element::{is_reserved_tag, Element, ElementKind, NodeId};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::DocumentTree;

impl DocumentTree {
    /// Create an element and splice it in right before `anchor_id`.
    #[instrument(level = "debug", skip(self, content))]
    pub fn insert_before(
        &mut self,
        tag: &str,
        new_id: &str,
        anchor_id: &str,
        content: &str,
    ) -> DomainResult<NodeId> {
        let anchor = self.lookup(anchor_id)?;
        // the root has no sibling position
        let parent = self
            .parent(anchor)
            .ok_or_else(|| DomainError::NotFound(anchor_id.to_string()))?;
        self.check_new_element(tag, new_id)?;
        if anchor == self.head() || anchor == self.body() {
            return Err(DomainError::ReservedElement {
                id: anchor_id.to_string(),
                action: "insert elements before it",
            });
        }

        let position = self
            .children(parent)
            .iter()
            .position(|&child| child == anchor)
            .ok_or_else(|| DomainError::NotFound(anchor_id.to_string()))?;
        let idx = self.attach(
            Element::new(ElementKind::for_tag(tag), new_id, content),
            parent,
            Some(position),
        );
        debug!("inserted <{}> '{}' before '{}'", tag, new_id, anchor_id);
        Ok(idx)
    }

    /// Create an element as the last child of `parent_id`.
    #[instrument(level = "debug", skip(self, content))]
    pub fn append_child(
        &mut self,
        tag: &str,
        new_id: &str,
        parent_id: &str,
        content: &str,
    ) -> DomainResult<NodeId> {
        let parent = self.lookup(parent_id)?;
        self.check_new_element(tag, new_id)?;
        if parent == self.title() {
            return Err(DomainError::ReservedElement {
                id: parent_id.to_string(),
                action: "append children to it",
            });
        }

        let idx = self.attach(
            Element::new(ElementKind::for_tag(tag), new_id, content),
            parent,
            None,
        );
        debug!("appended <{}> '{}' to '{}'", tag, new_id, parent_id);
        Ok(idx)
    }

    /// Change an element's id. Renaming to the same id is a no-op.
    #[instrument(level = "debug", skip(self))]
    pub fn rename_id(&mut self, old_id: &str, new_id: &str) -> DomainResult<()> {
        let idx = self.lookup(old_id)?;
        if old_id == new_id {
            return Ok(());
        }
        if self.contains_id(new_id) {
            return Err(DomainError::DuplicateId(new_id.to_string()));
        }
        if self.is_singleton(idx) {
            return Err(DomainError::ReservedElement {
                id: old_id.to_string(),
                action: "change its id",
            });
        }

        if let Some(element) = self.get_node_mut(idx) {
            element.id = new_id.to_string();
        }
        Ok(())
    }

    /// Replace an element's text content.
    #[instrument(level = "debug", skip(self, content))]
    pub fn edit_text(&mut self, id: &str, content: &str) -> DomainResult<()> {
        let idx = self.lookup(id)?;
        if let Some(element) = self.get_node_mut(idx) {
            element.content = content.to_string();
        }
        Ok(())
    }

    /// Remove an element and its whole subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: &str) -> DomainResult<()> {
        let idx = self.lookup(id)?;
        if idx == self.root() {
            return Err(DomainError::NotFound(id.to_string()));
        }
        if self.is_singleton(idx) {
            return Err(DomainError::ReservedElement {
                id: id.to_string(),
                action: "delete it",
            });
        }

        let removed = self.remove_subtree(idx);
        debug!("deleted '{}' ({} nodes)", id, removed);
        Ok(())
    }

    fn lookup(&self, id: &str) -> DomainResult<NodeId> {
        self.find_by_id(id)
            .ok_or_else(|| DomainError::NotFound(id.to_string()))
    }

    fn check_new_element(&self, tag: &str, new_id: &str) -> DomainResult<()> {
        if self.contains_id(new_id) {
            return Err(DomainError::DuplicateId(new_id.to_string()));
        }
        if is_reserved_tag(tag) {
            return Err(DomainError::ReservedElement {
                id: tag.to_string(),
                action: "create another one",
            });
        }
        Ok(())
    }
}
