//! Linear undo/redo over whole-tree snapshots.

use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::DocumentTree;

/// Two-stack history of document snapshots.
///
/// The top of the undo stack is the current state; it is never undone past,
/// so a document that saved its initial state can always be restored to it.
#[derive(Debug, Default)]
pub struct HistoryManager {
    undo_stack: Vec<DocumentTree>,
    redo_stack: Vec<DocumentTree>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a copy of `state` as the new current state and drop all redo entries.
    #[instrument(level = "debug", skip_all)]
    pub fn save_state(&mut self, state: &DocumentTree) {
        self.undo_stack.push(state.snapshot());
        self.redo_stack.clear();
        debug!("saved state #{}", self.undo_stack.len());
    }

    /// Step back one state and return a copy of it.
    #[instrument(level = "debug", skip_all)]
    pub fn undo(&mut self) -> DomainResult<DocumentTree> {
        if self.undo_stack.len() <= 1 {
            return Err(DomainError::NothingToUndo);
        }
        if let Some(current) = self.undo_stack.pop() {
            self.redo_stack.push(current);
        }
        self.undo_stack
            .last()
            .map(DocumentTree::snapshot)
            .ok_or(DomainError::NothingToUndo)
    }

    /// Re-apply the most recently undone state and return a copy of it.
    #[instrument(level = "debug", skip_all)]
    pub fn redo(&mut self) -> DomainResult<DocumentTree> {
        let state = self.redo_stack.pop().ok_or(DomainError::NothingToRedo)?;
        let restored = state.snapshot();
        self.undo_stack.push(state);
        Ok(restored)
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}
