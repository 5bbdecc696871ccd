//! Set of open editors with one active editor

use tracing::debug;

use crate::application::editor::Editor;
use crate::application::session_state::EditorState;
use crate::application::{ApplicationError, ApplicationResult};

/// Open editors in load order plus the active one.
#[derive(Default)]
pub struct Session {
    editors: Vec<Editor>,
    active: Option<usize>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn editors(&self) -> &[Editor] {
        &self.editors
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    /// Add an editor and make it active.
    pub fn add(&mut self, editor: Editor) {
        debug!("adding editor for {}", editor.path());
        self.editors.push(editor);
        self.active = Some(self.editors.len() - 1);
    }

    pub fn find(&self, path: &str) -> Option<&Editor> {
        self.editors.iter().find(|e| e.path() == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    /// Make the editor for `path` the active one.
    pub fn activate(&mut self, path: &str) -> ApplicationResult<()> {
        let pos = self
            .editors
            .iter()
            .position(|e| e.path() == path)
            .ok_or_else(|| ApplicationError::EditorNotFound(path.to_string()))?;
        self.active = Some(pos);
        Ok(())
    }

    pub fn active(&self) -> Option<&Editor> {
        self.active.and_then(|pos| self.editors.get(pos))
    }

    pub fn active_mut(&mut self) -> ApplicationResult<&mut Editor> {
        self.active
            .and_then(|pos| self.editors.get_mut(pos))
            .ok_or(ApplicationError::NoActiveEditor)
    }

    pub fn is_active(&self, path: &str) -> bool {
        self.active().is_some_and(|e| e.path() == path)
    }

    /// Close the active editor; the first remaining editor becomes active.
    pub fn remove_active(&mut self) -> ApplicationResult<Editor> {
        let pos = self.active.ok_or(ApplicationError::NoActiveEditor)?;
        let editor = self.editors.remove(pos);
        self.active = if self.editors.is_empty() { None } else { Some(0) };
        debug!("closed editor for {}", editor.path());
        Ok(editor)
    }

    /// Persistable view of the open editors.
    pub fn editor_states(&self) -> Vec<EditorState> {
        self.editors
            .iter()
            .map(|e| EditorState {
                file_path: e.path().to_string(),
                show_id: e.show_id(),
            })
            .collect()
    }
}
