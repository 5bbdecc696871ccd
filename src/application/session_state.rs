//! Persistence of the open-editor list between runs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::application::editor::Editor;
use crate::application::session::Session;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::infrastructure::traits::FileSystem;

/// File name of the state file inside the state directory.
pub const STATE_FILE_NAME: &str = "session_state.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_editor: Option<String>,
    pub editors: Vec<EditorState>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditorState {
    pub file_path: String,
    #[serde(default = "default_show_id")]
    pub show_id: bool,
}

fn default_show_id() -> bool {
    true
}

impl SessionState {
    pub fn from_session(session: &Session) -> Self {
        Self {
            active_editor: session.active().map(|e| e.path().to_string()),
            editors: session.editor_states(),
        }
    }

    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::SessionState {
            message: format!("serialize: {e}"),
        })
    }

    pub fn from_toml(content: &str) -> ApplicationResult<Self> {
        toml::from_str(content).map_err(|e| ApplicationError::SessionState {
            message: format!("parse: {e}"),
        })
    }
}

/// Reads and writes [`SessionState`] below the state directory.
pub struct SessionStore {
    fs: Arc<dyn FileSystem>,
    state_dir: PathBuf,
}

impl SessionStore {
    pub fn new(fs: Arc<dyn FileSystem>, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            state_dir: state_dir.into(),
        }
    }

    pub fn state_path(&self) -> PathBuf {
        self.state_dir.join(STATE_FILE_NAME)
    }

    /// Rebuild the last session.
    ///
    /// A missing or unreadable state file gives an empty session. Editors whose
    /// file cannot be opened are skipped.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, files_dir: &Path, indent_width: usize) -> Session {
        let state = match self.read_state() {
            Ok(Some(state)) => state,
            Ok(None) => return Session::new(),
            Err(e) => {
                warn!("ignoring session state: {}", e);
                return Session::new();
            }
        };

        let mut session = Session::new();
        for entry in &state.editors {
            if session.contains(&entry.file_path) {
                continue;
            }
            match Editor::open(self.fs.clone(), files_dir, &entry.file_path, indent_width) {
                Ok(mut editor) => {
                    editor.set_show_id(entry.show_id);
                    session.add(editor);
                }
                Err(e) => warn!("cannot restore editor for {}: {}", entry.file_path, e),
            }
        }
        if let Some(active) = &state.active_editor {
            if session.activate(active).is_err() {
                debug!("active editor {} not restored", active);
            }
        }
        debug!("restored {} editors", session.len());
        session
    }

    #[instrument(level = "debug", skip_all)]
    pub fn save(&self, session: &Session) -> ApplicationResult<()> {
        let path = self.state_path();
        let content = SessionState::from_session(session).to_toml()?;
        self.fs
            .create_dir_all(&self.state_dir)
            .with_path_context("create state directory", &self.state_dir)?;
        self.fs
            .write(&path, &content)
            .with_path_context("write session state", &path)
    }

    fn read_state(&self) -> ApplicationResult<Option<SessionState>> {
        let path = self.state_path();
        if !self.fs.exists(&path) {
            return Ok(None);
        }
        let content = self
            .fs
            .read_to_string(&path)
            .with_path_context("read session state", &path)?;
        SessionState::from_toml(&content).map(Some)
    }
}
