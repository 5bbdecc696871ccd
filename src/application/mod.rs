//! Application layer: sessions, command dispatch and spell checking
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod commands;
pub mod dir_view;
pub mod editor;
pub mod error;
pub mod error_ext;
pub mod session;
pub mod session_state;
pub mod spellcheck;

pub use commands::{CommandHandler, CommandOutcome};
pub use dir_view::DirView;
pub use editor::{document_path, Editor};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use session::Session;
pub use session_state::{EditorState, SessionState, SessionStore, STATE_FILE_NAME};
pub use spellcheck::{SpellCheckService, NO_SPELLING_ERRORS};
