//! File-backed editors, sessions and session state persistence

use std::fs;
use std::sync::Arc;

use htmled::application::{
    ApplicationError, Editor, Session, SessionState, SessionStore, STATE_FILE_NAME,
};
use htmled::infrastructure::traits::{FileSystem, RealFileSystem};
use tempfile::TempDir;

fn real_fs() -> Arc<dyn FileSystem> {
    Arc::new(RealFileSystem)
}

// ============================================================
// Editor
// ============================================================

#[test]
fn given_missing_file_when_opening_then_file_created_and_dirty() {
    let temp = TempDir::new().unwrap();
    let files = temp.path().join("files");

    let editor = Editor::open(real_fs(), &files, "new.html", 4).unwrap();

    assert!(editor.is_dirty());
    let written = fs::read_to_string(files.join("new.html")).unwrap();
    assert!(written.starts_with("<html>"));
    assert!(written.contains("<body></body>"));
}

#[test]
fn given_existing_file_when_opening_then_parsed_and_clean() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("a.html"),
        "<html>\n<body>\n<p id=\"x\">hi</p>\n</body>\n</html>",
    )
    .unwrap();

    let editor = Editor::open(real_fs(), temp.path(), "a.html", 4).unwrap();

    assert!(!editor.is_dirty());
    assert_eq!(editor.document().tree().element_by_id("x").unwrap().content, "hi");
}

#[test]
fn given_edit_when_saving_then_file_reflects_edit_and_clean() {
    let temp = TempDir::new().unwrap();
    let mut editor = Editor::open(real_fs(), temp.path(), "doc.html", 2).unwrap();
    editor.save().unwrap();

    editor.apply(|doc| doc.append("p", "x", "body", "saved")).unwrap();
    assert!(editor.is_dirty());
    editor.save().unwrap();

    assert!(!editor.is_dirty());
    let content = fs::read_to_string(temp.path().join("doc.html")).unwrap();
    assert!(content.contains("    <p id=\"x\">saved</p>"));
}

#[test]
fn given_failed_edit_when_applying_then_editor_stays_clean() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.html"), "<html>\n</html>").unwrap();
    let mut editor = Editor::open(real_fs(), temp.path(), "a.html", 4).unwrap();

    assert!(editor.apply(|doc| doc.delete("ghost")).is_err());
    assert!(!editor.is_dirty());
}

// ============================================================
// Session
// ============================================================

fn session_with(temp: &TempDir, paths: &[&str]) -> Session {
    let mut session = Session::new();
    for path in paths {
        session.add(Editor::open(real_fs(), temp.path(), path, 4).unwrap());
    }
    session
}

#[test]
fn given_added_editors_when_listing_then_last_added_is_active() {
    let temp = TempDir::new().unwrap();
    let session = session_with(&temp, &["a.html", "b.html"]);

    assert_eq!(session.len(), 2);
    assert_eq!(session.active().unwrap().path(), "b.html");
    assert!(session.is_active("b.html"));
}

#[test]
fn given_active_editor_when_removed_then_first_remaining_becomes_active() {
    let temp = TempDir::new().unwrap();
    let mut session = session_with(&temp, &["a.html", "b.html", "c.html"]);

    let closed = session.remove_active().unwrap();

    assert_eq!(closed.path(), "c.html");
    assert_eq!(session.active().unwrap().path(), "a.html");
}

#[test]
fn given_last_editor_when_removed_then_no_active_editor() {
    let temp = TempDir::new().unwrap();
    let mut session = session_with(&temp, &["a.html"]);

    session.remove_active().unwrap();

    assert!(session.active().is_none());
    assert!(matches!(
        session.remove_active(),
        Err(ApplicationError::NoActiveEditor)
    ));
}

#[test]
fn given_unknown_path_when_activating_then_editor_not_found() {
    let temp = TempDir::new().unwrap();
    let mut session = session_with(&temp, &["a.html"]);

    assert!(matches!(
        session.activate("zzz.html"),
        Err(ApplicationError::EditorNotFound(_))
    ));
    assert!(session.activate("a.html").is_ok());
}

// ============================================================
// Session state
// ============================================================

#[test]
fn given_session_when_saved_and_loaded_then_editors_and_active_restored() {
    let temp = TempDir::new().unwrap();
    let files = temp.path().join("files");
    let state_dir = temp.path().join(".temp");
    let store = SessionStore::new(real_fs(), &state_dir);

    let mut session = Session::new();
    session.add(Editor::open(real_fs(), &files, "a.html", 4).unwrap());
    let mut b = Editor::open(real_fs(), &files, "b.html", 4).unwrap();
    b.set_show_id(false);
    session.add(b);
    session.activate("a.html").unwrap();

    store.save(&session).unwrap();
    assert!(state_dir.join(STATE_FILE_NAME).exists());

    let restored = store.load(&files, 4);
    let paths: Vec<&str> = restored.editors().iter().map(|e| e.path()).collect();
    assert_eq!(paths, vec!["a.html", "b.html"]);
    assert_eq!(restored.active().unwrap().path(), "a.html");
    assert!(!restored.find("b.html").unwrap().show_id());
}

#[test]
fn given_missing_state_when_loading_then_empty_session() {
    let temp = TempDir::new().unwrap();
    let store = SessionStore::new(real_fs(), temp.path().join(".temp"));

    assert!(store.load(temp.path(), 4).is_empty());
}

#[test]
fn given_corrupt_state_when_loading_then_empty_session() {
    let temp = TempDir::new().unwrap();
    let state_dir = temp.path().join(".temp");
    fs::create_dir_all(&state_dir).unwrap();
    fs::write(state_dir.join(STATE_FILE_NAME), "editors = 42\n[[[").unwrap();
    let store = SessionStore::new(real_fs(), &state_dir);

    assert!(store.load(temp.path(), 4).is_empty());
}

#[test]
fn given_state_toml_when_parsing_then_show_id_defaults_to_true() {
    let state = SessionState::from_toml(
        "active_editor = \"a.html\"\n\n[[editors]]\nfile_path = \"a.html\"\n",
    )
    .unwrap();

    assert_eq!(state.active_editor.as_deref(), Some("a.html"));
    assert_eq!(state.editors.len(), 1);
    assert!(state.editors[0].show_id);
}

#[test]
fn given_empty_session_when_serializing_then_round_trips() {
    let state = SessionState::from_session(&Session::new());
    let toml = state.to_toml().unwrap();
    assert_eq!(SessionState::from_toml(&toml).unwrap(), state);
}
