//! End-to-end command handling against a temporary files directory

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use htmled::application::{CommandHandler, Session};
use htmled::config::Settings;
use htmled::infrastructure::traits::{
    DictionarySpellChecker, DisabledSpellChecker, RealFileSystem, SpellChecker,
};
use htmled::infrastructure::ServiceContainer;
use tempfile::TempDir;

fn settings_in(temp: &TempDir) -> Settings {
    Settings {
        files_dir: temp.path().join("files"),
        state_dir: temp.path().join(".temp"),
        ..Settings::default()
    }
}

fn handler_with(temp: &TempDir, spell: Arc<dyn SpellChecker>) -> CommandHandler {
    ServiceContainer::with_deps(settings_in(temp), Arc::new(RealFileSystem), spell)
        .command_handler(Session::new())
}

fn handler(temp: &TempDir) -> CommandHandler {
    handler_with(temp, Arc::new(DisabledSpellChecker))
}

fn run(handler: &mut CommandHandler, line: &str) -> String {
    handler.execute(line).message
}

fn files(temp: &TempDir) -> PathBuf {
    temp.path().join("files")
}

#[test]
fn given_new_file_when_editing_and_saving_then_file_written() {
    let temp = TempDir::new().unwrap();
    let mut h = handler(&temp);

    assert_eq!(
        run(&mut h, "load page.html"),
        "File 'page.html' loaded. Active editor switched."
    );
    assert_eq!(
        run(&mut h, "append div main body"),
        "Element 'main' appended to 'body'."
    );
    assert_eq!(
        run(&mut h, "append p intro main \"Hello there world\""),
        "Element 'intro' appended to 'main'."
    );
    assert_eq!(
        run(&mut h, "insert h1 top intro Title"),
        "Element 'top' inserted before 'intro'."
    );
    assert_eq!(run(&mut h, "save"), "File saved.");

    let content = fs::read_to_string(files(&temp).join("page.html")).unwrap();
    assert!(content.contains("<div id=\"main\">"));
    assert!(content.contains("<h1 id=\"top\">Title</h1>"));
    assert!(content.contains("<p id=\"intro\">Hello there world</p>"));
}

#[test]
fn given_loaded_file_when_loading_again_then_error() {
    let temp = TempDir::new().unwrap();
    let mut h = handler(&temp);
    run(&mut h, "load a.html");

    assert_eq!(run(&mut h, "load a.html"), "Error: file already loaded: a.html");
}

#[test]
fn given_missing_arguments_when_appending_then_usage_error() {
    let temp = TempDir::new().unwrap();
    let mut h = handler(&temp);
    run(&mut h, "load a.html");

    assert_eq!(
        run(&mut h, "append p only"),
        "Error: invalid arguments: usage: append <tag> <id> <parent> [text]"
    );
}

#[test]
fn given_domain_failure_when_executing_then_error_message() {
    let temp = TempDir::new().unwrap();
    let mut h = handler(&temp);
    run(&mut h, "load a.html");

    assert_eq!(run(&mut h, "delete ghost"), "Error: element not found: ghost");
    assert_eq!(run(&mut h, "undo"), "Error: no actions to undo");
    assert_eq!(run(&mut h, "redo"), "Error: no actions to redo");
}

#[test]
fn given_edits_when_undo_and_redo_then_text_follows() {
    let temp = TempDir::new().unwrap();
    let mut h = handler(&temp);
    run(&mut h, "load a.html");
    run(&mut h, "append p x body old");
    assert_eq!(
        run(&mut h, "edit-text x \"new text\""),
        "Text of element 'x' updated."
    );

    assert_eq!(run(&mut h, "undo"), "Undo completed.");
    assert!(run(&mut h, "print-indent").contains("<p id=\"x\">old</p>"));

    assert_eq!(run(&mut h, "redo"), "Redo completed.");
    assert!(run(&mut h, "print-indent").contains("<p id=\"x\">new text</p>"));
}

#[test]
fn given_edit_id_when_printing_tree_then_new_id_shown() {
    let temp = TempDir::new().unwrap();
    let mut h = handler(&temp);
    run(&mut h, "load a.html");
    run(&mut h, "append div d1 body hello");
    assert_eq!(run(&mut h, "edit-id d1 box"), "ID of 'd1' changed to 'box'.");

    let out = run(&mut h, "print-tree");

    assert!(out.starts_with("No spelling errors found.\nHTML Tree:\nhtml"));
    assert!(out.contains("div#box"));
    assert!(!out.contains("d1"));
}

#[test]
fn given_showid_false_when_printing_tree_then_ids_hidden() {
    let temp = TempDir::new().unwrap();
    let mut h = handler(&temp);
    run(&mut h, "load a.html");
    run(&mut h, "append div d1 body");

    assert_eq!(run(&mut h, "showid false"), "ShowId disabled.");
    assert!(!run(&mut h, "print-tree").contains("div#d1"));
    assert_eq!(
        run(&mut h, "showid maybe"),
        "Error: invalid arguments: use showid true|false"
    );
}

#[test]
fn given_dirty_editor_when_closing_then_confirmation_required() {
    let temp = TempDir::new().unwrap();
    let mut h = handler(&temp);
    run(&mut h, "load a.html");

    let first = run(&mut h, "close");
    assert!(first.contains("not saved"));
    assert_eq!(h.session().len(), 1);

    assert_eq!(run(&mut h, "close"), "Closed 'a.html'.");
    assert!(h.session().is_empty());
    assert_eq!(run(&mut h, "save"), "Error: no active editor");
}

#[test]
fn given_saved_editor_when_closing_then_closes_immediately() {
    let temp = TempDir::new().unwrap();
    let mut h = handler(&temp);
    run(&mut h, "load a.html");
    run(&mut h, "save");

    assert_eq!(run(&mut h, "close"), "Closed 'a.html'.");
}

#[test]
fn given_several_editors_when_listing_then_marks_active_and_dirty() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(files(&temp)).unwrap();
    fs::write(files(&temp).join("clean.html"), "<html>\n</html>").unwrap();
    let mut h = handler(&temp);
    run(&mut h, "load clean.html");
    run(&mut h, "load fresh.html");

    assert_eq!(run(&mut h, "editor-list"), "  clean.html\n> fresh.html*");

    assert_eq!(
        run(&mut h, "edit clean.html"),
        "Switched active editor to 'clean.html'."
    );
    assert_eq!(run(&mut h, "editor-list"), "> clean.html\n  fresh.html*");
    assert_eq!(
        run(&mut h, "edit other.html"),
        "Error: editor not found for file: other.html"
    );
}

#[test]
fn given_no_editors_when_listing_then_says_so() {
    let temp = TempDir::new().unwrap();
    assert_eq!(run(&mut handler(&temp), "editor-list"), "No editors open.");
}

#[test]
fn given_files_when_listing_directory_then_dirty_files_marked() {
    let temp = TempDir::new().unwrap();
    let mut h = handler(&temp);
    run(&mut h, "load b.html");
    run(&mut h, "load a.html");
    run(&mut h, "save");

    assert_eq!(run(&mut h, "dir-tree"), "files/\n├── a.html\n└── b.html*");
    assert_eq!(run(&mut h, "dir-indent 2"), "files/\n  a.html\n  b.html*");
}

#[test]
fn given_dictionary_when_printing_tree_then_misspelled_element_marked() {
    let temp = TempDir::new().unwrap();
    let checker = DictionarySpellChecker::new(["hello", "world"]);
    let mut h = handler_with(&temp, Arc::new(checker));
    run(&mut h, "load a.html");
    run(&mut h, "append p good body \"hello world\"");
    run(&mut h, "append p bad body \"hello wrld\"");

    let report = run(&mut h, "spell-check");
    assert!(report.starts_with("Element 'bad' - Misspelled word: 'wrld'"));
    assert!(!report.contains("'good'"));

    let tree = run(&mut h, "print-tree");
    assert!(tree.contains("[X] p#bad"));
    assert!(tree.contains("[X] hello wrld"));
    assert!(!tree.contains("[X] p#good"));
}

#[test]
fn given_spell_check_when_running_then_history_unchanged() {
    let temp = TempDir::new().unwrap();
    let mut h = handler(&temp);
    run(&mut h, "load a.html");
    run(&mut h, "append p x body text");

    run(&mut h, "spell-check");
    assert_eq!(run(&mut h, "undo"), "Undo completed.");
    assert_eq!(run(&mut h, "undo"), "Error: no actions to undo");
}

#[test]
fn given_print_indent_width_when_printing_then_uses_width() {
    let temp = TempDir::new().unwrap();
    let mut h = handler(&temp);
    run(&mut h, "load a.html");

    let out = run(&mut h, "print-indent 1");

    assert!(out.contains("Indented HTML:\n<html>\n <head>\n  <title></title>"));
}

#[test]
fn given_help_when_executing_then_lists_commands() {
    let temp = TempDir::new().unwrap();
    let out = run(&mut handler(&temp), "help");
    for command in ["load", "print-tree", "dir-indent", "edit-text", "spell-check"] {
        assert!(out.contains(command), "help should mention {command}");
    }
}

#[test]
fn given_path_outside_files_dir_when_loading_then_rejected() {
    let temp = TempDir::new().unwrap();
    let mut h = handler(&temp);

    assert_eq!(
        run(&mut h, "load ../escape.html"),
        "Error: invalid arguments: document must lie inside the files directory: ../escape.html"
    );
    assert!(!temp.path().join("escape.html").exists());
    assert!(h.session().is_empty());

    let outside = temp.path().join("abs.html");
    let line = format!("load {}", outside.display());
    assert!(run(&mut h, &line).starts_with("Error: invalid arguments"));
    assert!(!outside.exists());
}
