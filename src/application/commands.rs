//! Text command dispatcher for the interactive editor

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, instrument};

use crate::application::dir_view::DirView;
use crate::application::editor::Editor;
use crate::application::session::Session;
use crate::application::spellcheck::SpellCheckService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{DecoratedOptions, Document, DomainResult};
use crate::infrastructure::traits::FileSystem;

pub const HELP: &str = "\
Commands:
  load <file>                        open a file (created if missing)
  save                               save the active file
  close                              close the active file (asks twice if unsaved)
  editor-list                        list open files ('>' active, '*' unsaved)
  edit <file>                        switch the active file
  exit                               save the session and quit
  print-tree                         spell-check and show the element tree
  print-indent [width]               spell-check and show the indented markup
  showid true|false                  show element ids in print-tree
  dir-tree                           show the files directory as a tree
  dir-indent [width]                 show the files directory indented
  insert <tag> <id> <before> [text]  insert an element before another
  append <tag> <id> <parent> [text]  append an element to a parent
  edit-id <old> <new>                change an element id
  edit-text <id> [text]              change an element's text
  delete <id>                        delete an element and its children
  undo                               undo the last edit
  redo                               redo the last undone edit
  spell-check                        report spelling errors
  help                               show this help";

/// Result of one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub message: String,
    /// The loop should stop after printing `message`
    pub exit: bool,
}

impl CommandOutcome {
    fn reply(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit: false,
        }
    }
}

/// Executes command lines against a [`Session`].
pub struct CommandHandler {
    session: Session,
    settings: Arc<Settings>,
    fs: Arc<dyn FileSystem>,
    spell: SpellCheckService,
    /// Dirty files whose close is waiting for confirmation
    close_requests: HashSet<String>,
    arg_pattern: Regex,
}

impl CommandHandler {
    pub fn new(
        session: Session,
        settings: Arc<Settings>,
        fs: Arc<dyn FileSystem>,
        spell: SpellCheckService,
    ) -> Self {
        Self {
            session,
            settings,
            fs,
            spell,
            close_requests: HashSet::new(),
            arg_pattern: Regex::new(r#""[^"]*"|[^ ]+"#).expect("valid argument pattern"),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run one command line; failures become `Error: ...` messages.
    #[instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, line: &str) -> CommandOutcome {
        let line = line.trim();
        if line.is_empty() {
            return CommandOutcome::reply("");
        }
        let (command, arguments) = match line.split_once(' ') {
            Some((command, rest)) => (command.to_lowercase(), rest.trim()),
            None => (line.to_lowercase(), ""),
        };
        let args = self.split_arguments(arguments);

        if command == "exit" {
            return CommandOutcome {
                message: "Exiting editor.".to_string(),
                exit: true,
            };
        }

        let result = match command.as_str() {
            "help" => Ok(HELP.to_string()),
            "load" => self.load(&args),
            "save" => self.save(),
            "close" => self.close(),
            "editor-list" => Ok(self.editor_list()),
            "edit" => self.switch(&args),
            "print-tree" => self.print_tree(),
            "print-indent" => self.print_indent(&args),
            "showid" => self.show_id(&args),
            "dir-tree" => self.dir_tree(),
            "dir-indent" => self.dir_indent(&args),
            "insert" => self.insert(&args),
            "append" => self.append(&args),
            "edit-id" => self.edit_id(&args),
            "edit-text" => self.edit_text(&args),
            "delete" => self.delete(&args),
            "undo" => self.edit(|doc| doc.undo()),
            "redo" => self.edit(|doc| doc.redo()),
            "spell-check" => self.spell_check(),
            _ => Ok(format!("Unknown command: {command}")),
        };

        match result {
            Ok(message) => CommandOutcome::reply(message),
            Err(e) => {
                debug!("command '{}' failed: {}", command, e);
                CommandOutcome::reply(format!("Error: {e}"))
            }
        }
    }

    /// Split on spaces; `"quoted text"` stays one argument without its quotes.
    pub fn split_arguments(&self, arguments: &str) -> Vec<String> {
        self.arg_pattern
            .find_iter(arguments)
            .map(|m| m.as_str().trim_matches('"').to_string())
            .collect()
    }

    fn files_dir(&self) -> &Path {
        &self.settings.files_dir
    }

    fn load(&mut self, args: &[String]) -> ApplicationResult<String> {
        let path = required(args, 0, "load <file>")?;
        if self.session.contains(path) {
            return Err(ApplicationError::AlreadyLoaded(path.to_string()));
        }
        let mut editor = Editor::open(
            self.fs.clone(),
            &self.settings.files_dir,
            path,
            self.settings.indent_width,
        )?;
        editor.set_show_id(self.settings.show_id);
        self.session.add(editor);
        Ok(format!("File '{path}' loaded. Active editor switched."))
    }

    fn save(&mut self) -> ApplicationResult<String> {
        self.session.active_mut()?.save()?;
        Ok("File saved.".to_string())
    }

    fn close(&mut self) -> ApplicationResult<String> {
        let editor = self.session.active_mut()?;
        let path = editor.path().to_string();
        if editor.is_dirty() && self.close_requests.insert(path.clone()) {
            return Ok(format!(
                "File '{path}' not saved. Are you sure you want to close it? (Call 'close' again to confirm)"
            ));
        }
        self.close_requests.remove(&path);
        self.session.remove_active()?;
        Ok(format!("Closed '{path}'."))
    }

    fn editor_list(&self) -> String {
        if self.session.is_empty() {
            return "No editors open.".to_string();
        }
        self.session
            .editors()
            .iter()
            .map(|e| {
                let marker = if self.session.is_active(e.path()) { ">" } else { " " };
                let dirty = if e.is_dirty() { "*" } else { "" };
                format!("{marker} {}{dirty}", e.path())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn switch(&mut self, args: &[String]) -> ApplicationResult<String> {
        let path = required(args, 0, "edit <file>")?;
        self.session.activate(path)?;
        Ok(format!("Switched active editor to '{path}'."))
    }

    fn print_tree(&mut self) -> ApplicationResult<String> {
        let editor = self.session.active_mut()?;
        let report = self.spell.check_document(editor.document_mut().tree_mut());
        let options = DecoratedOptions {
            show_id: editor.show_id(),
            mark_errors: true,
            connectors: self.settings.connectors,
            indent_width: self.settings.tree_indent,
        };
        let tree = editor.document().render_decorated(&options);
        Ok(format!("{report}\nHTML Tree:\n{}", tree.trim_end()))
    }

    fn print_indent(&mut self, args: &[String]) -> ApplicationResult<String> {
        let width = width_arg(args, self.settings.indent_width);
        let editor = self.session.active_mut()?;
        let report = self.spell.check_document(editor.document_mut().tree_mut());
        let nested = editor.document().render_nested(width);
        Ok(format!("{report}\nIndented HTML:\n{nested}"))
    }

    fn show_id(&mut self, args: &[String]) -> ApplicationResult<String> {
        let editor = self.session.active_mut()?;
        match args.first().map(|a| a.to_lowercase()).as_deref() {
            Some("true") => {
                editor.set_show_id(true);
                Ok("ShowId enabled.".to_string())
            }
            Some("false") => {
                editor.set_show_id(false);
                Ok("ShowId disabled.".to_string())
            }
            _ => Err(ApplicationError::InvalidArguments(
                "use showid true|false".to_string(),
            )),
        }
    }

    fn dirty_paths(&self) -> HashSet<String> {
        self.session
            .editors()
            .iter()
            .filter(|e| e.is_dirty())
            .map(|e| e.path().trim_start_matches("./").replace('\\', "/"))
            .collect()
    }

    fn dir_tree(&self) -> ApplicationResult<String> {
        let dirty = self.dirty_paths();
        let out = DirView::new(self.files_dir(), &dirty).render_tree()?;
        Ok(out.trim_end().to_string())
    }

    fn dir_indent(&self, args: &[String]) -> ApplicationResult<String> {
        let width = width_arg(args, self.settings.indent_width);
        let dirty = self.dirty_paths();
        let out = DirView::new(self.files_dir(), &dirty).render_indent(width)?;
        Ok(out.trim_end().to_string())
    }

    fn insert(&mut self, args: &[String]) -> ApplicationResult<String> {
        let usage = "insert <tag> <id> <before> [text]";
        let tag = required(args, 0, usage)?;
        let id = required(args, 1, usage)?;
        let before = required(args, 2, usage)?;
        let text = optional(args, 3);
        self.edit(|doc| doc.insert(tag, id, before, text))
    }

    fn append(&mut self, args: &[String]) -> ApplicationResult<String> {
        let usage = "append <tag> <id> <parent> [text]";
        let tag = required(args, 0, usage)?;
        let id = required(args, 1, usage)?;
        let parent = required(args, 2, usage)?;
        let text = optional(args, 3);
        self.edit(|doc| doc.append(tag, id, parent, text))
    }

    fn edit_id(&mut self, args: &[String]) -> ApplicationResult<String> {
        let usage = "edit-id <old> <new>";
        let old_id = required(args, 0, usage)?;
        let new_id = required(args, 1, usage)?;
        self.edit(|doc| doc.edit_id(old_id, new_id))
    }

    fn edit_text(&mut self, args: &[String]) -> ApplicationResult<String> {
        let id = required(args, 0, "edit-text <id> [text]")?;
        let text = optional(args, 1);
        self.edit(|doc| doc.edit_text(id, text))
    }

    fn delete(&mut self, args: &[String]) -> ApplicationResult<String> {
        let id = required(args, 0, "delete <id>")?;
        self.edit(|doc| doc.delete(id))
    }

    fn edit<F>(&mut self, op: F) -> ApplicationResult<String>
    where
        F: FnOnce(&mut Document) -> DomainResult<String>,
    {
        Ok(self.session.active_mut()?.apply(op)?)
    }

    fn spell_check(&mut self) -> ApplicationResult<String> {
        let editor = self.session.active_mut()?;
        Ok(self.spell.check_document(editor.document_mut().tree_mut()))
    }
}

fn required<'a>(args: &'a [String], index: usize, usage: &str) -> ApplicationResult<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| ApplicationError::InvalidArguments(format!("usage: {usage}")))
}

fn optional(args: &[String], index: usize) -> &str {
    args.get(index).map(String::as_str).unwrap_or("")
}

/// Width argument; missing or unparsable falls back to `default`.
fn width_arg(args: &[String], default: usize) -> usize {
    args.first()
        .and_then(|a| a.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::{DisabledSpellChecker, RealFileSystem};
    use rstest::rstest;

    fn handler() -> CommandHandler {
        CommandHandler::new(
            Session::new(),
            Arc::new(Settings::default()),
            Arc::new(RealFileSystem),
            SpellCheckService::new(Arc::new(DisabledSpellChecker)),
        )
    }

    #[rstest]
    #[case("p a body", vec!["p", "a", "body"])]
    #[case("p a body \"hello world\"", vec!["p", "a", "body", "hello world"])]
    #[case("  p   a  ", vec!["p", "a"])]
    #[case("x \"\"", vec!["x", ""])]
    #[case("", vec![])]
    fn given_argument_string_when_splitting_then_keeps_quoted_text(
        #[case] input: &str,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(handler().split_arguments(input), expected);
    }

    #[rstest]
    #[case(&[], 4)]
    #[case(&["2"], 2)]
    #[case(&["wide"], 4)]
    fn given_width_argument_when_parsing_then_falls_back_to_default(
        #[case] args: &[&str],
        #[case] expected: usize,
    ) {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        assert_eq!(width_arg(&args, 4), expected);
    }

    #[test]
    fn given_no_active_editor_when_editing_then_reports_error() {
        let out = handler().execute("append p a body");
        assert_eq!(out.message, "Error: no active editor");
        assert!(!out.exit);
    }

    #[test]
    fn given_unknown_command_when_executing_then_names_it() {
        assert_eq!(handler().execute("Frobnicate x").message, "Unknown command: frobnicate");
    }

    #[test]
    fn given_exit_when_executing_then_requests_exit() {
        let out = handler().execute("exit");
        assert!(out.exit);
        assert_eq!(out.message, "Exiting editor.");
    }
}
