//! File-backed document editor

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Document, DomainResult};
use crate::infrastructure::traits::FileSystem;

/// Resolve a user-given document path below `files_dir`.
///
/// Absolute paths and `..` components are rejected so that every document
/// stays inside the files directory.
pub fn document_path(files_dir: &Path, path: &str) -> ApplicationResult<PathBuf> {
    let relative = Path::new(path);
    let escapes = relative.is_absolute()
        || relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
    if path.is_empty() || escapes {
        return Err(ApplicationError::InvalidArguments(format!(
            "document must lie inside the files directory: {path}"
        )));
    }
    Ok(files_dir.join(relative))
}

/// One open document bound to a file below the files directory.
pub struct Editor {
    /// Path as given by the user, relative to the files directory
    path: String,
    full_path: PathBuf,
    document: Document,
    dirty: bool,
    show_id: bool,
    indent_width: usize,
    fs: Arc<dyn FileSystem>,
}

impl Editor {
    /// Open `path` below `files_dir`.
    ///
    /// A missing file starts as an empty document that is written right away
    /// and stays marked dirty.
    #[instrument(level = "debug", skip(fs, files_dir))]
    pub fn open(
        fs: Arc<dyn FileSystem>,
        files_dir: &Path,
        path: &str,
        indent_width: usize,
    ) -> ApplicationResult<Self> {
        let full_path = document_path(files_dir, path)?;
        let exists = fs.is_file(&full_path);
        let document = if exists {
            let content = fs
                .read_to_string(&full_path)
                .with_path_context("read document", &full_path)?;
            Document::parse(&content)
        } else {
            Document::new()
        };

        let mut editor = Self {
            path: path.to_string(),
            full_path,
            document,
            dirty: false,
            show_id: true,
            indent_width,
            fs,
        };
        if !exists {
            info!("{} not found, created empty document", editor.full_path.display());
            editor.save()?;
            editor.dirty = true;
        }
        Ok(editor)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Access for non-edit annotations; does not mark the editor dirty.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn show_id(&self) -> bool {
        self.show_id
    }

    pub fn set_show_id(&mut self, show_id: bool) {
        self.show_id = show_id;
    }

    /// Run an edit (or undo/redo) on the document; success marks the editor dirty.
    pub fn apply<F>(&mut self, op: F) -> DomainResult<String>
    where
        F: FnOnce(&mut Document) -> DomainResult<String>,
    {
        let message = op(&mut self.document)?;
        self.dirty = true;
        Ok(message)
    }

    /// Write the nested form to the backing file.
    #[instrument(level = "debug", skip(self), fields(path = %self.full_path.display()))]
    pub fn save(&mut self) -> ApplicationResult<()> {
        let content = self.document.render_nested(self.indent_width);
        self.fs
            .ensure_parent(&self.full_path)
            .with_path_context("create directory for", &self.full_path)?;
        self.fs
            .write(&self.full_path, &content)
            .with_path_context("write document", &self.full_path)?;
        self.dirty = false;
        debug!("saved {} bytes", content.len());
        Ok(())
    }
}
