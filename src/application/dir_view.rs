//! Listing of the files directory

use std::cmp::Ordering;
use std::collections::HashSet;
use std::io;
use std::path::Path;

use termtree::Tree;
use tracing::instrument;
use walkdir::{DirEntry, WalkDir};

use crate::application::{ApplicationError, ApplicationResult};

/// Directory listing; directories end in `/`, dirty open files in `*`.
pub struct DirView<'a> {
    root: &'a Path,
    dirty: &'a HashSet<String>,
}

struct Line {
    depth: usize,
    label: String,
}

impl<'a> DirView<'a> {
    /// `dirty` holds paths relative to `root`, using `/` as separator.
    pub fn new(root: &'a Path, dirty: &'a HashSet<String>) -> Self {
        Self { root, dirty }
    }

    /// Listing with branch connectors.
    #[instrument(level = "debug", skip(self), fields(root = %self.root.display()))]
    pub fn render_tree(&self) -> ApplicationResult<String> {
        let lines = self.collect()?;
        // open subtrees by depth; the root is depth 0
        let mut stack: Vec<(usize, Tree<String>)> = Vec::new();
        for line in lines {
            while stack.last().is_some_and(|(depth, _)| *depth >= line.depth) {
                fold(&mut stack);
            }
            stack.push((line.depth, Tree::new(line.label)));
        }
        while stack.len() > 1 {
            fold(&mut stack);
        }
        Ok(stack
            .pop()
            .map(|(_, tree)| tree.to_string())
            .unwrap_or_default())
    }

    /// Listing with `width` spaces per level.
    #[instrument(level = "debug", skip(self), fields(root = %self.root.display()))]
    pub fn render_indent(&self, width: usize) -> ApplicationResult<String> {
        let mut out = String::new();
        for line in self.collect()? {
            out.push_str(&" ".repeat(line.depth * width));
            out.push_str(&line.label);
            out.push('\n');
        }
        Ok(out)
    }

    fn collect(&self) -> ApplicationResult<Vec<Line>> {
        if !self.root.is_dir() {
            return Err(ApplicationError::io(
                format!("list directory: {}", self.root.display()),
                io::Error::new(io::ErrorKind::NotFound, "files directory does not exist"),
            ));
        }

        let mut lines = Vec::new();
        for entry in WalkDir::new(self.root).sort_by(dirs_first) {
            let entry = entry.map_err(|e| {
                let context = format!("list directory: {}", self.root.display());
                ApplicationError::io(context, io::Error::other(e.to_string()))
            })?;
            lines.push(Line {
                depth: entry.depth(),
                label: self.label(&entry),
            });
        }
        Ok(lines)
    }

    fn label(&self, entry: &DirEntry) -> String {
        let name = if entry.depth() == 0 {
            self.root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.root.display().to_string())
        } else {
            entry.file_name().to_string_lossy().into_owned()
        };

        if entry.file_type().is_dir() {
            return format!("{name}/");
        }
        let relative = entry
            .path()
            .strip_prefix(self.root)
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        if self.dirty.contains(&relative) {
            format!("{name}*")
        } else {
            name
        }
    }
}

fn dirs_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.file_type()
        .is_dir()
        .cmp(&a.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn fold(stack: &mut Vec<(usize, Tree<String>)>) {
    if stack.len() < 2 {
        return;
    }
    if let Some((_, child)) = stack.pop() {
        if let Some((_, parent)) = stack.last_mut() {
            parent.push(child);
        }
    }
}
