//! Domain layer: document tree, edits, parsing, rendering and history
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod document;
pub mod element;
pub mod error;
pub mod history;
pub mod mutate;
pub mod parser;
pub mod render;
pub mod tree;

pub use document::Document;
pub use element::{Element, ElementKind, NodeId};
pub use error::{DomainError, DomainResult};
pub use history::HistoryManager;
pub use parser::{parse_document, DocumentParser};
pub use render::{render_decorated, render_nested, DecoratedOptions, ERROR_MARKER};
pub use tree::{DocumentTree, OutlineEntry};
