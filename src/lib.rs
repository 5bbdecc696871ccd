//! htmled: a line-oriented editor for simple html documents
//!
//! Layers, inner to outer:
//! - [`domain`]: document tree, validated edits, parser, renderers, undo/redo
//! - [`application`]: file-backed editors, sessions, command dispatch, spell checking
//! - [`infrastructure`]: filesystem and spell-check implementations, service wiring
//! - [`cli`]: argument model and command execution for the binary

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
