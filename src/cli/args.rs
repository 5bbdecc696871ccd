//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Line-oriented editor for simple html documents, with undo/redo and spell checking
#[derive(Parser, Debug)]
#[command(name = "htmled")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Files directory (default: from config, "files")
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub files_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive editor session (default)
    Repl,

    /// Print a document as an element tree
    Tree {
        /// Document, relative to the files directory
        file: String,
        /// Hide element ids
        #[arg(long)]
        no_id: bool,
        /// Plain indentation instead of branch connectors
        #[arg(long)]
        indent: bool,
    },

    /// Print a document in its indented markup form
    Indent {
        /// Document, relative to the files directory
        file: String,
        /// Spaces per level
        #[arg(short, long)]
        width: Option<usize>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
