//! Command execution for the htmled binary

use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{document_path, IoResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{DecoratedOptions, Document};
use crate::infrastructure::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(Commands::Completion { shell }) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = load_settings(cli)?;
    match &cli.command {
        None | Some(Commands::Repl) => repl(settings),
        Some(Commands::Tree {
            file,
            no_id,
            indent,
        }) => print_tree(&settings, file, *no_id, *indent),
        Some(Commands::Indent { file, width }) => print_indent(&settings, file, *width),
        Some(Commands::Config { command }) => config(&settings, command),
        Some(Commands::Completion { .. }) => Ok(()),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(None)?;
    if let Some(dir) = &cli.files_dir {
        settings.files_dir = dir.clone();
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

/// Read-eval-print loop; end of input behaves like `exit`.
#[instrument(skip_all)]
fn repl(settings: Settings) -> CliResult<()> {
    let container = ServiceContainer::new(settings)?;
    let store = container.session_store();
    let session = store.load(
        &container.settings.files_dir,
        container.settings.indent_width,
    );
    let mut handler = container.command_handler(session);

    output::info("Welcome to the HTML Editor. Type 'help' to see available commands.");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        output::prompt(">");
        let Some(line) = lines.next() else {
            output::info("");
            break;
        };
        let line = line.map_err(|e| {
            CliError::from(crate::application::ApplicationError::io("read input", e))
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let outcome = handler.execute(&line);
        if !outcome.message.is_empty() {
            output::reply(&outcome.message);
        }
        if outcome.exit {
            break;
        }
    }

    if let Err(e) = store.save(handler.session()) {
        output::warning(&format!("session state not saved: {e}"));
    }
    Ok(())
}

fn read_document(settings: &Settings, file: &str) -> CliResult<Document> {
    let path = document_path(&settings.files_dir, file)?;
    let content = std::fs::read_to_string(&path).with_path_context("read document", &path)?;
    Ok(Document::parse(&content))
}

fn print_tree(settings: &Settings, file: &str, no_id: bool, indent: bool) -> CliResult<()> {
    let document = read_document(settings, file)?;
    let options = DecoratedOptions {
        show_id: settings.show_id && !no_id,
        mark_errors: false,
        connectors: settings.connectors && !indent,
        indent_width: settings.tree_indent,
    };
    print!("{}", document.render_decorated(&options));
    Ok(())
}

fn print_indent(settings: &Settings, file: &str, width: Option<usize>) -> CliResult<()> {
    let document = read_document(settings, file)?;
    output::info(&document.render_nested(width.unwrap_or(settings.indent_width)));
    Ok(())
}

fn config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(settings.to_toml()?.trim_end());
            Ok(())
        }
        ConfigCommands::Path => {
            output::header("Config files (lowest to highest precedence):");
            match global_config_path() {
                Some(path) => output::detail(&describe(&path)),
                None => output::detail("global: no config directory on this platform"),
            }
            output::detail(&describe(&local_config_path(std::path::Path::new("."))));
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("no global config directory on this platform".into())
                })?
            } else {
                local_config_path(std::path::Path::new("."))
            };
            init_config(path)
        }
    }
}

fn describe(path: &std::path::Path) -> String {
    let state = if path.exists() { "exists" } else { "not found" };
    format!("{} ({state})", path.display())
}

fn init_config(path: PathBuf) -> CliResult<()> {
    if path.exists() {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_path_context("create config directory", parent)?;
    }
    std::fs::write(&path, Settings::template()).with_path_context("write config", &path)?;
    output::success(&format!("created {}", path.display()));
    Ok(())
}
