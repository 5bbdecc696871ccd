//! Layered settings loading

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use htmled::application::ApplicationError;
use htmled::config::{local_config_path, Settings, LOCAL_CONFIG_FILE};
use tempfile::TempDir;

// Settings::load reads process-wide environment variables
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn given_local_config_when_loading_then_overrides_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(LOCAL_CONFIG_FILE),
        "files_dir = \"docs\"\nindent_width = 2\nconnectors = false\n",
    )
    .unwrap();

    let settings = Settings::load(Some(temp.path())).unwrap();

    assert_eq!(settings.files_dir, PathBuf::from("docs"));
    assert_eq!(settings.indent_width, 2);
    assert!(!settings.connectors);
}

#[test]
fn given_invalid_local_config_when_loading_then_config_error() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new().unwrap();
    fs::write(local_config_path(temp.path()), "indent_width = \"wide\"\n").unwrap();

    let result = Settings::load(Some(temp.path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_env_vars_when_loading_then_override_local_config() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new().unwrap();
    fs::write(local_config_path(temp.path()), "tree_indent = 3\n").unwrap();

    std::env::set_var("HTMLED_TREE_INDENT", "7");
    std::env::set_var("HTMLED_SHOW_ID", "false");
    let settings = Settings::load(Some(temp.path()));
    std::env::remove_var("HTMLED_TREE_INDENT");
    std::env::remove_var("HTMLED_SHOW_ID");

    let settings = settings.unwrap();
    assert_eq!(settings.tree_indent, 7);
    assert!(!settings.show_id);
}

#[test]
fn given_invalid_env_value_when_loading_then_config_error() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new().unwrap();

    std::env::set_var("HTMLED_INDENT_WIDTH", "wide");
    let result = Settings::load(Some(temp.path()));
    std::env::remove_var("HTMLED_INDENT_WIDTH");

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_effective_settings_when_shown_then_valid_toml() {
    let toml = Settings::default().to_toml().unwrap();
    assert!(toml.contains("files_dir = \"files\""));
    assert!(toml.contains("indent_width = 4"));
    assert!(!toml.contains("dictionary"));
}
