//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use tracing::debug;

use crate::application::{
    ApplicationResult, CommandHandler, IoResultExt, Session, SessionStore, SpellCheckService,
};
use crate::config::Settings;
use crate::infrastructure::traits::{
    DictionarySpellChecker, DisabledSpellChecker, FileSystem, RealFileSystem, SpellChecker,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Spell-check collaborator
    pub spell: Arc<dyn SpellChecker>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    ///
    /// Loads the configured dictionary; without one spell checking is disabled.
    pub fn new(settings: Settings) -> ApplicationResult<Self> {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let spell: Arc<dyn SpellChecker> = match &settings.dictionary {
            Some(path) => Arc::new(
                DictionarySpellChecker::from_file(fs.as_ref(), path)
                    .with_path_context("load dictionary", path)?,
            ),
            None => {
                debug!("no dictionary configured, spell checking disabled");
                Arc::new(DisabledSpellChecker)
            }
        };
        Ok(Self::with_deps(settings, fs, spell))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        spell: Arc<dyn SpellChecker>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            spell,
        }
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(self.fs.clone(), self.settings.state_dir.clone())
    }

    pub fn command_handler(&self, session: Session) -> CommandHandler {
        CommandHandler::new(
            session,
            self.settings.clone(),
            self.fs.clone(),
            SpellCheckService::new(self.spell.clone()),
        )
    }
}
