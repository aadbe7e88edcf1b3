//! Core CLI loop, dispatch, and shell context helpers.

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use tracing::warn;

use crate::{
    catalog::Catalog,
    config::{Config, ConfigManager},
    currency::MoneyFormatter,
    errors::SimulatorError,
    storage::{ContentStore, JsonContentStore},
    utils::paths::PathResolver,
    wizard::{PreSeed, Wizard, WizardError},
};

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub store: JsonContentStore,
    pub catalog: Arc<Catalog>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    /// Context rooted at `base` instead of the application data directory.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        cli_io::apply_config(&config);
        let store = content_store_for(&config, config_manager.base_dir())?;
        let catalog = Arc::new(load_catalog(&store, &config)?);

        Ok(ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            store,
            catalog,
            running: true,
        })
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn prompt(&self) -> String {
        "cost-sim> ".to_string()
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn money_formatter(&self) -> MoneyFormatter {
        self.config.money_formatter()
    }

    pub(crate) fn new_wizard(&self, preseed: &PreSeed) -> Wizard {
        Wizard::with_preseed(Arc::clone(&self.catalog), preseed)
            .with_formatter(self.money_formatter())
    }

    /// Re-reads the content document after it was replaced.
    pub(crate) fn reload_catalog(&mut self) -> CommandResult {
        self.catalog = Arc::new(load_catalog(&self.store, &self.config)?);
        Ok(())
    }

    /// Rebuilds the content store after its location changed.
    pub(crate) fn reopen_store(&mut self) -> CommandResult {
        self.store = content_store_for(&self.config, self.config_manager.base_dir())?;
        self.reload_catalog()
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager
            .save(&self.config)
            .map_err(CommandError::from)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action("Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                cli_io::print_error(&other);
                Ok(())
            }
        }
    }

    /// Splits and dispatches one shell line. A parse failure is only a warning.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(&err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        let control = self.dispatch(&raw.to_lowercase(), raw, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }
}

/// Content store honouring the configured document location.
fn content_store_for(config: &Config, base: &Path) -> Result<JsonContentStore, SimulatorError> {
    match &config.content_path {
        Some(path) => JsonContentStore::with_file(path.clone(), None),
        None => JsonContentStore::new(Some(base.to_path_buf()), None),
    }
}

/// Loads the catalog, applying the phone override and reporting catalog issues.
fn load_catalog(store: &JsonContentStore, config: &Config) -> Result<Catalog, SimulatorError> {
    let content = store.load()?;
    let mut catalog = Catalog::from_content(&content);
    if let Some(phone) = &config.whatsapp_phone {
        catalog = catalog.with_contact_phone(phone.clone());
    }
    for issue in catalog.check() {
        warn!(%issue, "catalog issue");
    }
    Ok(catalog)
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] SimulatorError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] SimulatorError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            CommandError::InvalidArguments(message) => CliError::Input(message),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}
