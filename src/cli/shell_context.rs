use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{Config, ConfigManager},
    currency::{format_amount, AmountFormat},
    ledger::{DateRange, LedgerBook, Transaction},
    storage::JsonStorage,
    utils::paths,
};

use super::commands;
use super::core::{CliError, CommandError};
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub book: LedgerBook,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub theme: ColorfulTheme,
    pub filter: Option<DateRange>,
    pub running: bool,
    amount_format: AmountFormat,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, paths::app_data_dir())
    }

    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        let storage = JsonStorage::new(Some(base), Some(&config.storage_key))?;
        let book = LedgerBook::open(Box::new(storage));
        for warning in book.load_warnings() {
            cli_io::print_warning(warning);
        }

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        Ok(Self {
            mode,
            registry,
            book,
            amount_format: config.amount_format(),
            config,
            config_manager,
            theme: ColorfulTheme::default(),
            filter: None,
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        match &self.filter {
            Some(range) => format!("ledger [{}]> ", range),
            None => "ledger> ".to_string(),
        }
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    /// Transactions the current view covers: the active filter, else all.
    pub fn visible_transactions(&self) -> Vec<Transaction> {
        self.book.visible(self.filter.as_ref())
    }

    pub fn format_amount(&self, amount: i64) -> String {
        format_amount(amount, &self.amount_format)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.config_manager.export_dir(&self.config)
    }

    /// Asks before destructive actions. Scripts are never prompted.
    pub fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }
}
