pub mod cli;
pub mod dispatch;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use pyfreeze_core::command_runner::SystemCommandRunner;
use pyfreeze_core::config::{
    ConfigError, PyfreezeConfig, load_config_or_default, resolve_config_path, resolve_log_path,
};
use pyfreeze_core::event_log::EventLog;

use crate::cli::{Cli, Command};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = resolve_config_path().ok();
    let config = load_startup_config(&cli, config_path.as_deref())?;
    let log = EventLog::new(resolve_log_path(&config)?);
    let command_runner = SystemCommandRunner::new();
    let cwd = std::env::current_dir().context("failed to determine current directory")?;

    dispatch::run_with_deps(
        cli,
        dispatch::Deps {
            runner: &command_runner,
            config: &config,
            log: &log,
            config_path: config_path.as_deref(),
        },
        &cwd,
    )
}

/// `doctor` reports config problems in its own table, so it falls back to defaults here.
fn load_startup_config(cli: &Cli, config_path: Option<&Path>) -> Result<PyfreezeConfig> {
    let Some(path) = config_path else {
        return Err(ConfigError::HomeDirectoryUnavailable.into());
    };

    match load_config_or_default(path) {
        Ok(config) => Ok(config),
        Err(_) if matches!(cli.command, Some(Command::Doctor)) => Ok(PyfreezeConfig::default()),
        Err(error) => Err(error.into()),
    }
}
