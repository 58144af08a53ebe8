mod compile;
mod launcher;
mod output;
mod requirements;

use std::path::Path;

use anyhow::Result;
use pyfreeze_core::command_runner::CommandRunner;
use pyfreeze_core::config::PyfreezeConfig;
use pyfreeze_core::doctor::{DoctorReport, run_doctor_with_runner, run_preflight};
use pyfreeze_core::event_log::EventLog;

pub use compile::{CompileNotification, CompileRequest};
pub use pyfreeze_core::pyinstaller::CompileCommand;
pub use pyfreeze_core::requirements::RequirementsOutcome;
pub use pyfreeze_core::session::{Session, WorkflowError, WorkflowState};

pub struct App<'a> {
    pub runner: &'a dyn CommandRunner,
    pub log: &'a EventLog,
    pub config: &'a PyfreezeConfig,
}

impl<'a> App<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        log: &'a EventLog,
        config: &'a PyfreezeConfig,
    ) -> Self {
        Self {
            runner,
            log,
            config,
        }
    }

    pub fn doctor(&self, config_path: Option<&Path>) -> Result<DoctorReport> {
        Ok(run_doctor_with_runner(self.runner, config_path))
    }
}

/// Refuses to continue on an unsupported OS or without pip. Runs before any `App` exists.
pub fn preflight(
    config: &PyfreezeConfig,
    runner: &dyn CommandRunner,
    log: &EventLog,
) -> Result<()> {
    if let Err(error) = run_preflight(config, runner) {
        log.critical(format!("{}: refused to run. {error}", error.title()))?;
        return Err(error.into());
    }

    Ok(())
}
