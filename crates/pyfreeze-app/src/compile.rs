use std::path::PathBuf;

use anyhow::{Context, Result};
use pyfreeze_core::pyinstaller::{self, CompileCommand};
use pyfreeze_core::session::Session;

use crate::App;

pub const COMPILED_TITLE: &str = "Compiled!";
pub const COMPILED_BODY: &str = "Select to view output.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub command: CompileCommand,
    pub install_requirements: bool,
}

/// Shown to the user once the packaging tool returns successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileNotification {
    pub title: String,
    pub body: String,
    pub command: String,
    pub output_dir: PathBuf,
}

impl<'a> App<'a> {
    /// Validates the session and builds the command without running anything.
    pub fn prepare_compile(&self, session: &Session) -> Result<CompileRequest> {
        match pyinstaller::build_compile_command(session, &self.config.tools.pyinstaller) {
            Ok(command) => Ok(CompileRequest {
                command,
                install_requirements: self.config.compile.install_requirements,
            }),
            Err(error) => {
                self.log
                    .warning(format!("Program was not compiled: {error}"))?;
                Err(error.into())
            }
        }
    }

    /// Runs the packaging tool in the foreground. Blocks until it exits.
    pub fn compile(
        &self,
        session: &mut Session,
        request: &CompileRequest,
    ) -> Result<CompileNotification> {
        session.begin_compile()?;

        let result = self.run_compile_steps(session, request);
        session.finish_compile(result.is_ok());

        match result {
            Ok(()) => {
                self.log.info(format!(
                    "Compiled {}, output at {}",
                    request.command.launcher.display(),
                    request.command.output_dir.display()
                ))?;
                Ok(CompileNotification {
                    title: COMPILED_TITLE.to_string(),
                    body: COMPILED_BODY.to_string(),
                    command: request.command.display(),
                    output_dir: request.command.output_dir.clone(),
                })
            }
            Err(error) => {
                self.log.critical(format!("Compile failed: {error:#}"))?;
                Err(error)
            }
        }
    }

    fn run_compile_steps(&self, session: &Session, request: &CompileRequest) -> Result<()> {
        let command = &request.command;
        self.log.info(format!(
            "Compiling program at {} (one file: {}, show console: {})",
            command.launcher.display(),
            command.one_file_mode,
            command.show_console
        ))?;

        if request.install_requirements {
            let requirements = session.requirements_path()?;
            pyinstaller::install_requirements(
                &self.config.tools.python,
                &requirements,
                &command.working_dir,
                self.runner,
            )
            .with_context(|| {
                format!("failed to install requirements from {}", requirements.display())
            })?;
        }

        pyinstaller::run_compile(command, self.runner)
            .with_context(|| format!("failed to compile {}", command.launcher.display()))
    }
}
