use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::command_adapter::{self, InteractiveFailure};
use crate::command_runner::CommandRunner;
use crate::session::{OUTPUT_DIR_NAME, Session, WorkflowError};

pub const ONE_FILE_FLAG: &str = "--onefile";
pub const WINDOWED_FLAG: &str = "-w";

#[derive(Debug, Error)]
pub enum PyinstallerError {
    #[error("failed to execute {command}: {message}")]
    Execute { command: String, message: String },
    #[error("command failed: {command} (exit {status})")]
    CommandFailed { command: String, status: i32 },
}

/// A fully resolved packaging invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCommand {
    pub program: String,
    pub args: Vec<String>,
    pub launcher: PathBuf,
    pub working_dir: PathBuf,
    pub output_dir: PathBuf,
    pub one_file_mode: bool,
    pub show_console: bool,
}

impl CompileCommand {
    pub fn new(
        program: &str,
        launcher: &Path,
        one_file_mode: bool,
        show_console: bool,
    ) -> Result<Self, WorkflowError> {
        let launcher_arg = launcher.to_str().ok_or_else(|| WorkflowError::InvalidPath {
            path: launcher.to_path_buf(),
        })?;

        let mut args = Vec::with_capacity(3);
        if one_file_mode {
            args.push(ONE_FILE_FLAG.to_string());
        }
        if !show_console {
            args.push(WINDOWED_FLAG.to_string());
        }
        args.push(launcher_arg.to_string());

        let working_dir = launcher
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let output_dir = working_dir.join(OUTPUT_DIR_NAME);

        Ok(Self {
            program: program.to_string(),
            args,
            launcher: launcher.to_path_buf(),
            working_dir,
            output_dir,
            one_file_mode,
            show_console,
        })
    }

    /// Space-joined form for logs and confirmation dialogs. Never passed to a shell.
    pub fn display(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        command_adapter::command_line(&self.program, &args)
    }
}

/// Validates `session` and builds the packaging command for it.
pub fn build_compile_command(
    session: &Session,
    program: &str,
) -> Result<CompileCommand, WorkflowError> {
    let launcher = session.ensure_ready()?;
    CompileCommand::new(
        program,
        launcher,
        session.one_file_mode,
        session.show_console,
    )
}

pub fn run_compile(
    command: &CompileCommand,
    runner: &dyn CommandRunner,
) -> Result<(), PyinstallerError> {
    let args: Vec<&str> = command.args.iter().map(String::as_str).collect();
    run_foreground(runner, &command.program, &args, &command.working_dir)
}

pub fn install_requirements(
    python: &str,
    requirements: &Path,
    working_dir: &Path,
    runner: &dyn CommandRunner,
) -> Result<(), PyinstallerError> {
    let requirements_arg = requirements.to_string_lossy();
    let args = ["-m", "pip", "install", "-r", requirements_arg.as_ref()];
    run_foreground(runner, python, &args, working_dir)
}

fn run_foreground(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[&str],
    cwd: &Path,
) -> Result<(), PyinstallerError> {
    command_adapter::run_program_interactive(runner, program, args, Some(cwd)).map_err(
        |failure| match failure {
            InteractiveFailure::Spawn { command, message } => {
                PyinstallerError::Execute { command, message }
            }
            InteractiveFailure::Status { command, status } => {
                PyinstallerError::CommandFailed { command, status }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::anyhow;

    use crate::test_support::RecordingRunner;

    use super::*;

    #[test]
    fn one_file_windowed_command_has_both_flags_in_order() {
        let command =
            CompileCommand::new("pyinstaller", Path::new("C:/x/app.py"), true, false).expect("build");
        assert_eq!(command.display(), "pyinstaller --onefile -w C:/x/app.py");
        assert_eq!(command.args, vec!["--onefile", "-w", "C:/x/app.py"]);
    }

    #[test]
    fn folder_console_command_has_no_flags() {
        let command =
            CompileCommand::new("pyinstaller", Path::new("C:/x/app.py"), false, true).expect("build");
        assert_eq!(command.display(), "pyinstaller C:/x/app.py");
    }

    #[test]
    fn single_flag_combinations() {
        let one_file =
            CompileCommand::new("pyinstaller", Path::new("/srv/app.py"), true, true).expect("build");
        assert_eq!(one_file.display(), "pyinstaller --onefile /srv/app.py");

        let windowed =
            CompileCommand::new("pyinstaller", Path::new("/srv/app.py"), false, false).expect("build");
        assert_eq!(windowed.display(), "pyinstaller -w /srv/app.py");
    }

    #[test]
    fn path_with_spaces_stays_one_argument() {
        let command = CompileCommand::new(
            "pyinstaller",
            Path::new("/home/me/My Apps/app; rm -rf.py"),
            false,
            true,
        )
        .expect("build");
        assert_eq!(command.args, vec!["/home/me/My Apps/app; rm -rf.py"]);
        assert_eq!(command.working_dir, PathBuf::from("/home/me/My Apps"));
        assert_eq!(command.output_dir, PathBuf::from("/home/me/My Apps/dist"));
    }

    #[test]
    fn build_refuses_without_launcher() {
        let session = Session::new();
        assert_eq!(
            build_compile_command(&session, "pyinstaller"),
            Err(WorkflowError::NoLauncherSelected)
        );
    }

    #[test]
    fn build_refuses_without_requirements() {
        let temp = tempfile::tempdir().expect("temp dir");
        let launcher = temp.path().join("app.py");
        fs::write(&launcher, "").expect("launcher");

        let mut session = Session::new();
        session.select_file(&launcher).expect("select");

        let error = build_compile_command(&session, "pyinstaller").expect_err("should fail");
        assert!(matches!(error, WorkflowError::RequirementsMissing { .. }));
    }

    #[test]
    fn build_uses_session_flags() {
        let temp = tempfile::tempdir().expect("temp dir");
        let launcher = temp.path().join("app.py");
        fs::write(&launcher, "").expect("launcher");
        fs::write(temp.path().join("requirements.txt"), "").expect("requirements");

        let mut session = Session::new();
        session.select_file(&launcher).expect("select");
        session.one_file_mode = true;

        let command = build_compile_command(&session, "pyinstaller").expect("build");
        assert_eq!(
            command.args,
            vec![
                "--onefile".to_string(),
                "-w".to_string(),
                launcher.to_string_lossy().to_string()
            ]
        );
        assert_eq!(command.output_dir, temp.path().join("dist"));
    }

    #[test]
    fn run_compile_runs_in_launcher_directory() {
        let runner = RecordingRunner::from_statuses(vec![Ok(0)]);
        let command =
            CompileCommand::new("pyinstaller", Path::new("/srv/tool/app.py"), true, true)
                .expect("build");

        run_compile(&command, &runner).expect("compile");

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "pyinstaller");
        assert_eq!(calls[0].args, vec!["--onefile", "/srv/tool/app.py"]);
        assert_eq!(calls[0].cwd, Some(PathBuf::from("/srv/tool")));
        assert!(calls[0].interactive);
    }

    #[test]
    fn run_compile_reports_exit_status() {
        let runner = RecordingRunner::from_statuses(vec![Ok(1)]);
        let command =
            CompileCommand::new("pyinstaller", Path::new("/srv/app.py"), false, true).expect("build");

        let error = run_compile(&command, &runner).expect_err("should fail");
        assert_eq!(
            error.to_string(),
            "command failed: pyinstaller /srv/app.py (exit 1)"
        );
    }

    #[test]
    fn run_compile_reports_spawn_failure() {
        let runner = RecordingRunner::from_statuses(vec![Err(anyhow!("No such file or directory"))]);
        let command =
            CompileCommand::new("pyinstaller", Path::new("/srv/app.py"), false, true).expect("build");

        let error = run_compile(&command, &runner).expect_err("should fail");
        assert!(matches!(error, PyinstallerError::Execute { .. }));
        assert!(error.to_string().contains("No such file or directory"));
    }

    #[test]
    fn install_requirements_uses_pip_module() {
        let runner = RecordingRunner::from_statuses(vec![Ok(0)]);
        install_requirements(
            "python3",
            Path::new("/srv/requirements.txt"),
            Path::new("/srv"),
            &runner,
        )
        .expect("install");

        let calls = runner.calls();
        assert_eq!(calls[0].program, "python3");
        assert_eq!(
            calls[0].args,
            vec!["-m", "pip", "install", "-r", "/srv/requirements.txt"]
        );
    }
}
