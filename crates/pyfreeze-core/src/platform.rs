use std::path::Path;

use thiserror::Error;

use crate::command_adapter::{self, InteractiveFailure};
use crate::command_runner::CommandRunner;

/// Operating systems the packaging tool produces executables for.
pub const SUPPORTED_PLATFORMS: [&str; 3] = ["windows", "macos", "linux"];

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("{field} is empty")]
    EmptyCommand { field: &'static str },
    #[error("failed to execute {command}: {message}")]
    Execute { command: String, message: String },
    #[error("command failed: {command} (exit {status})")]
    CommandFailed { command: String, status: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launch {
    pub program: String,
    pub args: Vec<String>,
}

impl Launch {
    /// Splits a configured command such as `code -w` on whitespace and appends `target`.
    pub fn parse(field: &'static str, command: &str, target: &Path) -> Result<Self, PlatformError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(PlatformError::EmptyCommand { field })?;
        let mut args: Vec<String> = parts.collect();
        args.push(target.to_string_lossy().to_string());
        Ok(Self { program, args })
    }

    fn arg_refs(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

pub fn is_supported_platform(os: &str) -> bool {
    SUPPORTED_PLATFORMS.contains(&os)
}

pub fn platform_label(os: &str) -> &str {
    match os {
        "windows" => "Windows",
        "macos" => "macOS",
        "linux" => "Linux",
        other => other,
    }
}

pub fn default_editor(os: &str) -> &'static str {
    match os {
        "windows" => "notepad",
        _ => "vi",
    }
}

pub fn default_file_browser(os: &str) -> &'static str {
    match os {
        "windows" => "explorer",
        "macos" => "open",
        _ => "xdg-open",
    }
}

/// Editor precedence: configured value, `$VISUAL`, `$EDITOR`, platform default.
pub fn resolve_editor<F>(configured: Option<&str>, os: &str, env_lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    configured
        .map(str::to_string)
        .and_then(non_blank)
        .or_else(|| env_lookup("VISUAL").and_then(non_blank))
        .or_else(|| env_lookup("EDITOR").and_then(non_blank))
        .unwrap_or_else(|| default_editor(os).to_string())
}

fn non_blank(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

pub fn resolve_file_browser(configured: Option<&str>, os: &str) -> String {
    configured
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default_file_browser(os))
        .to_string()
}

pub fn system_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Opens `file` in `editor` and waits for the editor to exit.
pub fn open_in_editor(
    editor: &str,
    file: &Path,
    runner: &dyn CommandRunner,
) -> Result<(), PlatformError> {
    let launch = Launch::parse("editor", editor, file)?;
    let cwd = file.parent().filter(|parent| !parent.as_os_str().is_empty());

    command_adapter::run_program_interactive(runner, &launch.program, &launch.arg_refs(), cwd)
        .map_err(|failure| match failure {
            InteractiveFailure::Spawn { command, message } => {
                PlatformError::Execute { command, message }
            }
            InteractiveFailure::Status { command, status } => {
                PlatformError::CommandFailed { command, status }
            }
        })
}

/// Asks the OS file browser to show `directory`. Returns the browser's exit status;
/// `explorer` reports 1 even when it succeeds, so callers decide what a failure is.
pub fn open_in_file_browser(
    browser: &str,
    directory: &Path,
    runner: &dyn CommandRunner,
) -> Result<i32, PlatformError> {
    let launch = Launch::parse("file browser", browser, directory)?;
    let args = launch.arg_refs();

    let output = command_adapter::run_program(runner, &launch.program, &args, None).map_err(
        |message| PlatformError::Execute {
            command: command_adapter::command_line(&launch.program, &args),
            message,
        },
    )?;

    Ok(output.status_code)
}
