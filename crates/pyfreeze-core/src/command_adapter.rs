use std::path::Path;

use crate::command_runner::{CommandOutput, CommandRunner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandFailure {
    pub(crate) command: String,
    pub(crate) status: i32,
    pub(crate) stderr: String,
}

pub(crate) fn run_program(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<CommandOutput, String> {
    runner
        .run(program, args, cwd)
        .map_err(|error| format!("{program}: {error}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InteractiveFailure {
    Spawn { command: String, message: String },
    Status { command: String, status: i32 },
}

pub(crate) fn run_program_interactive(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<(), InteractiveFailure> {
    let status = runner
        .run_interactive(program, args, cwd)
        .map_err(|error| InteractiveFailure::Spawn {
            command: command_line(program, args),
            message: error.to_string(),
        })?;

    if status == 0 {
        return Ok(());
    }

    Err(InteractiveFailure::Status {
        command: command_line(program, args),
        status,
    })
}

pub(crate) fn ensure_success(
    program: &str,
    args: &[&str],
    output: CommandOutput,
) -> Result<CommandOutput, CommandFailure> {
    if output.status_code == 0 {
        return Ok(output);
    }

    Err(CommandFailure {
        command: command_line(program, args),
        status: output.status_code,
        stderr: output.stderr.trim().to_string(),
    })
}

pub(crate) fn command_line(program: &str, args: &[&str]) -> String {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(program);
    parts.extend_from_slice(args);
    parts.join(" ")
}
