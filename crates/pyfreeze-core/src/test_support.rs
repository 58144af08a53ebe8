use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Result, anyhow};

use crate::command_runner::{CommandOutput, CommandRunner};

/// One invocation seen by [`RecordingRunner`]. `interactive` marks foreground runs
/// such as pyinstaller, pip and the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub interactive: bool,
}

#[derive(Default)]
struct Script {
    captured: VecDeque<Result<CommandOutput>>,
    foreground: VecDeque<Result<i32>>,
    calls: Vec<Call>,
}

/// Replays canned results in order. Running out of script is an error, so a test
/// notices any extra process the code under test starts.
#[derive(Default)]
pub struct RecordingRunner {
    script: Mutex<Script>,
}

impl RecordingRunner {
    /// Canned results for captured runs (`--version` checks, file browsers).
    pub fn from_outputs(outputs: Vec<Result<CommandOutput>>) -> Self {
        Self::scripted(outputs, Vec::new())
    }

    /// Canned exit statuses for foreground runs.
    pub fn from_statuses(statuses: Vec<Result<i32>>) -> Self {
        Self::scripted(Vec::new(), statuses)
    }

    fn scripted(captured: Vec<Result<CommandOutput>>, foreground: Vec<Result<i32>>) -> Self {
        Self {
            script: Mutex::new(Script {
                captured: captured.into(),
                foreground: foreground.into(),
                calls: Vec::new(),
            }),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().expect("script lock").calls.clone()
    }

    fn next<T>(
        &self,
        call: Call,
        queue: impl FnOnce(&mut Script) -> &mut VecDeque<Result<T>>,
    ) -> Result<T> {
        let mut script = self.script.lock().expect("script lock");
        let kind = if call.interactive { "status" } else { "output" };
        let program = call.program.clone();
        script.calls.push(call);
        queue(&mut *script)
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("no scripted {kind} left for {program}")))
    }
}

fn call(program: &str, args: &[&str], cwd: Option<&Path>, interactive: bool) -> Call {
    Call {
        program: program.to_string(),
        args: args.iter().map(|arg| (*arg).to_string()).collect(),
        cwd: cwd.map(Path::to_path_buf),
        interactive,
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<CommandOutput> {
        self.next(call(program, args, cwd, false), |script| &mut script.captured)
    }

    fn run_interactive(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<i32> {
        self.next(call(program, args, cwd, true), |script| &mut script.foreground)
    }
}

pub fn output(stdout: &str, stderr: &str, status_code: i32) -> Result<CommandOutput> {
    Ok(CommandOutput {
        status_code,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    })
}
