use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::anyhow;
use pyfreeze_core::command_runner::{CommandOutput, CommandRunner};
use pyfreeze_core::event_log::EventLog;

#[derive(Debug, Clone)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    #[allow(dead_code)]
    pub cwd: Option<PathBuf>,
    #[allow(dead_code)]
    pub interactive: bool,
}

#[derive(Default)]
pub struct QueueRunner {
    outputs: Mutex<VecDeque<anyhow::Result<CommandOutput>>>,
    interactive_statuses: Mutex<VecDeque<anyhow::Result<i32>>>,
    calls: Mutex<Vec<Call>>,
}

impl QueueRunner {
    pub fn new(
        outputs: Vec<anyhow::Result<CommandOutput>>,
        interactive_statuses: Vec<anyhow::Result<i32>>,
    ) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            interactive_statuses: Mutex::new(interactive_statuses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, program: &str, args: &[&str], cwd: Option<&Path>, interactive: bool) {
        self.calls.lock().expect("calls lock").push(Call {
            program: program.to_string(),
            args: args.iter().map(|value| (*value).to_string()).collect(),
            cwd: cwd.map(Path::to_path_buf),
            interactive,
        });
    }
}

impl CommandRunner for QueueRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> anyhow::Result<CommandOutput> {
        self.record(program, args, cwd, false);

        self.outputs
            .lock()
            .expect("outputs lock")
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("missing scripted output")))
    }

    fn run_interactive(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> anyhow::Result<i32> {
        self.record(program, args, cwd, true);

        self.interactive_statuses
            .lock()
            .expect("interactive lock")
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("missing scripted interactive status")))
    }
}

#[allow(dead_code)]
pub fn output(stdout: &str, stderr: &str, status: i32) -> anyhow::Result<CommandOutput> {
    Ok(CommandOutput {
        status_code: status,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    })
}

pub struct Workspace {
    _temp: tempfile::TempDir,
    pub project: PathBuf,
    pub launcher: PathBuf,
    pub log: EventLog,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("temp dir");
        let project = temp.path().join("project");
        fs::create_dir_all(&project).expect("project dir");
        let launcher = project.join("app.py");
        fs::write(&launcher, "print('hello')\n").expect("write launcher");
        let log = EventLog::new(temp.path().join("log.log"));

        Self {
            _temp: temp,
            project,
            launcher,
            log,
        }
    }

    #[allow(dead_code)]
    pub fn write_requirements(&self) -> PathBuf {
        let path = self.project.join("requirements.txt");
        fs::write(&path, "requests==2.32.3\n").expect("write requirements");
        path
    }

    pub fn log_lines(&self) -> Vec<String> {
        fs::read_to_string(self.log.path())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
