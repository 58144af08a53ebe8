use std::env;
use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::command_adapter;
use crate::command_runner::CommandRunner;
use crate::config::{PyfreezeConfig, load_config};
use crate::platform::{SUPPORTED_PLATFORMS, is_supported_platform, platform_label};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Pass,
    Fail,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCheck {
    pub name: String,
    pub state: CheckState,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|check| check.state == CheckState::Fail)
    }

    pub fn summary(&self) -> String {
        let passed = self
            .checks
            .iter()
            .filter(|check| check.state == CheckState::Pass)
            .count();
        let failed = self.checks.len().saturating_sub(passed);
        format!("{passed} passed, {failed} failed")
    }
}

/// Conditions under which the tool refuses to start.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreflightError {
    #[error("this program is not supported on your operating system ({detected})")]
    UnsupportedPlatform { detected: String },
    #[error("could not find a version of pip installed on this machine: {details}")]
    MissingDependency { details: String },
}

impl PreflightError {
    pub fn title(&self) -> &'static str {
        match self {
            Self::UnsupportedPlatform { .. } => "OS Error",
            Self::MissingDependency { .. } => "PIP not found",
        }
    }
}

/// Runs the checks that gate every stateful command.
pub fn run_preflight(
    config: &PyfreezeConfig,
    runner: &dyn CommandRunner,
) -> Result<(), PreflightError> {
    check_platform(env::consts::OS)?;
    check_pip(&config.tools.python, runner)?;
    Ok(())
}

pub fn check_platform(os: &str) -> Result<String, PreflightError> {
    if is_supported_platform(os) {
        Ok(format!("detected {}", platform_label(os)))
    } else {
        Err(PreflightError::UnsupportedPlatform {
            detected: platform_label(os).to_string(),
        })
    }
}

/// Asks `python -m pip --version` and expects an answer that starts with `pip`.
pub fn check_pip(python: &str, runner: &dyn CommandRunner) -> Result<String, PreflightError> {
    let args = ["-m", "pip", "--version"];
    let output = command_adapter::run_program(runner, python, &args, None)
        .map_err(|details| PreflightError::MissingDependency { details })?;
    let output = command_adapter::ensure_success(python, &args, output).map_err(|failure| {
        PreflightError::MissingDependency {
            details: format!(
                "{} returned exit code {}: {}",
                failure.command, failure.status, failure.stderr
            ),
        }
    })?;

    let version = output.stdout.trim();
    if version.starts_with("pip") {
        Ok(version.to_string())
    } else {
        Err(PreflightError::MissingDependency {
            details: format!("unexpected pip version output: {version}"),
        })
    }
}

pub fn run_doctor_with_runner(
    runner: &dyn CommandRunner,
    config_path: Option<&Path>,
) -> DoctorReport {
    let mut checks = Vec::new();

    checks.push(match check_platform(env::consts::OS) {
        Ok(details) => pass_check("os is supported", details),
        Err(_) => fail_check(
            "os is supported",
            format!(
                "detected {}, expected one of {}",
                platform_label(env::consts::OS),
                SUPPORTED_PLATFORMS
                    .iter()
                    .map(|os| platform_label(os))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ),
    });

    let config = match config_path {
        Some(path) if path.exists() => match load_config(path) {
            Ok(config) => {
                checks.push(pass_check(
                    "config is valid",
                    format!("loaded {}", path.display()),
                ));
                config
            }
            Err(error) => {
                checks.push(fail_check("config is valid", error.to_string()));
                PyfreezeConfig::default()
            }
        },
        Some(path) => {
            checks.push(pass_check(
                "config is valid",
                format!("no config at {}, using defaults", path.display()),
            ));
            PyfreezeConfig::default()
        }
        None => {
            checks.push(fail_check(
                "config is valid",
                "could not resolve home directory for config path",
            ));
            PyfreezeConfig::default()
        }
    };

    checks.push(match check_pip(&config.tools.python, runner) {
        Ok(version) => pass_check("pip is available", version),
        Err(error) => fail_check("pip is available", error.to_string()),
    });

    checks.push(check_pyinstaller(&config.tools.pyinstaller, runner));

    DoctorReport { checks }
}

fn check_pyinstaller(program: &str, runner: &dyn CommandRunner) -> DoctorCheck {
    match runner.run(program, &["--version"], None) {
        Ok(output) if output.status_code == 0 => pass_check(
            "pyinstaller is installed",
            format!("{program} {}", output.stdout.trim()),
        ),
        Ok(output) => fail_check(
            "pyinstaller is installed",
            format!(
                "{program} returned exit code {} with output: {}",
                output.status_code,
                output.stderr.trim()
            ),
        ),
        Err(error) => fail_check(
            "pyinstaller is installed",
            format!("failed to execute {program}: {error}"),
        ),
    }
}

fn pass_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Pass,
        details: details.into(),
    }
}

fn fail_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Fail,
        details: details.into(),
    }
}
