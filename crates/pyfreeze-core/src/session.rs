use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::requirements;

pub const OUTPUT_DIR_NAME: &str = "dist";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("no launcher selected; choose a launcher file first")]
    NoLauncherSelected,
    #[error("launcher not found: {path}")]
    LauncherNotFound { path: PathBuf },
    #[error("requirements file not found at {path}")]
    RequirementsMissing { path: PathBuf },
    #[error("launcher path is not valid UTF-8: {path}")]
    InvalidPath { path: PathBuf },
    #[error("a compile is already running")]
    CompileInProgress,
    #[error("program already compiled; select the launcher again to start over")]
    AlreadyCompiled,
}

impl WorkflowError {
    /// Dialog title shown to the user for this error.
    pub fn title(&self) -> &'static str {
        match self {
            Self::NoLauncherSelected | Self::LauncherNotFound { .. } | Self::InvalidPath { .. } => {
                "Launcher Not Found"
            }
            Self::RequirementsMissing { .. } => "Requirements Not Found",
            Self::CompileInProgress => "Compile In Progress",
            Self::AlreadyCompiled => "Already Compiled",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Idle,
    Compiling,
    Compiled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    NoFileSelected,
    FileSelected { has_requirements: bool },
    Compiling,
    Compiled,
}

/// User choices for one packaging run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    target_file: Option<PathBuf>,
    target_directory: Option<PathBuf>,
    pub show_console: bool,
    pub one_file_mode: bool,
    phase: Phase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_file(&self) -> Option<&Path> {
        self.target_file.as_deref()
    }

    pub fn target_directory(&self) -> Option<&Path> {
        self.target_directory.as_deref()
    }

    /// Selects `path` as the launcher. The session is left untouched when `path` is not a file.
    pub fn select_file(&mut self, path: &Path) -> Result<(), WorkflowError> {
        if !path.is_file() {
            return Err(WorkflowError::LauncherNotFound {
                path: path.to_path_buf(),
            });
        }

        let directory = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        self.target_file = Some(path.to_path_buf());
        self.target_directory = Some(directory);
        self.phase = Phase::Idle;
        Ok(())
    }

    pub fn toggle_show_console(&mut self) {
        self.show_console = !self.show_console;
    }

    pub fn toggle_one_file_mode(&mut self) {
        self.one_file_mode = !self.one_file_mode;
    }

    pub fn requirements_path(&self) -> Result<PathBuf, WorkflowError> {
        self.target_directory
            .as_deref()
            .map(requirements::requirements_path)
            .ok_or(WorkflowError::NoLauncherSelected)
    }

    pub fn requirements_exists(&self) -> Result<bool, WorkflowError> {
        Ok(self.requirements_path()?.is_file())
    }

    pub fn output_dir(&self) -> Result<PathBuf, WorkflowError> {
        self.target_directory
            .as_deref()
            .map(|directory| directory.join(OUTPUT_DIR_NAME))
            .ok_or(WorkflowError::NoLauncherSelected)
    }

    pub fn state(&self) -> WorkflowState {
        match self.phase {
            Phase::Compiling => WorkflowState::Compiling,
            Phase::Compiled => WorkflowState::Compiled,
            Phase::Idle => match self.requirements_exists() {
                Err(_) => WorkflowState::NoFileSelected,
                Ok(has_requirements) => WorkflowState::FileSelected { has_requirements },
            },
        }
    }

    /// Checks that a compile may start and returns the launcher path.
    /// `Compiled` ends the run; only a new `select_file` starts another.
    pub fn ensure_ready(&self) -> Result<&Path, WorkflowError> {
        match self.phase {
            Phase::Compiling => return Err(WorkflowError::CompileInProgress),
            Phase::Compiled => return Err(WorkflowError::AlreadyCompiled),
            Phase::Idle => {}
        }

        let target_file = self
            .target_file
            .as_deref()
            .ok_or(WorkflowError::NoLauncherSelected)?;

        let requirements_path = self.requirements_path()?;
        if !requirements_path.is_file() {
            return Err(WorkflowError::RequirementsMissing {
                path: requirements_path,
            });
        }

        Ok(target_file)
    }

    pub fn begin_compile(&mut self) -> Result<(), WorkflowError> {
        self.ensure_ready()?;
        self.phase = Phase::Compiling;
        Ok(())
    }

    pub fn finish_compile(&mut self, succeeded: bool) {
        self.phase = if succeeded {
            Phase::Compiled
        } else {
            Phase::Idle
        };
    }
}
