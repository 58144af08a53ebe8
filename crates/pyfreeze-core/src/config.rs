use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_VERSION: u32 = 1;
pub const LOG_FILE_NAME: &str = "log.log";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PyfreezeConfig {
    pub version: u32,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub compile: CompileConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default = "default_python")]
    pub python: String,
    #[serde(default = "default_pyinstaller")]
    pub pyinstaller: String,
    pub editor: Option<String>,
    pub file_browser: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompileConfig {
    #[serde(default)]
    pub install_requirements: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogConfig {
    pub path: Option<PathBuf>,
}

impl Default for PyfreezeConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            tools: ToolsConfig::default(),
            compile: CompileConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            pyinstaller: default_pyinstaller(),
            editor: None,
            file_browser: None,
        }
    }
}

fn default_python() -> String {
    "python".to_string()
}

fn default_pyinstaller() -> String {
    "pyinstaller".to_string()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Validation { message: String },
}

pub fn resolve_config_dir() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs.home_dir().join(".config").join("pyfreeze"))
}

pub fn resolve_config_path() -> Result<PathBuf, ConfigError> {
    Ok(resolve_config_dir()?.join("config.toml"))
}

/// Log file location: `log.path` when configured, otherwise next to the config file.
pub fn resolve_log_path(config: &PyfreezeConfig) -> Result<PathBuf, ConfigError> {
    match &config.log.path {
        Some(path) => Ok(path.clone()),
        None => Ok(resolve_config_dir()?.join(LOG_FILE_NAME)),
    }
}

pub fn load_config(path: &Path) -> Result<PyfreezeConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: PyfreezeConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&parsed)?;
    Ok(parsed)
}

/// Loads the config at `path`, falling back to defaults when the file does not exist.
pub fn load_config_or_default(path: &Path) -> Result<PyfreezeConfig, ConfigError> {
    if !path.exists() {
        return Ok(PyfreezeConfig::default());
    }

    load_config(path)
}

pub fn validate_config(config: &PyfreezeConfig) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("version must be {CONFIG_VERSION}"),
        });
    }

    let required_tools = [
        ("tools.python", Some(config.tools.python.as_str())),
        ("tools.pyinstaller", Some(config.tools.pyinstaller.as_str())),
        ("tools.editor", config.tools.editor.as_deref()),
        ("tools.file_browser", config.tools.file_browser.as_deref()),
    ];

    for (field, value) in required_tools {
        if let Some(value) = value
            && value.trim().is_empty()
        {
            return Err(ConfigError::Validation {
                message: format!("{field} must be non-empty"),
            });
        }
    }

    if let Some(path) = &config.log.path
        && path.as_os_str().is_empty()
    {
        return Err(ConfigError::Validation {
            message: "log.path must be non-empty".to_string(),
        });
    }

    Ok(())
}
