use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const REQUIREMENTS_FILE_NAME: &str = "requirements.txt";

pub const REQUIREMENTS_TEMPLATE: &str = "\
This is the requirements file.

You should delete all text in this file and replace it with any modules you need installed.
Save and close the file when you are finished.

Examples:
speedtest-cli (plain install for latest version of speedtest-cli)
speedtest-cli==2.1.3 (installs speedtest-cli version 2.1.3)
speedtest_cli>2.0.2 (installs any version of speedtest-cli after 2.0.2)
speedtest_cli>2.0.2,<2.1.2 (installs any version of speedtest-cli between 2.0.2 and 2.1.2 non-inclusive)
";

#[derive(Debug, Error)]
#[error("failed to create requirements file at {path}: {source}")]
pub struct RequirementsError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementsOutcome {
    pub path: PathBuf,
    pub created: bool,
}

pub fn requirements_path(directory: &Path) -> PathBuf {
    directory.join(REQUIREMENTS_FILE_NAME)
}

/// Writes the template into `directory` unless a requirements file is already there.
pub fn ensure_requirements(directory: &Path) -> Result<RequirementsOutcome, RequirementsError> {
    let path = requirements_path(directory);

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(error) if error.kind() == ErrorKind::AlreadyExists => {
            return Ok(RequirementsOutcome {
                path,
                created: false,
            });
        }
        Err(source) => return Err(RequirementsError { path, source }),
    };

    file.write_all(REQUIREMENTS_TEMPLATE.as_bytes())
        .map_err(|source| RequirementsError {
            path: path.clone(),
            source,
        })?;

    Ok(RequirementsOutcome {
        path,
        created: true,
    })
}
