use std::path::{Path, PathBuf};

use anyhow::Result;
use pyfreeze_core::session::Session;

use crate::App;

impl<'a> App<'a> {
    /// Applies a launcher chosen by the user. Blank input counts as a cancelled choice
    /// and returns `Ok(false)` without touching the session.
    pub fn select_launcher(&self, session: &mut Session, cwd: &Path, input: &str) -> Result<bool> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let path = resolve_launcher_path(cwd, trimmed);
        if let Err(error) = session.select_file(&path) {
            self.log.warning(format!("Launcher rejected: {error}"))?;
            return Err(error.into());
        }

        self.log
            .info(format!("Selected launcher at {}", path.display()))?;
        Ok(true)
    }
}

pub(crate) fn resolve_launcher_path(cwd: &Path, input: &str) -> PathBuf {
    let path = Path::new(input);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
