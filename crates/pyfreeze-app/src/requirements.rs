use std::path::Path;

use anyhow::{Context, Result};
use pyfreeze_core::platform;
use pyfreeze_core::requirements::{RequirementsOutcome, ensure_requirements};
use pyfreeze_core::session::{Session, WorkflowError};

use crate::App;

impl<'a> App<'a> {
    /// Writes the requirements template next to the launcher unless one exists already.
    pub fn create_requirements(&self, session: &Session) -> Result<RequirementsOutcome> {
        let Some(directory) = session.target_directory() else {
            self.log
                .warning("Requirements requested before a launcher was selected")?;
            return Err(WorkflowError::NoLauncherSelected.into());
        };

        let outcome = ensure_requirements(directory)?;
        if outcome.created {
            self.log
                .info(format!("Created requirements at {}", outcome.path.display()))?;
        }

        Ok(outcome)
    }

    /// Opens `path` in the configured editor and blocks until the editor exits.
    pub fn edit_requirements(&self, path: &Path) -> Result<()> {
        let editor = platform::resolve_editor(
            self.config.tools.editor.as_deref(),
            std::env::consts::OS,
            platform::system_env,
        );

        self.log
            .info(format!("Opening {} with {editor}", path.display()))?;
        platform::open_in_editor(&editor, path, self.runner)
            .with_context(|| format!("failed to edit requirements at {}", path.display()))
    }
}
