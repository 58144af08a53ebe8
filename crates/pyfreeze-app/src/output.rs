use std::path::Path;

use anyhow::{Context, Result};
use pyfreeze_core::platform;

use crate::App;

impl<'a> App<'a> {
    /// Shows `directory` in the OS file browser.
    pub fn open_output(&self, directory: &Path) -> Result<()> {
        let browser = platform::resolve_file_browser(
            self.config.tools.file_browser.as_deref(),
            std::env::consts::OS,
        );

        let status = platform::open_in_file_browser(&browser, directory, self.runner)
            .with_context(|| format!("failed to open {}", directory.display()))?;

        if status == 0 {
            self.log
                .info(format!("Opened output at {}", directory.display()))?;
        } else {
            self.log.warning(format!(
                "{browser} exited with status {status} while opening {}",
                directory.display()
            ))?;
        }

        Ok(())
    }
}
