//! `uu-secret-manager install-hook` — install the git pre-commit hook.

use crate::cli::output;
use crate::errors::Result;
use crate::git::{install_hook, InstallResult};

/// Execute the `install-hook` command.
pub fn execute() -> Result<()> {
    let cwd = std::env::current_dir()?;

    match install_hook(&cwd)? {
        InstallResult::Installed => {
            output::success("Pre-commit hook installed at .git/hooks/pre-commit");
        }
        InstallResult::InstalledWithBackup(backup) => {
            output::warning(&format!(
                "Existing pre-commit hook moved to {}",
                backup.display()
            ));
            output::success("Pre-commit hook installed at .git/hooks/pre-commit");
        }
        InstallResult::AlreadyInstalled => {
            output::info("Pre-commit hook is already installed.");
        }
    }

    Ok(())
}
