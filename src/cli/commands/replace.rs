//! `uu-secret-manager replace` — swap literal secrets for placeholders.

use std::path::Path;

use crate::cli::output;
use crate::cli::{load_settings, prompt_password, vault_context, Cli};
use crate::errors::Result;
use crate::substitute::{self, Direction, RunOptions};
use crate::vault::SecretStore;

/// Execute the `replace` command.
pub fn execute(cli: &Cli, root: &Path, dry_run: bool) -> Result<()> {
    let settings = load_settings()?;
    let password = prompt_password()?;
    let ctx = vault_context(cli, &settings, password)?;
    let store = SecretStore::open(&ctx)?;

    let options = RunOptions {
        dry_run,
        skip_binary: settings.skip_binary,
        exclude: vec![ctx.path().to_path_buf()],
        ..RunOptions::new(Direction::Forward)
    };
    let report = substitute::run(root, &store, &options)?;

    output::print_run_report(&report, "replaced", dry_run);

    if report.changed.is_empty() {
        output::info("No secrets replaced.");
    } else {
        output::success(&format!(
            "{} secret occurrence(s) {} in {} file(s)",
            report.total_replacements(),
            if dry_run { "would be replaced" } else { "replaced" },
            report.changed.len()
        ));
    }

    Ok(())
}
