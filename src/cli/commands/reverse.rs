//! `uu-secret-manager reverse` — restore secrets from placeholders.

use std::path::Path;

use crate::cli::output;
use crate::cli::{load_settings, prompt_password, vault_context, Cli};
use crate::errors::Result;
use crate::substitute::{self, Direction, RunOptions};
use crate::vault::SecretStore;

/// Execute the `reverse` command.
pub fn execute(cli: &Cli, root: &Path, dry_run: bool) -> Result<()> {
    let settings = load_settings()?;
    let password = prompt_password()?;
    let ctx = vault_context(cli, &settings, password)?;
    let store = SecretStore::open(&ctx)?;

    let options = RunOptions {
        dry_run,
        skip_binary: settings.skip_binary,
        exclude: vec![ctx.path().to_path_buf()],
        ..RunOptions::new(Direction::Reverse)
    };
    let report = substitute::run(root, &store, &options)?;

    output::print_run_report(&report, "reversed", dry_run);

    if report.changed.is_empty() {
        output::info("No placeholders reversed.");
    } else {
        output::success(&format!(
            "{} placeholder(s) {} in {} file(s)",
            report.total_replacements(),
            if dry_run { "would be reversed" } else { "reversed" },
            report.changed.len()
        ));
    }

    Ok(())
}
