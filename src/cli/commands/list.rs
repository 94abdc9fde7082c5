//! `uu-secret-manager list` — display all secrets in a table.

use crate::cli::output;
use crate::cli::{load_settings, prompt_password, vault_context, Cli};
use crate::errors::Result;
use crate::vault::SecretStore;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let password = prompt_password()?;
    let ctx = vault_context(cli, &settings, password)?;
    let store = SecretStore::open(&ctx)?;

    output::info(&format!(
        "{} — {} secret(s)",
        ctx.path().display(),
        store.len()
    ));

    output::print_secrets_table(&store);

    Ok(())
}
