//! `uu-secret-manager add` — store a literal secret and print its placeholder.
//!
//! This is the only command that bootstraps a store: when the vault file
//! does not exist yet, a new password is chosen and an empty store is
//! created before the secret is added.

use crate::cli::output;
use crate::cli::{
    load_settings, prompt_new_password, prompt_password, secrets_path, vault_context, Cli,
};
use crate::errors::Result;
use crate::vault::SecretStore;

/// Execute the `add` command.
pub fn execute(cli: &Cli, secret: &str, description: Option<&str>) -> Result<()> {
    let settings = load_settings()?;
    let path = secrets_path(cli, &settings)?;

    let password = if path.exists() {
        prompt_password()?
    } else {
        output::info(&format!("Creating a new secrets store at {}", path.display()));
        prompt_new_password()?
    };

    let ctx = vault_context(cli, &settings, password)?;
    let (mut store, created) = SecretStore::open_or_new(&ctx)?;

    let id = store.add(secret, description)?;
    store.save(&ctx)?;

    if created {
        output::success(&format!("Created {}", ctx.path().display()));
    }
    output::success(&format!(
        "Secret added with placeholder: {}",
        crate::vault::placeholder(&id)
    ));
    output::tip("Run `uu-secret-manager replace <path>` to swap it out of your files.");

    Ok(())
}
