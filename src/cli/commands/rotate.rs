//! `uu-secret-manager rotate-key` — change the store password.
//!
//! Decrypts the store with the current password, then writes it back
//! under the new one. A fresh salt is generated by the codec on every
//! save, so the new file shares no key material with the old one.

use crate::cli::output;
use crate::cli::{load_settings, prompt_new_password, prompt_password, vault_context, Cli};
use crate::errors::Result;
use crate::vault::SecretStore;

/// Execute the `rotate-key` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;

    // 1. Open the store with the current password.
    output::info("Enter your current store password.");
    let old_password = prompt_password()?;
    let ctx = vault_context(cli, &settings, old_password)?;
    let store = SecretStore::open(&ctx)?;

    // 2. Prompt for the new password.
    output::info("Choose your new store password.");
    let new_password = prompt_new_password()?;
    let new_ctx = ctx.with_password(new_password);

    // 3. Save atomically under the new password.
    store.save(&new_ctx)?;

    output::success(&format!(
        "Password rotated for {} ({} secrets re-encrypted)",
        new_ctx.path().display(),
        store.len()
    ));

    Ok(())
}
