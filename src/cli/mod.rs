//! CLI module — Clap argument parser, password prompting, output helpers,
//! and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, SecretManagerError};
use crate::vault::VaultContext;

/// Minimum password length for a new vault.
const MIN_PASSWORD_LEN: usize = 8;

/// uu-secret-manager: swap literal secrets for placeholders backed by an
/// encrypted vault.
#[derive(Parser)]
#[command(
    name = "uu-secret-manager",
    about = "Manage secrets in files and folders via placeholders and an encrypted vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the encrypted secrets store (default: secrets.json)
    #[arg(short, long, global = true)]
    pub secrets: Option<String>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// List all secrets in the store
    List,

    /// Add a secret to the store (creates the store if needed)
    Add {
        /// The literal secret value
        secret: String,
        /// Free-text note stored with the secret
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Replace secrets in files with placeholders
    Replace {
        /// File or directory to process
        path: PathBuf,
        /// Report what would change without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Reverse placeholders back to secrets in files
    Reverse {
        /// File or directory to process
        path: PathBuf,
        /// Report what would change without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Re-encrypt the store under a new password
    RotateKey,

    /// Install a git pre-commit hook that blocks literal secrets
    InstallHook,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Read the vault password.
///
/// On a terminal this is a hidden interactive prompt. When stdin is piped,
/// one line is read from it instead. Passwords are never taken from
/// arguments or environment variables.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        return read_piped_password();
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Vault password")
        .interact()
        .map_err(|e| SecretManagerError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (new vault, `rotate-key`).
///
/// Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let pw = read_piped_password()?;
        validate_new_password(&pw)?;
        return Ok(pw);
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose vault password")
            .with_confirmation(
                "Confirm vault password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| SecretManagerError::CommandFailed(format!("password prompt: {e}")))?;

        if let Err(e) = validate_new_password(&password) {
            output::warning(&e.to_string());
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Read one line from piped stdin, without its line ending.
fn read_piped_password() -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Err(SecretManagerError::UserCancelled);
    }
    let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed_len);
    Ok(line)
}

/// Reject passwords that are too short for a new vault.
pub fn validate_new_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SecretManagerError::CommandFailed(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Build the full path to the secrets store from CLI args and settings.
pub fn secrets_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(settings.secrets_path(&cwd, cli.secrets.as_deref()))
}

/// Bundle path, password and KDF settings into the per-command context.
pub fn vault_context(
    cli: &Cli,
    settings: &Settings,
    password: Zeroizing<String>,
) -> Result<VaultContext> {
    Ok(VaultContext::new(secrets_path(cli, settings)?, password)
        .with_params(settings.kdf_params())
        .with_vault_id(settings.vault_id.clone()))
}

/// Load settings from the current directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}
