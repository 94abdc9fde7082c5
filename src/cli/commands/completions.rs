//! `uu-secret-manager completions` — generate shell completion scripts.
//!
//! Usage:
//!   uu-secret-manager completions bash > ~/.bash_completion.d/uu-secret-manager
//!   uu-secret-manager completions zsh

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{Result, SecretManagerError};

const BIN_NAME: &str = "uu-secret-manager";

/// Execute the `completions` command.
pub fn execute(shell: &str) -> Result<()> {
    write_completions(parse_shell(shell)?, &mut io::stdout())
}

/// Render the completion script for `shell` into `out`.
fn write_completions(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
    Ok(())
}

/// Parse a shell name, case-insensitively.
fn parse_shell(name: &str) -> Result<Shell> {
    match name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        "powershell" | "ps" => Ok(Shell::PowerShell),
        "elvish" => Ok(Shell::Elvish),
        other => Err(SecretManagerError::CommandFailed(format!(
            "unknown shell '{other}' (supported: bash, zsh, fish, powershell, elvish)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_shell_accepts_known_names_in_any_case() {
        let cases = [
            ("bash", Shell::Bash),
            ("ZSH", Shell::Zsh),
            ("Fish", Shell::Fish),
            ("ps", Shell::PowerShell),
            ("elvish", Shell::Elvish),
        ];
        for (name, expected) in cases {
            assert_eq!(parse_shell(name).unwrap(), expected, "{name}");
        }
    }

    #[test]
    fn parse_shell_unknown_fails() {
        assert!(parse_shell("csh").is_err());
        assert!(parse_shell("").is_err());
    }

    #[test]
    fn bash_script_mentions_every_subcommand() {
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut buf).unwrap();
        let script = String::from_utf8(buf).unwrap();
        for sub in ["list", "add", "replace", "reverse", "rotate-key", "install-hook"] {
            assert!(script.contains(sub), "missing {sub}");
        }
    }
}
