//! Git integration — pre-commit hook for secret leak prevention.
//!
//! The hook scans the staged diff for patterns that look like hardcoded
//! secrets. If one matches, the commit is blocked and the user is pointed
//! at `uu-secret-manager add` / `replace`. Placeholder tokens never match.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{Result, SecretManagerError};

/// The filename of the pre-commit hook.
const HOOK_NAME: &str = "pre-commit";

/// Marker line identifying our hook.
const HOOK_MARKER: &str = "uu-secret-manager pre-commit hook";

/// Common patterns that indicate hardcoded secrets.
/// Each entry is (pattern_name, extended regex).
const SECRET_PATTERNS: &[(&str, &str)] = &[
    ("AWS Access Key", r"AKIA[0-9A-Z]{16}"),
    ("GitHub Token", r"gh[ps]_[A-Za-z0-9_]{36,}"),
    ("GitHub Fine-Grained Token", r"github_pat_[A-Za-z0-9_]{82}"),
    ("Stripe Key", r"sk_(live|test)_[A-Za-z0-9]{24,}"),
    ("OpenAI-style Key", r"sk-[A-Za-z0-9]{20,}"),
    ("Slack Token", r"xox[bpas]-[A-Za-z0-9-]+"),
    (
        "Private Key Header",
        r"-----BEGIN (RSA |EC |OPENSSH )?PRIVATE KEY-----",
    ),
];

/// Generate the shell script content for the pre-commit hook.
fn hook_script() -> String {
    use std::fmt::Write;
    let mut patterns = String::new();
    for (name, pattern) in SECRET_PATTERNS {
        let _ = write!(
            patterns,
            "if echo \"$added\" | grep -qE -e '{pattern}'; then\n\
             \x20   echo \"  [!] Possible {name} found in staged changes\"\n\
             \x20   found=1\n\
             fi\n",
        );
    }

    format!(
        r#"#!/bin/sh
# {HOOK_MARKER}: blocks commits containing literal secrets.
# Installed by `uu-secret-manager install-hook`. Remove this file to disable.

# Only lines being added; placeholders (<!secret_...!>) are dropped first.
added=$(git diff --cached --diff-filter=ACM -U0 | grep '^+' | grep -v '^+++' | sed 's/<!secret_[^!]*!>//g')
found=0

{patterns}
if [ "$found" -eq 1 ]; then
    echo ""
    echo "  uu-secret-manager: potential secrets detected in staged files!"
    echo "  Track them with 'uu-secret-manager add <secret>' and run"
    echo "  'uu-secret-manager replace <path>' before committing."
    echo "  To bypass this check: git commit --no-verify"
    echo ""
    exit 1
fi

exit 0
"#
    )
}

/// Result of attempting to install the pre-commit hook.
#[derive(Debug, PartialEq, Eq)]
pub enum InstallResult {
    /// Hook was installed successfully.
    Installed,
    /// A foreign hook was moved aside to the given path, then ours installed.
    InstalledWithBackup(PathBuf),
    /// Our hook is already installed.
    AlreadyInstalled,
}

/// Install the pre-commit hook into `<project_dir>/.git/hooks/`.
///
/// A pre-existing hook that is not ours is copied to `pre-commit.backup`
/// before being replaced. Running outside a git repository is an error.
pub fn install_hook(project_dir: &Path) -> Result<InstallResult> {
    let git_dir = project_dir.join(".git");
    if !git_dir.is_dir() {
        return Err(SecretManagerError::CommandFailed(format!(
            "{} is not a git repository (run from the repository root)",
            project_dir.display()
        )));
    }

    let hooks_dir = git_dir.join("hooks");
    if !hooks_dir.exists() {
        fs::create_dir_all(&hooks_dir).map_err(|e| {
            SecretManagerError::CommandFailed(format!("failed to create hooks dir: {e}"))
        })?;
    }

    let hook_path = hooks_dir.join(HOOK_NAME);
    let mut backup = None;

    if hook_path.exists() {
        let existing = fs::read_to_string(&hook_path).unwrap_or_default();
        if existing.contains(HOOK_MARKER) {
            return Ok(InstallResult::AlreadyInstalled);
        }

        let backup_path = hooks_dir.join(format!("{HOOK_NAME}.backup"));
        fs::copy(&hook_path, &backup_path).map_err(|e| {
            SecretManagerError::CommandFailed(format!("failed to back up existing hook: {e}"))
        })?;
        backup = Some(backup_path);
    }

    fs::write(&hook_path, hook_script()).map_err(|e| {
        SecretManagerError::CommandFailed(format!("failed to write pre-commit hook: {e}"))
    })?;

    // Make the hook executable on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o755);
        fs::set_permissions(&hook_path, perms).map_err(|e| {
            SecretManagerError::CommandFailed(format!("failed to set hook permissions: {e}"))
        })?;
    }

    Ok(match backup {
        Some(path) => InstallResult::InstalledWithBackup(path),
        None => InstallResult::Installed,
    })
}
