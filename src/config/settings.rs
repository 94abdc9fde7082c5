use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{KdfParams, DEFAULT_ITERATIONS, MIN_ITERATIONS};
use crate::errors::{Result, SecretManagerError};

/// Project-level configuration, loaded from `.uusecret.toml`.
///
/// Every field has a sensible default so the tool works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault file used when `--secrets` is not given.
    #[serde(default = "default_secrets_file")]
    pub secrets_file: String,

    /// PBKDF2 iteration count. The vault header cannot record it, so a
    /// non-default value must be used for every read and write.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Label written into a 1.2 vault header.
    #[serde(default)]
    pub vault_id: Option<String>,

    /// Skip non-UTF-8 files during `replace`/`reverse` instead of failing.
    #[serde(default = "default_skip_binary")]
    pub skip_binary: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_secrets_file() -> String {
    "secrets.json".to_string()
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_skip_binary() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            secrets_file: default_secrets_file(),
            kdf_iterations: default_kdf_iterations(),
            vault_id: None,
            skip_binary: default_skip_binary(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".uusecret.toml";

    /// Load settings from `<project_dir>/.uusecret.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed or holds invalid values,
    /// an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            SecretManagerError::ConfigError(format!(
                "Failed to parse {}: {e}",
                config_path.display()
            ))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.kdf_iterations < MIN_ITERATIONS {
            return Err(SecretManagerError::ConfigError(format!(
                "kdf_iterations must be at least {MIN_ITERATIONS} (got {})",
                self.kdf_iterations
            )));
        }
        if let Some(id) = &self.vault_id {
            if id.is_empty() || id.contains(';') || id.chars().any(char::is_whitespace) {
                return Err(SecretManagerError::ConfigError(format!(
                    "vault_id '{id}' must be non-empty and contain no ';' or whitespace"
                )));
            }
        }
        if self.secrets_file.trim().is_empty() {
            return Err(SecretManagerError::ConfigError(
                "secrets_file cannot be empty".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the vault path: an explicit override wins over the config.
    pub fn secrets_path(&self, project_dir: &Path, explicit: Option<&str>) -> PathBuf {
        project_dir.join(explicit.unwrap_or(&self.secrets_file))
    }

    /// Convert the KDF settings into crypto-layer params.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            iterations: self.kdf_iterations,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
