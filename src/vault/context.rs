//! Per-invocation vault context.
//!
//! One password, one store path and one set of KDF parameters are shared
//! by everything a command does. They are bundled here once and passed by
//! reference instead of living in process-wide state.

use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::crypto::kdf::KdfParams;

/// Immutable settings needed to open and save a vault.
pub struct VaultContext {
    path: PathBuf,
    password: Zeroizing<String>,
    params: KdfParams,
    vault_id: Option<String>,
}

impl VaultContext {
    pub fn new(path: impl Into<PathBuf>, password: Zeroizing<String>) -> Self {
        Self {
            path: path.into(),
            password,
            params: KdfParams::default(),
            vault_id: None,
        }
    }

    /// Override the KDF parameters (default: 10 000 PBKDF2 rounds).
    pub fn with_params(mut self, params: KdfParams) -> Self {
        self.params = params;
        self
    }

    /// Write vaults with a 1.2 header carrying this label.
    pub fn with_vault_id(mut self, vault_id: Option<String>) -> Self {
        self.vault_id = vault_id;
        self
    }

    /// Same path and settings, different password (used by `rotate-key`).
    pub fn with_password(&self, password: Zeroizing<String>) -> Self {
        Self {
            path: self.path.clone(),
            password,
            params: self.params,
            vault_id: self.vault_id.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn password(&self) -> &[u8] {
        self.password.as_bytes()
    }

    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    pub fn vault_id(&self) -> Option<&str> {
        self.vault_id.as_deref()
    }
}
