//! The secret store: identifiers mapped to secret records.
//!
//! `SecretStore` is the decrypted JSON payload held in memory. It is
//! loaded whole, mutated, and written back whole; there is no partial
//! persistence. Entry order follows the JSON object order on disk, then
//! insertion order for new records.

use chrono::Utc;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{Result, SecretManagerError};

use super::context::VaultContext;
use super::file;
use super::secret::{placeholder, SecretRecord, StoredRecord};

/// Why a decrypted payload is not a secret store.
///
/// Carries no path: `SecretStore::open` attaches the vault path when
/// converting it into `SecretManagerError::InvalidPayload`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct PayloadError(String);

/// One identifier with its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretEntry {
    pub id: String,
    pub record: SecretRecord,
}

impl SecretEntry {
    /// The placeholder token for this entry.
    pub fn placeholder(&self) -> String {
        placeholder(&self.id)
    }
}

/// In-memory secret store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretStore {
    entries: Vec<SecretEntry>,
}

impl SecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Parsing and serialization
    // ------------------------------------------------------------------

    /// Parse the decrypted JSON payload.
    ///
    /// Empty or whitespace-only input is an empty store, not an error.
    /// Each entry may be a bare string or a record object.
    pub fn from_json(text: &str) -> std::result::Result<Self, PayloadError> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }

        let map: Map<String, Value> = serde_json::from_str(text)
            .map_err(|e| PayloadError(format!("expected a JSON object: {e}")))?;

        let mut entries = Vec::with_capacity(map.len());
        for (id, value) in map {
            let stored: StoredRecord = serde_json::from_value(value)
                .map_err(|e| PayloadError(format!("entry '{id}': {e}")))?;
            entries.push(SecretEntry {
                id,
                record: stored.into(),
            });
        }

        Ok(Self { entries })
    }

    /// Parse decrypted bytes, which must be UTF-8.
    pub fn from_plaintext(bytes: &[u8]) -> std::result::Result<Self, PayloadError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| PayloadError("decrypted payload is not UTF-8".into()))?;
        Self::from_json(text)
    }

    /// Serialize to pretty-printed JSON in the object record shape.
    pub fn to_json(&self) -> Result<String> {
        let mut map = Map::with_capacity(self.entries.len());
        for entry in &self.entries {
            let value = serde_json::to_value(&entry.record)
                .map_err(|e| SecretManagerError::SerializationError(format!("{}: {e}", entry.id)))?;
            map.insert(entry.id.clone(), value);
        }
        serde_json::to_string_pretty(&map)
            .map_err(|e| SecretManagerError::SerializationError(e.to_string()))
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Decrypt and load the vault described by `ctx`.
    ///
    /// A missing file is `VaultNotFound`; callers that may bootstrap a
    /// new store use `open_or_new` instead.
    pub fn open(ctx: &VaultContext) -> Result<Self> {
        let opened = file::read_vault(ctx.path(), ctx.password(), ctx.params())?;
        let store = Self::from_plaintext(&opened.plaintext).map_err(|e| {
            SecretManagerError::InvalidPayload {
                path: ctx.path().to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        debug!(path = %ctx.path().display(), secrets = store.len(), "opened secret store");
        Ok(store)
    }

    /// Like `open`, but a missing vault yields an empty store.
    ///
    /// Returns `true` alongside the store when the vault did not exist yet.
    pub fn open_or_new(ctx: &VaultContext) -> Result<(Self, bool)> {
        match Self::open(ctx) {
            Ok(store) => Ok((store, false)),
            Err(SecretManagerError::VaultNotFound(path)) => {
                debug!(path = %path.display(), "no vault yet, starting an empty store");
                Ok((Self::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    /// Re-encrypt the whole payload and overwrite the vault atomically.
    pub fn save(&self, ctx: &VaultContext) -> Result<()> {
        let json = zeroize::Zeroizing::new(self.to_json()?);
        file::write_vault(
            ctx.path(),
            json.as_bytes(),
            ctx.password(),
            ctx.params(),
            ctx.vault_id(),
        )
    }

    // ------------------------------------------------------------------
    // Secret operations
    // ------------------------------------------------------------------

    /// Add `secret` under a freshly minted identifier and return the id.
    ///
    /// Values are never deduplicated: adding the same literal twice gives
    /// two entries with two placeholders.
    pub fn add(&mut self, secret: &str, description: Option<&str>) -> Result<String> {
        if secret.is_empty() {
            return Err(SecretManagerError::CommandFailed(
                "secret value cannot be empty".into(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        self.entries.push(SecretEntry {
            id: id.clone(),
            record: SecretRecord {
                secret: secret.to_string(),
                description: description.map(str::to_string),
                created: Some(Utc::now()),
            },
        });
        Ok(id)
    }

    /// Insert a record under an explicit id, replacing any existing one.
    pub fn insert(&mut self, id: impl Into<String>, record: SecretRecord) {
        let id = id.into();
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => entry.record = record,
            None => self.entries.push(SecretEntry { id, record }),
        }
    }

    /// Entries in store order.
    pub fn entries(&self) -> &[SecretEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
