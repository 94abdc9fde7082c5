//! Secret records stored inside the vault payload.
//!
//! Older stores kept each entry as a bare string. Both shapes are
//! accepted on read through `StoredRecord` and normalized straight into
//! `SecretRecord`, so nothing past the parser sees the legacy form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single secret: the literal value plus optional metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRecord {
    /// The literal sensitive value.
    pub secret: String,

    /// Free-text note about where the secret is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When the record was added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl SecretRecord {
    /// A record with no metadata, as legacy entries are read.
    pub fn bare(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            description: None,
            created: None,
        }
    }
}

/// On-disk shape of a record: either a bare string or the full object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum StoredRecord {
    Legacy(String),
    Full(SecretRecord),
}

impl From<StoredRecord> for SecretRecord {
    fn from(stored: StoredRecord) -> Self {
        match stored {
            StoredRecord::Legacy(secret) => SecretRecord::bare(secret),
            StoredRecord::Full(record) => record,
        }
    }
}

/// The placeholder token that stands in for the secret with `id`.
pub fn placeholder(id: &str) -> String {
    format!("<!secret_{id}!>")
}
