use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in uu-secret-manager.
#[derive(Debug, Error)]
pub enum SecretManagerError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault errors ---
    #[error("Vault not found at {0} (run `add` to create one)")]
    VaultNotFound(PathBuf),

    #[error("Wrong password for vault {0}")]
    WrongPassword(PathBuf),

    #[error("Malformed vault file {path}: {reason}")]
    MalformedVault { path: PathBuf, reason: String },

    #[error("Invalid secret store payload in {path}: {reason}")]
    InvalidPayload { path: PathBuf, reason: String },

    // --- File errors ---
    #[error("Cannot read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not valid UTF-8 text")]
    Encoding(PathBuf),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

/// Convenience type alias for uu-secret-manager results.
pub type Result<T> = std::result::Result<T, SecretManagerError>;
