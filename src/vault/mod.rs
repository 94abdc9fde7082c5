//! Vault module — encrypted secret storage.
//!
//! This module provides:
//! - `SecretRecord` and the placeholder token helper (`secret`)
//! - The byte-level vault codec (`format`)
//! - Atomic vault file I/O (`file`)
//! - The per-invocation `VaultContext` (`context`)
//! - The in-memory `SecretStore` (`store`)

pub mod context;
pub mod file;
pub mod format;
pub mod secret;
pub mod store;

// Re-export the most commonly used items.
pub use context::VaultContext;
pub use format::{CodecError, VaultHeader};
pub use secret::{placeholder, SecretRecord};
pub use store::{PayloadError, SecretEntry, SecretStore};
