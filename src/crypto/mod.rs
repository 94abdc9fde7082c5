//! Cryptographic primitives for uu-secret-manager.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 key stretching (`kdf`)
//! - AES-256-CTR keystream and PKCS#7 padding (`cipher`)

pub mod cipher;
pub mod kdf;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{derive_keys, generate_salt, KdfParams};
pub use cipher::apply_keystream;
pub use kdf::{derive_keys, generate_salt, DerivedKeys, KdfParams};
