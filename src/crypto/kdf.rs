//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! One PBKDF2 run produces 80 bytes that are split three ways:
//!
//! ```text
//! [ 0..32  AES-256 key ][ 32..64  HMAC-SHA256 key ][ 64..80  initial counter block ]
//! ```
//!
//! The iteration count is a parameter rather than a constant so vaults
//! written with a different work factor can still be opened.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{Result, SecretManagerError};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of each derived key in bytes (256 bits).
const KEY_LEN: usize = 32;

/// Length of the AES counter block in bytes.
const IV_LEN: usize = 16;

/// Conventional iteration count of the vault format.
pub const DEFAULT_ITERATIONS: u32 = 10_000;

/// Lowest iteration count we are willing to derive keys with.
pub const MIN_ITERATIONS: u32 = 1_000;

/// Key-stretching parameters shared by encrypt and decrypt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Number of PBKDF2 rounds (default: 10 000).
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// Key material derived from a password and salt.
///
/// Wiped from memory when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKeys {
    cipher_key: [u8; KEY_LEN],
    hmac_key: [u8; KEY_LEN],
    counter: [u8; IV_LEN],
}

impl DerivedKeys {
    /// AES-256 key used for the CTR keystream.
    pub fn cipher_key(&self) -> &[u8; KEY_LEN] {
        &self.cipher_key
    }

    /// Key for the HMAC-SHA256 over the ciphertext.
    pub fn hmac_key(&self) -> &[u8; KEY_LEN] {
        &self.hmac_key
    }

    /// Initial counter block for AES-CTR.
    pub fn counter(&self) -> &[u8; IV_LEN] {
        &self.counter
    }
}

/// Derive cipher key, HMAC key and counter block from `password` + `salt`.
///
/// The same password, salt and params always produce the same keys.
pub fn derive_keys(password: &[u8], salt: &[u8], params: &KdfParams) -> Result<DerivedKeys> {
    if params.iterations < MIN_ITERATIONS {
        return Err(SecretManagerError::KeyDerivationFailed(format!(
            "PBKDF2 iterations must be at least {MIN_ITERATIONS} (got {})",
            params.iterations
        )));
    }
    if salt.is_empty() {
        return Err(SecretManagerError::KeyDerivationFailed(
            "salt cannot be empty".into(),
        ));
    }

    let mut okm = [0u8; 2 * KEY_LEN + IV_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, params.iterations, &mut okm);

    let mut keys = DerivedKeys {
        cipher_key: [0u8; KEY_LEN],
        hmac_key: [0u8; KEY_LEN],
        counter: [0u8; IV_LEN],
    };
    keys.cipher_key.copy_from_slice(&okm[..KEY_LEN]);
    keys.hmac_key.copy_from_slice(&okm[KEY_LEN..2 * KEY_LEN]);
    keys.counter.copy_from_slice(&okm[2 * KEY_LEN..]);
    okm.zeroize();

    Ok(keys)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
