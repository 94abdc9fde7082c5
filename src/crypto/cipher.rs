//! AES-256 in counter mode plus PKCS#7 block padding.
//!
//! CTR is a stream mode and needs no padding on its own, but the vault
//! format pads the plaintext to the AES block size before encrypting,
//! so both halves live here.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};

use crate::errors::{Result, SecretManagerError};

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// AES-256 with a 128-bit big-endian counter.
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// XOR `data` in place with the AES-256-CTR keystream.
///
/// The same call encrypts and decrypts.
pub fn apply_keystream(key: &[u8], counter: &[u8], data: &mut [u8]) -> Result<()> {
    let mut cipher = Aes256Ctr::new_from_slices(key, counter)
        .map_err(|e| SecretManagerError::EncryptionFailed(format!("invalid key length: {e}")))?;
    cipher.apply_keystream(data);
    Ok(())
}

/// Append PKCS#7 padding. A full block is added when already aligned.
pub fn pad(data: &mut Vec<u8>) {
    let pad_len = BLOCK_LEN - data.len() % BLOCK_LEN;
    // pad_len is in 1..=16.
    data.extend(std::iter::repeat(pad_len as u8).take(pad_len));
}

/// Strip PKCS#7 padding, returning `None` if the padding is invalid.
pub fn unpad(mut data: Vec<u8>) -> Option<Vec<u8>> {
    let &last = data.last()?;
    let pad_len = usize::from(last);
    if pad_len == 0 || pad_len > BLOCK_LEN || pad_len > data.len() {
        return None;
    }
    let body_len = data.len() - pad_len;
    if !data[body_len..].iter().all(|&b| b == last) {
        return None;
    }
    data.truncate(body_len);
    Some(data)
}
