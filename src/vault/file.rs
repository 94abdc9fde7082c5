//! Vault file I/O: the boundary between the byte-level codec and disk.
//!
//! Reading distinguishes a missing file (`VaultNotFound`) from every other
//! failure so callers can decide whether a fresh store is acceptable.
//! Writing goes through a temp file and a rename so a crash mid-write
//! never truncates the existing vault.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::crypto::kdf::KdfParams;
use crate::errors::{Result, SecretManagerError};

use super::format::{self, CodecError, Opened};

/// Read and decrypt the vault at `path`.
pub fn read_vault(path: &Path, password: &[u8], params: &KdfParams) -> Result<Opened> {
    let data = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SecretManagerError::VaultNotFound(path.to_path_buf()),
        _ => SecretManagerError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    debug!(path = %path.display(), bytes = data.len(), "read vault file");

    if !format::is_vault(&data) {
        return Err(SecretManagerError::MalformedVault {
            path: path.to_path_buf(),
            reason: "not an encrypted vault (missing $ANSIBLE_VAULT header)".into(),
        });
    }

    format::decrypt(&data, password, params).map_err(|e| codec_error(path, e))
}

/// Encrypt `plaintext` and write it to `path` **atomically**.
///
/// 1. Encrypt with a fresh salt.
/// 2. Write to a temp file in the same directory.
/// 3. Rename the temp file over the target path.
pub fn write_vault(
    path: &Path,
    plaintext: &[u8],
    password: &[u8],
    params: &KdfParams,
    vault_id: Option<&str>,
) -> Result<()> {
    let text = format::encrypt(plaintext, password, params, vault_id)
        .map_err(|e| SecretManagerError::EncryptionFailed(e.to_string()))?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|e| write_error(parent, e))?;
    }

    // Same directory as the target so the rename stays on one filesystem.
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, text.as_bytes()).map_err(|e| write_error(&tmp_path, e))?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_error(path, e));
    }

    debug!(path = %path.display(), bytes = text.len(), "wrote vault file");
    Ok(())
}

fn codec_error(path: &Path, e: CodecError) -> SecretManagerError {
    match e {
        CodecError::WrongPassword => SecretManagerError::WrongPassword(path.to_path_buf()),
        CodecError::Malformed(reason) => SecretManagerError::MalformedVault {
            path: path.to_path_buf(),
            reason,
        },
        CodecError::Crypto(reason) => SecretManagerError::KeyDerivationFailed(reason),
    }
}

fn write_error(path: &Path, source: std::io::Error) -> SecretManagerError {
    SecretManagerError::WriteFailed {
        path: path.to_path_buf(),
        source,
    }
}
