//! Vault file codec: Ansible-Vault-compatible `AES256` envelope.
//!
//! A vault file has this layout:
//!
//! ```text
//! $ANSIBLE_VAULT;1.1;AES256            (or 1.2;AES256;<vault-id>)
//! <hex body, wrapped at 80 columns>
//! ```
//!
//! The hex body decodes to three newline-separated hex fields:
//!
//! ```text
//! hex(salt) \n hex(HMAC-SHA256(ciphertext)) \n hex(ciphertext)
//! ```
//!
//! The ciphertext is AES-256-CTR over the PKCS#7-padded plaintext. Keys
//! and the counter block come from PBKDF2 (see `crypto::kdf`).
//!
//! This layer only transforms byte buffers. Reading and writing files is
//! done by `vault::file`, which attaches the path to any error.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use crate::crypto::cipher::{self, apply_keystream};
use crate::crypto::kdf::{derive_keys, generate_salt, KdfParams};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Tag on the first line of every vault file.
const TAG: &str = "$ANSIBLE_VAULT";

/// Format version without a vault id.
const VERSION_1_1: &str = "1.1";

/// Format version carrying a vault id label.
const VERSION_1_2: &str = "1.2";

/// The only cipher this codec speaks.
const CIPHER_NAME: &str = "AES256";

/// Column width of the hex body.
const LINE_WIDTH: usize = 80;

/// Size of the HMAC-SHA256 tag.
const HMAC_LEN: usize = 32;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures of the byte-level codec. The file boundary turns these into
/// `SecretManagerError` values carrying the vault path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("wrong password or tampered vault (HMAC mismatch)")]
    WrongPassword,

    #[error("{0}")]
    Malformed(String),

    #[error("{0}")]
    Crypto(String),
}

type CodecResult<T> = std::result::Result<T, CodecError>;

impl From<crate::errors::SecretManagerError> for CodecError {
    fn from(e: crate::errors::SecretManagerError) -> Self {
        CodecError::Crypto(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// The cleartext first line of a vault file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultHeader {
    /// `1.1` or `1.2`.
    pub version: String,
    /// Cipher name, always `AES256` for headers we accept.
    pub cipher: String,
    /// Vault id label, present only in 1.2 headers.
    pub vault_id: Option<String>,
}

impl VaultHeader {
    /// Header for a newly written vault.
    pub fn new(vault_id: Option<&str>) -> Self {
        let version = if vault_id.is_some() {
            VERSION_1_2
        } else {
            VERSION_1_1
        };
        Self {
            version: version.to_string(),
            cipher: CIPHER_NAME.to_string(),
            vault_id: vault_id.map(str::to_string),
        }
    }

    /// Parse the first line of a vault file.
    pub fn parse(line: &str) -> CodecResult<Self> {
        let fields: Vec<&str> = line.trim().split(';').map(str::trim).collect();

        if fields.first() != Some(&TAG) {
            return Err(CodecError::Malformed(format!("missing {TAG} header")));
        }
        if fields.len() < 3 {
            return Err(CodecError::Malformed("truncated vault header".into()));
        }

        let version = fields[1];
        let vault_id = match (version, fields.len()) {
            (VERSION_1_1, 3) => None,
            (VERSION_1_2, 4) if !fields[3].is_empty() => Some(fields[3].to_string()),
            (VERSION_1_2, _) => {
                return Err(CodecError::Malformed(
                    "1.2 header must carry exactly one vault id".into(),
                ))
            }
            (VERSION_1_1, _) => {
                return Err(CodecError::Malformed(
                    "unexpected extra fields in 1.1 header".into(),
                ))
            }
            (other, _) => {
                return Err(CodecError::Malformed(format!(
                    "unsupported format version {other}"
                )))
            }
        };

        let cipher = fields[2];
        if cipher != CIPHER_NAME {
            return Err(CodecError::Malformed(format!(
                "unsupported cipher {cipher}, expected {CIPHER_NAME}"
            )));
        }

        Ok(Self {
            version: version.to_string(),
            cipher: cipher.to_string(),
            vault_id,
        })
    }

    /// Render the header line (without newline).
    pub fn render(&self) -> String {
        match &self.vault_id {
            Some(id) => format!("{TAG};{};{};{id}", self.version, self.cipher),
            None => format!("{TAG};{};{}", self.version, self.cipher),
        }
    }
}

/// Returns `true` if `content` starts with a vault header tag.
pub fn is_vault(content: &[u8]) -> bool {
    content.starts_with(TAG.as_bytes())
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Encrypt `plaintext` into the text of a vault file.
///
/// Every call draws a fresh random salt, so encrypting the same plaintext
/// twice yields different output.
pub fn encrypt(
    plaintext: &[u8],
    password: &[u8],
    params: &KdfParams,
    vault_id: Option<&str>,
) -> CodecResult<String> {
    let salt = generate_salt();
    encrypt_with_salt(plaintext, password, &salt, params, vault_id)
}

fn encrypt_with_salt(
    plaintext: &[u8],
    password: &[u8],
    salt: &[u8],
    params: &KdfParams,
    vault_id: Option<&str>,
) -> CodecResult<String> {
    let keys = derive_keys(password, salt, params)?;

    let mut ciphertext = plaintext.to_vec();
    cipher::pad(&mut ciphertext);
    apply_keystream(keys.cipher_key(), keys.counter(), &mut ciphertext)?;

    let tag = compute_hmac(keys.hmac_key(), &ciphertext)?;

    let inner = format!(
        "{}\n{}\n{}",
        hex::encode(salt),
        hex::encode(tag),
        hex::encode(&ciphertext)
    );
    let body = hex::encode(inner.as_bytes());

    let header = VaultHeader::new(vault_id);
    let mut out = String::with_capacity(body.len() + body.len() / LINE_WIDTH + 64);
    out.push_str(&header.render());
    out.push('\n');
    // The body is ASCII hex, so byte chunks are valid str slices.
    for chunk in body.as_bytes().chunks(LINE_WIDTH) {
        out.push_str(&String::from_utf8_lossy(chunk));
        out.push('\n');
    }

    debug!(
        iterations = params.iterations,
        version = %header.version,
        bytes = out.len(),
        "encrypted vault payload"
    );
    Ok(out)
}

/// Decrypted content of a vault file together with its header.
#[derive(Debug)]
pub struct Opened {
    pub header: VaultHeader,
    pub plaintext: Vec<u8>,
}

/// Decrypt the raw bytes of a vault file.
///
/// The HMAC is verified before any decryption happens; a mismatch is
/// reported as `WrongPassword` since AES-CTR itself cannot tell a wrong
/// key from a right one.
pub fn decrypt(file_bytes: &[u8], password: &[u8], params: &KdfParams) -> CodecResult<Opened> {
    let text = std::str::from_utf8(file_bytes)
        .map_err(|_| CodecError::Malformed("vault file is not ASCII text".into()))?;

    let (first_line, body) = text.split_once('\n').unwrap_or((text, ""));
    let header = VaultHeader::parse(first_line)?;

    let (salt, expected_hmac, ciphertext) = parse_body(body)?;

    let keys = derive_keys(password, &salt, params)?;
    verify_hmac(keys.hmac_key(), &ciphertext, &expected_hmac)?;

    let mut padded = ciphertext;
    apply_keystream(keys.cipher_key(), keys.counter(), &mut padded)?;
    let plaintext = cipher::unpad(padded)
        .ok_or_else(|| CodecError::Malformed("invalid padding after decryption".into()))?;

    debug!(
        iterations = params.iterations,
        version = %header.version,
        bytes = plaintext.len(),
        "decrypted vault payload"
    );
    Ok(Opened { header, plaintext })
}

// ---------------------------------------------------------------------------
// Body framing
// ---------------------------------------------------------------------------

/// Split the hex body into salt, HMAC tag and ciphertext.
fn parse_body(body: &str) -> CodecResult<(Vec<u8>, Vec<u8>, Vec<u8>)> {
    let joined: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    if joined.is_empty() {
        return Err(CodecError::Malformed("vault body is empty".into()));
    }

    let inner = hex::decode(&joined)
        .map_err(|e| CodecError::Malformed(format!("vault body is not hex: {e}")))?;

    let mut fields = inner.split(|&b| b == b'\n');
    let (Some(salt), Some(mac), Some(ct), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(CodecError::Malformed(
            "vault body must hold exactly salt, HMAC and ciphertext".into(),
        ));
    };

    let salt = decode_field("salt", salt)?;
    let mac = decode_field("HMAC", mac)?;
    let ct = decode_field("ciphertext", ct)?;

    if salt.is_empty() {
        return Err(CodecError::Malformed("salt is empty".into()));
    }
    if mac.len() != HMAC_LEN {
        return Err(CodecError::Malformed(format!(
            "HMAC must be {HMAC_LEN} bytes, got {}",
            mac.len()
        )));
    }
    if ct.is_empty() || ct.len() % cipher::BLOCK_LEN != 0 {
        return Err(CodecError::Malformed(
            "ciphertext length is not a whole number of blocks".into(),
        ));
    }

    Ok((salt, mac, ct))
}

fn decode_field(name: &str, field: &[u8]) -> CodecResult<Vec<u8>> {
    hex::decode(field).map_err(|e| CodecError::Malformed(format!("{name} is not hex: {e}")))
}

// ---------------------------------------------------------------------------
// HMAC
// ---------------------------------------------------------------------------

/// Compute HMAC-SHA256 over the ciphertext.
fn compute_hmac(hmac_key: &[u8], ciphertext: &[u8]) -> CodecResult<Vec<u8>> {
    let mut mac = Hmac::<Sha256>::new_from_slice(hmac_key)
        .map_err(|e| CodecError::Crypto(format!("invalid HMAC key: {e}")))?;
    mac.update(ciphertext);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Verify the HMAC using `verify_slice`, which compares in constant time.
fn verify_hmac(hmac_key: &[u8], ciphertext: &[u8], expected: &[u8]) -> CodecResult<()> {
    let mut mac = Hmac::<Sha256>::new_from_slice(hmac_key)
        .map_err(|e| CodecError::Crypto(format!("invalid HMAC key: {e}")))?;
    mac.update(ciphertext);
    mac.verify_slice(expected)
        .map_err(|_| CodecError::WrongPassword)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
