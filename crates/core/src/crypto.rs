//! Encryption-at-rest for sensitive onboarding fields.
//!
//! [`FieldCipher`] is the single owner of key material. Values that must be
//! redisplayed (Aadhaar, PAN, account number, IFSC) are sealed with
//! AES-256-GCM under a random 96-bit nonce; values used for equality are
//! additionally reduced to a keyed HMAC-SHA256 digest. Neither the data model
//! nor the repositories ever see a key.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::hashing::hmac_sha256_hex;

const NONCE_LEN: usize = 12;

/// Encrypted blob plus equality digest for one sensitive value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedValue {
    pub encrypted: String,
    pub hash: String,
}

/// Crypto collaborator: `encrypt`, `decrypt` and `hash`.
#[derive(Clone)]
pub struct FieldCipher {
    cipher: Aes256Gcm,
    hash_key: Vec<u8>,
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FieldCipher { .. }")
    }
}

impl FieldCipher {
    /// Build a cipher from a passphrase of any length and the hashing salt.
    ///
    /// The AES key is the SHA-256 digest of `encryption_key`.
    pub fn new(encryption_key: &str, hash_salt: &str) -> Result<Self, CoreError> {
        if encryption_key.is_empty() {
            return Err(CoreError::Internal("field encryption key is empty".into()));
        }
        let key = Sha256::digest(encryption_key.as_bytes());
        let cipher = Aes256Gcm::new_from_slice(key.as_slice())
            .map_err(|e| CoreError::Internal(format!("invalid field encryption key: {e}")))?;
        Ok(Self {
            cipher,
            hash_key: hash_salt.as_bytes().to_vec(),
        })
    }

    /// Seal a plaintext; output is base64 of `nonce || ciphertext || tag`.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CoreError> {
        let mut iv = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut iv);
        let sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
            .map_err(|e| CoreError::Internal(format!("field encryption failed: {e}")))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + sealed.len());
        blob.extend_from_slice(&iv);
        blob.extend_from_slice(&sealed);
        Ok(B64.encode(blob))
    }

    /// Open a blob produced by [`FieldCipher::encrypt`].
    pub fn decrypt(&self, blob: &str) -> Result<String, CoreError> {
        let raw = B64
            .decode(blob.trim())
            .map_err(|_| CoreError::Internal("encrypted field is not valid base64".into()))?;
        if raw.len() <= NONCE_LEN {
            return Err(CoreError::Internal("encrypted field is truncated".into()));
        }
        let (iv, sealed) = raw.split_at(NONCE_LEN);
        let plain = self
            .cipher
            .decrypt(Nonce::from_slice(iv), sealed)
            .map_err(|_| CoreError::Internal("encrypted field failed authentication".into()))?;
        String::from_utf8(plain)
            .map_err(|_| CoreError::Internal("decrypted field is not UTF-8".into()))
    }

    /// Keyed one-way digest, stable across calls for the same input.
    pub fn hash(&self, plaintext: &str) -> String {
        hmac_sha256_hex(&self.hash_key, plaintext.as_bytes())
    }

    /// Encrypt and hash in one step.
    pub fn protect(&self, plaintext: &str) -> Result<ProtectedValue, CoreError> {
        Ok(ProtectedValue {
            encrypted: self.encrypt(plaintext)?,
            hash: self.hash(plaintext),
        })
    }
}

/// Replace all but the last `visible` characters with `X`.
pub fn mask_tail(value: &str, visible: usize) -> String {
    let len = value.chars().count();
    value
        .chars()
        .enumerate()
        .map(|(i, c)| if i + visible < len { 'X' } else { c })
        .collect()
}
