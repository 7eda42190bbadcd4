// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Crypto Provider
//!
//! AES-256-GCM authenticated encryption for sensitive resource fields.
//! Confidentiality and integrity come from the one primitive: any
//! tampering with a stored payload is detected at decrypt time instead of
//! silently producing corrupted plaintext.
//!
//! The provider holds no payload state and never logs plaintext. Callers
//! own the produced [`EncryptedPayload`] envelopes and embed them in their
//! resources.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::key::MasterKey;
use crate::error::{SecurityError, SecurityResult};

/// Nonce length in bytes (96 bits, AES-GCM).
pub const NONCE_SIZE: usize = 12;

// =============================================================================
// Encrypted Payload
// =============================================================================

/// Encrypted field envelope: ciphertext plus the metadata decryption
/// needs. Owned by whichever resource embeds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedPayload {
    /// The encrypted data (authentication tag appended)
    pub ciphertext: Vec<u8>,

    /// Nonce used for encryption (12 bytes)
    pub nonce: Vec<u8>,

    /// Key version the payload was sealed under (for rotation support)
    pub key_version: u32,

    /// Additional authenticated data bound to the payload, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aad: Option<Vec<u8>>,
}

// =============================================================================
// Crypto Provider
// =============================================================================

/// Symmetric authenticated encryption keyed by the configured master key.
pub struct CryptoProvider {
    key: MasterKey,
    key_version: u32,
}

impl CryptoProvider {
    /// Create a provider over the given key.
    pub fn new(key: MasterKey) -> Self {
        Self {
            key,
            key_version: 1,
        }
    }

    /// Create with a specific key version (used after rotation).
    pub fn with_key_version(key: MasterKey, key_version: u32) -> Self {
        Self { key, key_version }
    }

    /// Encrypt a byte payload.
    ///
    /// A fresh random nonce is drawn per call; encrypting the same
    /// plaintext twice never yields the same ciphertext.
    pub fn encrypt(&self, plaintext: &[u8]) -> SecurityResult<EncryptedPayload> {
        self.encrypt_with_aad(plaintext, None)
    }

    /// Encrypt a byte payload binding additional authenticated data.
    ///
    /// The AAD (typically the owning resource id) is authenticated but not
    /// encrypted; decryption fails if an envelope is moved to a record
    /// with different context.
    pub fn encrypt_with_aad(
        &self,
        plaintext: &[u8],
        aad: Option<&[u8]>,
    ) -> SecurityResult<EncryptedPayload> {
        let cipher = Aes256Gcm::new(self.key.as_bytes().into());

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let payload = Payload {
            msg: plaintext,
            aad: aad.unwrap_or(b""),
        };

        let ciphertext = cipher
            .encrypt(nonce, payload)
            .map_err(|e| SecurityError::Integrity(format!("encryption failed: {e}")))?;

        Ok(EncryptedPayload {
            ciphertext,
            nonce: nonce_bytes.to_vec(),
            key_version: self.key_version,
            aad: aad.map(|a| a.to_vec()),
        })
    }

    /// Decrypt an envelope, verifying its authentication tag.
    ///
    /// Tampered ciphertext, a wrong key, or altered AAD all fail with
    /// [`SecurityError::Integrity`]; no partial plaintext is ever
    /// returned.
    pub fn decrypt(&self, payload: &EncryptedPayload) -> SecurityResult<Vec<u8>> {
        if payload.nonce.len() != NONCE_SIZE {
            return Err(SecurityError::Integrity(format!(
                "invalid nonce length: expected {NONCE_SIZE}, got {}",
                payload.nonce.len()
            )));
        }

        let cipher = Aes256Gcm::new(self.key.as_bytes().into());
        let nonce = Nonce::from_slice(&payload.nonce);

        let aead_payload = Payload {
            msg: &payload.ciphertext,
            aad: payload.aad.as_deref().unwrap_or(b""),
        };

        cipher
            .decrypt(nonce, aead_payload)
            .map_err(|_| {
                SecurityError::Integrity(
                    "ciphertext failed authentication; payload is unreadable".to_string(),
                )
            })
    }

    /// Encrypt a string field.
    pub fn encrypt_str(&self, value: &str) -> SecurityResult<EncryptedPayload> {
        self.encrypt(value.as_bytes())
    }

    /// Decrypt a string field, validating UTF-8.
    pub fn decrypt_str(&self, payload: &EncryptedPayload) -> SecurityResult<String> {
        let bytes = self.decrypt(payload)?;
        String::from_utf8(bytes)
            .map_err(|_| SecurityError::Integrity("decrypted field is not valid UTF-8".to_string()))
    }

    /// Key version new envelopes are sealed under.
    pub fn key_version(&self) -> u32 {
        self.key_version
    }
}

// =============================================================================
// Tests
// =============================================================================
