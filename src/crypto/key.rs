// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Master Key
//!
//! The provider's single symmetric key, supplied by the deployment
//! environment as base64. Key management (HSMs, rotation automation) lives
//! outside this crate; the only generation logic here is a provisioning
//! utility producing a fresh random key of the correct length.

use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;

use crate::error::{SecurityError, SecurityResult};

/// Key length in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// A 256-bit master encryption key.
///
/// `Debug` is redacted; the raw bytes never appear in logs.
#[derive(Clone)]
pub struct MasterKey {
    bytes: [u8; KEY_SIZE],
}

impl MasterKey {
    /// Build a key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Decode a key from its base64 environment encoding.
    pub fn from_base64(encoded: &str) -> SecurityResult<Self> {
        let decoded = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| {
                SecurityError::Configuration(format!("master key is not valid base64: {e}"))
            })?;

        let bytes: [u8; KEY_SIZE] = decoded.try_into().map_err(|v: Vec<u8>| {
            SecurityError::Configuration(format!(
                "master key must be {KEY_SIZE} bytes, got {}",
                v.len()
            ))
        })?;

        Ok(Self { bytes })
    }

    /// Generate a fresh random key for provisioning.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Encode for provisioning output (environment/secret store).
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(self.bytes)
    }

    /// Raw key bytes for cipher construction.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(..redacted..)")
    }
}
