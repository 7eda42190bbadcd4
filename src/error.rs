// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Error taxonomy for the security core.
//!
//! Access denials and non-compliant verdicts are NOT errors: `Deny` is an
//! ordinary arm of [`crate::access::Decision`], and a failing
//! [`crate::compliance::ComplianceVerdict`] is plain data returned to the
//! caller. Only configuration faults, ciphertext integrity failures, and
//! ledger write faults surface here.

use thiserror::Error;

/// Result type for security-core operations.
pub type SecurityResult<T> = Result<T, SecurityError>;

/// Hard failures raised by the security core.
#[derive(Debug, Error, Clone)]
pub enum SecurityError {
    /// Missing or malformed configuration (bad master key, incomplete
    /// permission matrix). Fatal at startup, never recovered per request.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Ciphertext failed authentication. The resource is unreadable;
    /// no partial plaintext is ever returned.
    #[error("Integrity check failed: {0}")]
    Integrity(String),

    /// The underlying store rejected an audit append. The enclosing
    /// request must abort: an unaudited privileged action is itself a
    /// compliance breach.
    #[error("Audit ledger write failed: {0}")]
    LedgerWrite(String),

    /// Evaluation requested against a rule set that is not registered.
    #[error("Unknown rule set: {0}")]
    UnknownRuleSet(String),
}
