// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! CaseGuard security core - encryption, access control, audit, compliance
//!
//! This crate is the security & compliance layer of the CaseGuard
//! complaint-intake platform:
//! - Field encryption at rest (AES-256-GCM authenticated encryption)
//! - Deny-by-default role/classification access decisions
//! - An append-only, tamper-evident audit ledger
//! - Multi-framework compliance evaluation (HIPAA, 42 CFR Part 2, ND
//!   records law)
//!
//! It is a library boundary, not a service: the HTTP layer hands it
//! (actor, role, resource, action, classification, payload) and owns
//! everything else.
//!
//! # Example
//!
//! ```rust
//! use caseguard_core::access::{AccessContext, Action, Classification, ResourceKind, Role};
//! use caseguard_core::config::{SecurityConfig, SecurityCore};
//! use caseguard_core::crypto::MasterKey;
//!
//! let config = SecurityConfig {
//!     master_key: Some(MasterKey::generate().to_base64()),
//!     ..Default::default()
//! };
//! let core = SecurityCore::from_config(&config).unwrap();
//!
//! let ctx = AccessContext::new("inv-7", Role::Investigator);
//! let decision = core
//!     .checked_access(
//!         &ctx,
//!         ResourceKind::Complaint,
//!         "COMP-2026-001",
//!         Classification::Confidential,
//!         Action::Read,
//!     )
//!     .unwrap();
//! assert!(decision.is_allowed());
//! ```

pub mod access;
pub mod audit;
pub mod compliance;
pub mod config;
pub mod crypto;
pub mod error;

// Re-export commonly used types at the crate root
pub use access::{AccessContext, AccessEvaluator, Classification, Decision, Role};
pub use audit::{AuditEntry, AuditLedger, AuditQuery};
pub use compliance::{ComplianceEngine, ComplianceVerdict, ResourceRecord};
pub use config::{SecurityConfig, SecurityCore};
pub use crypto::{CryptoProvider, EncryptedPayload, MasterKey};
pub use error::{SecurityError, SecurityResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
