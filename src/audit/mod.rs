// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Append-only audit trail with tamper evidence and retention metadata.

pub mod entry;
pub mod ledger;
pub mod retention;

pub use entry::{AuditEntry, AuditEvent, AuditOutcome};
pub use ledger::{AuditLedger, AuditQuery, LedgerStore, MemoryStore, SequenceReport};
pub use retention::{RetentionPolicy, RetentionReport, DEFAULT_RETENTION_DAYS};
