// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Audit Ledger
//!
//! Append-only, ordered record of every access decision. The public
//! contract has no modify or remove operation; sequence numbers are
//! assigned under a single write lock so they are strictly monotonic and
//! gap-free under concurrent load - gaps in a stored trail are tamper
//! evidence, not bookkeeping noise.

use chrono::Utc;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

use super::entry::{AuditEntry, AuditEvent};
use crate::access::{Classification, ResourceKind};
use crate::error::{SecurityError, SecurityResult};

// =============================================================================
// Ledger Store
// =============================================================================

/// The opaque record store the ledger is handed.
///
/// Implementations persist entries exactly as given and return them in
/// append order. The ledger owns sequencing; stores own durability.
pub trait LedgerStore: Send + Sync {
    /// Persist one entry. An error here fails the enclosing `append`.
    fn persist(&self, entry: &AuditEntry) -> SecurityResult<()>;

    /// Load all entries in append order.
    fn load(&self) -> SecurityResult<Vec<AuditEntry>>;
}

/// In-memory store. The default for tests and single-process deployments;
/// durable datastores implement [`LedgerStore`] at the deployment
/// boundary.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<Vec<AuditEntry>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryStore {
    fn persist(&self, entry: &AuditEntry) -> SecurityResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| SecurityError::LedgerWrite("store lock poisoned".to_string()))?;
        entries.push(entry.clone());
        Ok(())
    }

    fn load(&self) -> SecurityResult<Vec<AuditEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| SecurityError::LedgerWrite("store lock poisoned".to_string()))?;
        Ok(entries.clone())
    }
}

// =============================================================================
// Query
// =============================================================================

/// Filters for ledger retrieval. Unset fields match everything; results
/// come back in append order.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    /// Filter by actor identity
    pub actor: Option<String>,
    /// Filter by resource kind
    pub resource_kind: Option<ResourceKind>,
    /// Filter by resource identifier
    pub resource_id: Option<String>,
    /// Filter by classification
    pub classification: Option<Classification>,
    /// Keep only allowed (`true`) or denied (`false`) entries
    pub allowed: Option<bool>,
    /// Keep entries at or after this time
    pub from: Option<chrono::DateTime<Utc>>,
    /// Keep entries at or before this time
    pub to: Option<chrono::DateTime<Utc>>,
}

impl AuditQuery {
    /// Match everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter by actor.
    pub fn for_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Filter by resource.
    pub fn for_resource(mut self, kind: ResourceKind, id: impl Into<String>) -> Self {
        self.resource_kind = Some(kind);
        self.resource_id = Some(id.into());
        self
    }

    /// Filter by classification.
    pub fn for_classification(mut self, classification: Classification) -> Self {
        self.classification = Some(classification);
        self
    }

    /// Keep only allowed or denied entries.
    pub fn with_outcome(mut self, allowed: bool) -> Self {
        self.allowed = Some(allowed);
        self
    }

    /// Keep entries within a time range (inclusive).
    pub fn in_range(
        mut self,
        from: chrono::DateTime<Utc>,
        to: chrono::DateTime<Utc>,
    ) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(ref actor) = self.actor {
            if &entry.actor != actor {
                return false;
            }
        }
        if let Some(kind) = self.resource_kind {
            if entry.resource_kind != kind {
                return false;
            }
        }
        if let Some(ref id) = self.resource_id {
            if &entry.resource_id != id {
                return false;
            }
        }
        if let Some(classification) = self.classification {
            if entry.classification != classification {
                return false;
            }
        }
        if let Some(allowed) = self.allowed {
            if entry.outcome.is_allow() != allowed {
                return false;
            }
        }
        if let Some(from) = self.from {
            if entry.timestamp < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if entry.timestamp > to {
                return false;
            }
        }
        true
    }
}

// =============================================================================
// Sequence Report
// =============================================================================

/// Result of a tamper-evidence scan over the stored trail.
#[derive(Debug, Clone, Serialize)]
pub struct SequenceReport {
    /// Entries inspected
    pub total: u64,
    /// Highest sequence number seen
    pub highest_sequence: u64,
    /// Sequence numbers missing from 1..=highest
    pub gaps: Vec<u64>,
    /// Sequence numbers appearing more than once
    pub duplicates: Vec<u64>,
}

impl SequenceReport {
    /// Whether the trail shows no tamper evidence.
    pub fn is_intact(&self) -> bool {
        self.gaps.is_empty() && self.duplicates.is_empty()
    }
}

// =============================================================================
// Audit Ledger
// =============================================================================

/// Append-only audit trail over an opaque store.
pub struct AuditLedger {
    store: Arc<dyn LedgerStore>,
    // Serialization point: sequence assignment and persist happen under
    // this lock so concurrent appends stay gap-free.
    next_sequence: RwLock<u64>,
}

impl AuditLedger {
    /// Create a ledger over the given store, continuing from the store's
    /// highest stored sequence.
    pub fn new(store: Arc<dyn LedgerStore>) -> SecurityResult<Self> {
        let highest = store
            .load()?
            .iter()
            .map(|e| e.sequence)
            .max()
            .unwrap_or(0);
        Ok(Self {
            store,
            next_sequence: RwLock::new(highest + 1),
        })
    }

    /// Create a ledger over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            next_sequence: RwLock::new(1),
        }
    }

    /// Append one audit event, returning its assigned sequence number.
    ///
    /// There is no silent drop path: a store fault surfaces as
    /// [`SecurityError::LedgerWrite`] and the enclosing request must
    /// abort. The sequence is not advanced on failure, so a successful
    /// retry leaves no gap - but `append` must not be retried blindly
    /// after an ambiguous fault; [`AuditLedger::query`] first to check
    /// whether the entry landed.
    pub fn append(&self, event: AuditEvent) -> SecurityResult<u64> {
        let mut next = self
            .next_sequence
            .write()
            .map_err(|_| SecurityError::LedgerWrite("ledger lock poisoned".to_string()))?;

        let sequence = *next;
        let entry = AuditEntry::stamp(event, sequence, Utc::now());

        if let Err(e) = self.store.persist(&entry) {
            warn!(sequence, error = %e, "Audit append failed; request must abort");
            return Err(e);
        }

        *next = sequence + 1;
        debug!(
            sequence,
            actor = %entry.actor,
            action = %entry.action,
            resource = %entry.resource_id,
            outcome = ?entry.outcome,
            "Audit entry appended"
        );
        Ok(sequence)
    }

    /// Retrieve entries matching the query, in append order.
    pub fn query(&self, query: &AuditQuery) -> SecurityResult<Vec<AuditEntry>> {
        let entries = self.store.load()?;
        Ok(entries.into_iter().filter(|e| query.matches(e)).collect())
    }

    /// Whether a classification requires dense audit coverage (every
    /// read present, not just mutations).
    pub fn is_specially_tracked(&self, classification: Classification) -> bool {
        classification.is_specially_tracked()
    }

    /// Scan the stored trail for sequence gaps and duplicates.
    pub fn verify_sequence(&self) -> SecurityResult<SequenceReport> {
        let entries = self.store.load()?;
        let highest = entries.iter().map(|e| e.sequence).max().unwrap_or(0);

        let mut counts = vec![0u32; highest as usize + 1];
        for entry in &entries {
            counts[entry.sequence as usize] += 1;
        }

        let gaps: Vec<u64> = (1..=highest).filter(|s| counts[*s as usize] == 0).collect();
        let duplicates: Vec<u64> = (1..=highest)
            .filter(|s| counts[*s as usize] > 1)
            .collect();

        Ok(SequenceReport {
            total: entries.len() as u64,
            highest_sequence: highest,
            gaps,
            duplicates,
        })
    }

    /// Count of entries carrying the sensitive-access marker.
    pub fn sensitive_entry_count(&self) -> SecurityResult<u64> {
        let entries = self.store.load()?;
        Ok(entries.iter().filter(|e| e.sensitive_access).count() as u64)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{AccessContext, Action, DenyReason, Role};
    use crate::audit::entry::AuditOutcome;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    fn make_event(actor: &str, classification: Classification) -> AuditEvent {
        AuditEvent {
            actor: actor.to_string(),
            role: Role::Investigator,
            action: Action::Read,
            resource_kind: ResourceKind::Complaint,
            resource_id: "COMP-2026-001".to_string(),
            classification,
            outcome: AuditOutcome::Allow,
            origin: Some("10.0.0.9".to_string()),
            client: None,
            detail: Default::default(),
        }
    }

    #[test]
    fn test_append_assigns_sequences_from_one() {
        let ledger = AuditLedger::in_memory();

        let a = ledger.append(make_event("u1", Classification::Confidential)).unwrap();
        let b = ledger.append(make_event("u2", Classification::Confidential)).unwrap();
        let c = ledger.append(make_event("u3", Classification::Phi)).unwrap();

        assert_eq!((a, b, c), (1, 2, 3));
    }

    #[test]
    fn test_query_preserves_append_order() {
        let ledger = AuditLedger::in_memory();
        for i in 0..5 {
            ledger
                .append(make_event(&format!("actor-{i}"), Classification::Confidential))
                .unwrap();
        }

        let entries = ledger.query(&AuditQuery::all()).unwrap();
        let sequences: Vec<u64> = entries.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_query_filters() {
        let ledger = AuditLedger::in_memory();
        ledger.append(make_event("alice", Classification::Phi)).unwrap();
        ledger.append(make_event("bob", Classification::Confidential)).unwrap();
        ledger.append(make_event("alice", Classification::Cfr2)).unwrap();

        let alice = ledger
            .query(&AuditQuery::all().for_actor("alice"))
            .unwrap();
        assert_eq!(alice.len(), 2);

        let cfr2 = ledger
            .query(&AuditQuery::all().for_classification(Classification::Cfr2))
            .unwrap();
        assert_eq!(cfr2.len(), 1);
        assert_eq!(cfr2[0].actor, "alice");

        let by_resource = ledger
            .query(&AuditQuery::all().for_resource(ResourceKind::Complaint, "COMP-2026-001"))
            .unwrap();
        assert_eq!(by_resource.len(), 3);
    }

    #[test]
    fn test_query_by_outcome() {
        let ledger = AuditLedger::in_memory();
        ledger.append(make_event("alice", Classification::Phi)).unwrap();

        let mut denied = make_event("mallory", Classification::Cfr2);
        denied.outcome = AuditOutcome::Deny {
            reason: DenyReason::ClassificationExceeded,
        };
        ledger.append(denied).unwrap();

        let denies = ledger
            .query(&AuditQuery::all().with_outcome(false))
            .unwrap();
        assert_eq!(denies.len(), 1);
        assert_eq!(denies[0].actor, "mallory");
        assert!(denies[0].sensitive_access);
    }

    #[test]
    fn test_concurrent_appends_are_gap_free() {
        let ledger = Arc::new(AuditLedger::in_memory());
        let threads = 8;
        let per_thread = 25;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for i in 0..per_thread {
                        ledger
                            .append(make_event(
                                &format!("t{t}-{i}"),
                                Classification::Confidential,
                            ))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let report = ledger.verify_sequence().unwrap();
        assert_eq!(report.total, (threads * per_thread) as u64);
        assert_eq!(report.highest_sequence, (threads * per_thread) as u64);
        assert!(report.is_intact(), "gaps: {:?}", report.gaps);
    }

    #[test]
    fn test_store_fault_fails_append_without_gap() {
        struct FlakyStore {
            inner: MemoryStore,
            fail_next: AtomicBool,
        }
        impl LedgerStore for FlakyStore {
            fn persist(&self, entry: &AuditEntry) -> SecurityResult<()> {
                if self.fail_next.swap(false, Ordering::SeqCst) {
                    return Err(SecurityError::LedgerWrite("store offline".to_string()));
                }
                self.inner.persist(entry)
            }
            fn load(&self) -> SecurityResult<Vec<AuditEntry>> {
                self.inner.load()
            }
        }

        let store = Arc::new(FlakyStore {
            inner: MemoryStore::new(),
            fail_next: AtomicBool::new(false),
        });
        let ledger = AuditLedger::new(store.clone()).unwrap();

        ledger.append(make_event("u1", Classification::Phi)).unwrap();

        store.fail_next.store(true, Ordering::SeqCst);
        let result = ledger.append(make_event("u2", Classification::Phi));
        assert!(matches!(result, Err(SecurityError::LedgerWrite(_))));

        // Store recovered; the retried append reuses the sequence.
        let seq = ledger.append(make_event("u2", Classification::Phi)).unwrap();
        assert_eq!(seq, 2);
        assert!(ledger.verify_sequence().unwrap().is_intact());
    }

    #[test]
    fn test_ledger_resumes_from_stored_sequence() {
        let store = Arc::new(MemoryStore::new());
        {
            let ledger = AuditLedger::new(store.clone()).unwrap();
            ledger.append(make_event("u1", Classification::Confidential)).unwrap();
            ledger.append(make_event("u2", Classification::Confidential)).unwrap();
        }

        let ledger = AuditLedger::new(store).unwrap();
        let seq = ledger.append(make_event("u3", Classification::Confidential)).unwrap();
        assert_eq!(seq, 3);
    }

    #[test]
    fn test_verify_sequence_detects_tampering() {
        // Simulate an operator deleting a row behind the ledger's back.
        struct LeakyStore(MemoryStore);
        impl LedgerStore for LeakyStore {
            fn persist(&self, entry: &AuditEntry) -> SecurityResult<()> {
                self.0.persist(entry)
            }
            fn load(&self) -> SecurityResult<Vec<AuditEntry>> {
                let mut entries = self.0.load()?;
                entries.retain(|e| e.sequence != 2);
                Ok(entries)
            }
        }

        let ledger = AuditLedger::new(Arc::new(LeakyStore(MemoryStore::new()))).unwrap();
        for i in 0..3 {
            ledger
                .append(make_event(&format!("u{i}"), Classification::Confidential))
                .unwrap();
        }

        let report = ledger.verify_sequence().unwrap();
        assert!(!report.is_intact());
        assert_eq!(report.gaps, vec![2]);
    }

    #[test]
    fn test_sensitive_entry_count() {
        let ledger = AuditLedger::in_memory();
        ledger.append(make_event("u1", Classification::Phi)).unwrap();
        ledger.append(make_event("u2", Classification::Confidential)).unwrap();
        ledger.append(make_event("u3", Classification::Cfr2)).unwrap();

        assert_eq!(ledger.sensitive_entry_count().unwrap(), 2);
    }

    #[test]
    fn test_specially_tracked_delegates_to_classification() {
        let ledger = AuditLedger::in_memory();
        assert!(ledger.is_specially_tracked(Classification::Phi));
        assert!(ledger.is_specially_tracked(Classification::Cfr2));
        assert!(!ledger.is_specially_tracked(Classification::Restricted));
    }

    #[test]
    fn test_decision_to_entry_flow() {
        use crate::access::{AccessEvaluator, PermissionMatrix};

        let evaluator = AccessEvaluator::new(PermissionMatrix::board_default());
        let ledger = AuditLedger::in_memory();
        let ctx = AccessContext::new("viewer-9", Role::ReadOnly).with_origin("10.3.0.4");

        let decision = evaluator.authorize(&ctx, Classification::Cfr2, Action::Update);
        let event = AuditEvent::from_decision(&ctx, ResourceKind::Complaint, "COMP-5", &decision);
        ledger.append(event).unwrap();

        let entries = ledger.query(&AuditQuery::all().with_outcome(false)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].classification, Classification::Cfr2);
        assert!(entries[0].sensitive_access);
        assert_eq!(
            entries[0].outcome,
            AuditOutcome::Deny {
                reason: DenyReason::ActionNotPermitted
            }
        );
    }
}
