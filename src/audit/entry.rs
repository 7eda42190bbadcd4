// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Audit Entries
//!
//! One immutable record per access attempt. The calling layer builds an
//! [`AuditEvent`] from the access context and decision; the ledger stamps
//! the sequence number and timestamp at append time. Entries are never
//! updated or deleted by the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::access::{
    AccessContext, Action, Classification, Decision, DenyReason, ResourceKind, Role,
};

// =============================================================================
// Outcome
// =============================================================================

/// Recorded outcome of an access attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "UPPERCASE")]
pub enum AuditOutcome {
    /// Access was allowed
    Allow,
    /// Access was denied
    Deny {
        /// Why the attempt was denied
        reason: DenyReason,
    },
}

impl AuditOutcome {
    /// Whether the recorded attempt was allowed.
    pub fn is_allow(&self) -> bool {
        matches!(self, AuditOutcome::Allow)
    }
}

// =============================================================================
// Audit Event (draft)
// =============================================================================

/// A not-yet-appended audit record. Everything except the sequence number
/// and timestamp, which the ledger assigns.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Actor identity
    pub actor: String,
    /// Role at the time of the action
    pub role: Role,
    /// Requested action
    pub action: Action,
    /// Type of the target resource
    pub resource_kind: ResourceKind,
    /// Identifier of the target resource
    pub resource_id: String,
    /// Classification of the target resource
    pub classification: Classification,
    /// Recorded outcome
    pub outcome: AuditOutcome,
    /// Origin network address
    pub origin: Option<String>,
    /// Client identifier
    pub client: Option<String>,
    /// Contextual metadata
    pub detail: HashMap<String, serde_json::Value>,
}

impl AuditEvent {
    /// Build an event from a decision and the context it was made in.
    ///
    /// This is the normal path for the calling layer: authorize, then
    /// record exactly what came back.
    pub fn from_decision(
        ctx: &AccessContext,
        resource_kind: ResourceKind,
        resource_id: impl Into<String>,
        decision: &Decision,
    ) -> Self {
        let (action, classification, outcome) = match decision {
            Decision::Allow {
                action,
                classification,
                ..
            } => (*action, *classification, AuditOutcome::Allow),
            Decision::Deny {
                action,
                classification,
                reason,
                ..
            } => (
                *action,
                *classification,
                AuditOutcome::Deny { reason: *reason },
            ),
        };

        Self {
            actor: ctx.actor.clone(),
            role: ctx.role,
            action,
            resource_kind,
            resource_id: resource_id.into(),
            classification,
            outcome,
            origin: ctx.origin.clone(),
            client: ctx.client.clone(),
            detail: HashMap::new(),
        }
    }

    /// Attach a metadata value.
    pub fn with_detail(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.detail.insert(key.into(), value);
        self
    }
}

// =============================================================================
// Audit Entry
// =============================================================================

/// An appended, immutable audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Append sequence number; strictly monotonic and gap-free from 1
    pub sequence: u64,

    /// UTC timestamp assigned at append
    pub timestamp: DateTime<Utc>,

    /// Actor identity
    pub actor: String,

    /// Role at the time of the action
    pub role: Role,

    /// Requested action
    pub action: Action,

    /// Type of the target resource
    pub resource_kind: ResourceKind,

    /// Identifier of the target resource
    pub resource_id: String,

    /// Classification of the target resource
    pub classification: Classification,

    /// Recorded outcome
    #[serde(flatten)]
    pub outcome: AuditOutcome,

    /// Marker for PHI/CFR2 entries; retention reporting never counts a
    /// marked entry as purgeable inside the minimum window
    pub sensitive_access: bool,

    /// Origin network address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Client identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    /// Contextual metadata
    #[serde(default)]
    pub detail: HashMap<String, serde_json::Value>,
}

impl AuditEntry {
    /// Stamp a draft event into an entry. Called by the ledger only.
    pub(crate) fn stamp(event: AuditEvent, sequence: u64, timestamp: DateTime<Utc>) -> Self {
        let sensitive_access = event.classification.is_specially_tracked();
        Self {
            sequence,
            timestamp,
            actor: event.actor,
            role: event.role,
            action: event.action,
            resource_kind: event.resource_kind,
            resource_id: event.resource_id,
            classification: event.classification,
            outcome: event.outcome,
            sensitive_access,
            origin: event.origin,
            client: event.client,
            detail: event.detail,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
