// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Resource Records
//!
//! The rule engine's read-only view of a resource: its recorded
//! attributes, which fields are designated sensitive, consent and
//! retention bookkeeping, and the audit slice the caller fetched for it.
//! The engine never reaches into the ledger or the datastore itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::access::{Classification, ResourceKind};
use crate::audit::AuditEntry;
use crate::crypto::EncryptedPayload;

/// Snapshot of a resource handed to [`crate::compliance::ComplianceEngine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Type of the resource
    pub kind: ResourceKind,

    /// Resource identifier
    pub id: String,

    /// Classification assigned at creation
    pub classification: Classification,

    /// Recorded attributes (open-ended; predicates address fields by
    /// dot notation)
    #[serde(default)]
    pub attributes: Value,

    /// Names of attributes that hold sensitive payloads and must resolve
    /// to encrypted envelopes
    #[serde(default)]
    pub sensitive_fields: Vec<String>,

    /// Whether written consent documentation is on file (42 CFR Part 2)
    #[serde(default)]
    pub consent_documented: bool,

    /// Retention period recorded for the resource, in days
    #[serde(default)]
    pub retention_days: Option<u32>,

    /// Access events recorded elsewhere in the system (the audit-coverage
    /// predicate compares the trail against this count)
    #[serde(default)]
    pub recorded_access_events: u64,

    /// The resource's audit slice, from [`crate::audit::AuditLedger::query`]
    #[serde(default)]
    pub audit_history: Vec<AuditEntry>,
}

impl ResourceRecord {
    /// Create a record with empty attributes.
    pub fn new(
        kind: ResourceKind,
        id: impl Into<String>,
        classification: Classification,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            classification,
            attributes: Value::Null,
            sensitive_fields: Vec::new(),
            consent_documented: false,
            retention_days: None,
            recorded_access_events: 0,
            audit_history: Vec::new(),
        }
    }

    /// Set the recorded attributes.
    pub fn with_attributes(mut self, attributes: Value) -> Self {
        self.attributes = attributes;
        self
    }

    /// Designate an attribute as sensitive.
    pub fn with_sensitive_field(mut self, field: impl Into<String>) -> Self {
        self.sensitive_fields.push(field.into());
        self
    }

    /// Record that written consent documentation is on file.
    pub fn with_consent_documented(mut self) -> Self {
        self.consent_documented = true;
        self
    }

    /// Record the retention period.
    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = Some(days);
        self
    }

    /// Record the externally counted access events.
    pub fn with_recorded_access_events(mut self, count: u64) -> Self {
        self.recorded_access_events = count;
        self
    }

    /// Attach the resource's audit slice.
    pub fn with_audit_history(mut self, history: Vec<AuditEntry>) -> Self {
        self.audit_history = history;
        self
    }

    /// Extract an attribute value, supporting nested fields with dot
    /// notation (`"licensee.license_number"`).
    pub fn attribute(&self, field: &str) -> Option<&Value> {
        field
            .split('.')
            .try_fold(&self.attributes, |v, key| v.get(key))
    }

    /// Whether a sensitive field's stored value resolves to an
    /// [`EncryptedPayload`] envelope rather than plaintext.
    pub fn field_is_encrypted(&self, field: &str) -> bool {
        self.attribute(field)
            .map(|v| serde_json::from_value::<EncryptedPayload>(v.clone()).is_ok())
            .unwrap_or(false)
    }

    /// Count of audit entries carrying the sensitive-access marker.
    pub fn sensitive_audit_entries(&self) -> u64 {
        self.audit_history
            .iter()
            .filter(|e| e.sensitive_access)
            .count() as u64
    }
}
