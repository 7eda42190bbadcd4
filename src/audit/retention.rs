// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Retention Reporting
//!
//! The ledger never deletes entries itself; archival is an external,
//! administrative process. What the core provides is the retention
//! metadata that process needs: the configured minimum window (7 years by
//! default) and a report of what currently falls inside or outside it.
//! Entries marked `sensitive_access` are never reported as purgeable
//! inside the minimum window, independent of other entries.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::entry::AuditEntry;

/// Default minimum retention window: 7 years.
pub const DEFAULT_RETENTION_DAYS: u32 = 2555;

// =============================================================================
// Retention Policy
// =============================================================================

/// Minimum retention window for audit entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Minimum days an entry must be retained
    pub minimum_days: u32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            minimum_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

impl RetentionPolicy {
    /// Create a policy with the given minimum window.
    pub fn new(minimum_days: u32) -> Self {
        Self { minimum_days }
    }

    /// The cutoff before which entries have satisfied the minimum window.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.minimum_days))
    }

    /// Whether an entry is still inside its minimum retention window.
    pub fn must_retain(&self, entry: &AuditEntry, now: DateTime<Utc>) -> bool {
        entry.timestamp > self.cutoff(now)
    }

    /// Build a report over a trail for the external archival process.
    pub fn report(&self, entries: &[AuditEntry], now: DateTime<Utc>) -> RetentionReport {
        let cutoff = self.cutoff(now);

        let mut within_window = 0u64;
        let mut eligible_for_archival = 0u64;
        let mut sensitive_retained = 0u64;
        let mut earliest_sensitive: Option<DateTime<Utc>> = None;

        for entry in entries {
            if entry.timestamp > cutoff {
                within_window += 1;
            } else {
                eligible_for_archival += 1;
            }
            if entry.sensitive_access {
                if entry.timestamp > cutoff {
                    sensitive_retained += 1;
                }
                earliest_sensitive = match earliest_sensitive {
                    Some(t) if t <= entry.timestamp => Some(t),
                    _ => Some(entry.timestamp),
                };
            }
        }

        RetentionReport {
            minimum_days: self.minimum_days,
            cutoff,
            total: entries.len() as u64,
            within_window,
            eligible_for_archival,
            sensitive_retained,
            earliest_sensitive,
        }
    }
}

// =============================================================================
// Retention Report
// =============================================================================

/// Snapshot handed to the external archival process.
#[derive(Debug, Clone, Serialize)]
pub struct RetentionReport {
    /// Configured minimum window in days
    pub minimum_days: u32,
    /// Entries at or before this time have satisfied the minimum window
    pub cutoff: DateTime<Utc>,
    /// Entries inspected
    pub total: u64,
    /// Entries still inside the minimum window
    pub within_window: u64,
    /// Entries past the minimum window (archival candidates)
    pub eligible_for_archival: u64,
    /// Sensitive-access entries still inside the window (never purgeable)
    pub sensitive_retained: u64,
    /// Timestamp of the oldest sensitive-access entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_sensitive: Option<DateTime<Utc>>,
}

// =============================================================================
// Tests
// =============================================================================
