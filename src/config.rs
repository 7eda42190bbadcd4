// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Configuration and core assembly.
//!
//! All configuration is externalized to environment variables with a
//! `CASEGUARD_` prefix:
//! - `CASEGUARD_MASTER_KEY`: base64 master encryption key (required)
//! - `CASEGUARD_RETENTION_DAYS`: minimum audit retention (default: 2555)
//! - `CASEGUARD_RULE_SETS`: active frameworks (default: HIPAA,CFR2,STATE_ND)
//!
//! [`SecurityCore::from_config`] fails fast: a missing or malformed key
//! and an incomplete permission matrix are startup faults, never request
//! time surprises.

use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::access::{
    AccessContext, AccessEvaluator, Action, Classification, Decision, PermissionMatrix,
    ResourceKind,
};
use crate::audit::{
    AuditEvent, AuditLedger, AuditQuery, LedgerStore, RetentionPolicy, RetentionReport,
    DEFAULT_RETENTION_DAYS,
};
use crate::compliance::{
    ComplianceEngine, ComplianceSummary, ComplianceVerdict, ResourceRecord, RuleSetRegistry,
};
use crate::crypto::{CryptoProvider, MasterKey};
use crate::error::{SecurityError, SecurityResult};

// =============================================================================
// Configuration
// =============================================================================

/// Environment-provided configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct SecurityConfig {
    /// Base64-encoded master encryption key
    #[serde(default)]
    pub master_key: Option<String>,

    /// Minimum audit retention in days (default: 2555, seven years)
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// Comma-separated active rule-set names
    #[serde(default = "default_rule_sets")]
    pub rule_sets: String,
}

fn default_retention_days() -> u32 {
    DEFAULT_RETENTION_DAYS
}

fn default_rule_sets() -> String {
    "HIPAA,CFR2,STATE_ND".to_string()
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            master_key: None,
            retention_days: default_retention_days(),
            rule_sets: default_rule_sets(),
        }
    }
}

impl SecurityConfig {
    /// Load configuration from `CASEGUARD_`-prefixed environment
    /// variables.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("CASEGUARD_").from_env()
    }

    /// Active rule-set names, parsed from the comma list.
    pub fn active_rule_sets(&self) -> Vec<String> {
        self.rule_sets
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

// =============================================================================
// Security Core
// =============================================================================

/// The assembled security layer: crypto provider, access evaluator,
/// audit ledger, and compliance engine behind one startup-validated
/// boundary.
pub struct SecurityCore {
    /// Field encryption at rest
    pub crypto: CryptoProvider,
    /// Access decisions
    pub evaluator: AccessEvaluator,
    /// Append-only audit trail
    pub ledger: AuditLedger,
    /// Regulatory evaluation
    pub engine: ComplianceEngine,
    /// Retention window for audit entries
    pub retention: RetentionPolicy,
}

impl std::fmt::Debug for SecurityCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityCore")
            .field("retention", &self.retention)
            .finish_non_exhaustive()
    }
}

impl SecurityCore {
    /// Assemble from configuration, using the board's production matrix
    /// and an in-memory ledger store.
    pub fn from_config(config: &SecurityConfig) -> SecurityResult<Self> {
        Self::assemble(config, PermissionMatrix::board_default(), None)
    }

    /// Assemble with a durable ledger store supplied by the deployment.
    pub fn with_store(
        config: &SecurityConfig,
        store: Arc<dyn LedgerStore>,
    ) -> SecurityResult<Self> {
        Self::assemble(config, PermissionMatrix::board_default(), Some(store))
    }

    /// Assemble with an explicit matrix (tests substitute alternates).
    pub fn with_matrix(
        config: &SecurityConfig,
        matrix: PermissionMatrix,
    ) -> SecurityResult<Self> {
        Self::assemble(config, matrix, None)
    }

    fn assemble(
        config: &SecurityConfig,
        matrix: PermissionMatrix,
        store: Option<Arc<dyn LedgerStore>>,
    ) -> SecurityResult<Self> {
        let encoded = config.master_key.as_deref().ok_or_else(|| {
            SecurityError::Configuration("no master encryption key configured".to_string())
        })?;
        let key = MasterKey::from_base64(encoded)?;

        matrix.validate()?;

        let ledger = match store {
            Some(store) => AuditLedger::new(store)?,
            None => AuditLedger::in_memory(),
        };

        let engine = ComplianceEngine::with_active(
            RuleSetRegistry::with_defaults(),
            config.active_rule_sets(),
        )
        .map_err(|e| match e {
            SecurityError::UnknownRuleSet(name) => SecurityError::Configuration(format!(
                "CASEGUARD_RULE_SETS names unregistered rule set '{name}'"
            )),
            other => other,
        })?;

        info!(
            retention_days = config.retention_days,
            rule_sets = %config.rule_sets,
            "Security core assembled"
        );

        Ok(Self {
            crypto: CryptoProvider::new(key),
            evaluator: AccessEvaluator::new(matrix),
            ledger,
            engine,
            retention: RetentionPolicy::new(config.retention_days),
        })
    }

    /// Authorize an access attempt and append the decision in one step.
    ///
    /// This is the contract every request handler owes the audit trail:
    /// the decision is appended whatever its outcome, and a ledger write
    /// failure aborts the request before it can proceed unaudited.
    pub fn checked_access(
        &self,
        ctx: &AccessContext,
        kind: ResourceKind,
        resource_id: &str,
        classification: Classification,
        action: Action,
    ) -> SecurityResult<Decision> {
        let decision = self.evaluator.authorize(ctx, classification, action);
        let event = AuditEvent::from_decision(ctx, kind, resource_id, &decision);
        self.ledger.append(event)?;
        Ok(decision)
    }

    /// Evaluate one rule set after attaching the resource's audit slice
    /// from the ledger.
    pub fn evaluate_with_trail(
        &self,
        record: ResourceRecord,
        rule_set: &str,
    ) -> SecurityResult<ComplianceVerdict> {
        let record = self.attach_trail(record)?;
        self.engine.evaluate(&record, rule_set)
    }

    /// Evaluate every active rule set after attaching the resource's
    /// audit slice from the ledger.
    pub fn evaluate_all_with_trail(
        &self,
        record: ResourceRecord,
    ) -> SecurityResult<ComplianceSummary> {
        let record = self.attach_trail(record)?;
        Ok(self.engine.evaluate_all(&record))
    }

    fn attach_trail(&self, record: ResourceRecord) -> SecurityResult<ResourceRecord> {
        let history = self
            .ledger
            .query(&AuditQuery::all().for_resource(record.kind, record.id.clone()))?;
        Ok(record.with_audit_history(history))
    }

    /// Retention snapshot over the full trail, for the external archival
    /// process.
    pub fn retention_report(&self) -> SecurityResult<RetentionReport> {
        let entries = self.ledger.query(&AuditQuery::all())?;
        Ok(self.retention.report(&entries, chrono::Utc::now()))
    }
}

// =============================================================================
// Tests
// =============================================================================
