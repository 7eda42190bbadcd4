// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Compliance Rule Engine
//!
//! Evaluates a resource against named rule sets and produces verdicts.
//! Every predicate in a set runs - evaluation never short-circuits, so a
//! verdict reports every failing rule, not just the first. The engine is
//! read-only with respect to the resource and ledger; running it twice is
//! always safe.

use chrono::Utc;
use tracing::{debug, info};

use super::registry::{RuleSet, RuleSetRegistry};
use super::resource::ResourceRecord;
use super::rule::Severity;
use super::verdict::{ComplianceSummary, ComplianceVerdict, Finding};
use crate::error::{SecurityError, SecurityResult};

/// Compliance rule engine over a registry of frameworks.
#[derive(Debug, Clone)]
pub struct ComplianceEngine {
    registry: RuleSetRegistry,
    active: Vec<String>,
}

impl ComplianceEngine {
    /// Create an engine with every registered rule set active.
    pub fn new(registry: RuleSetRegistry) -> Self {
        let active = registry.names().iter().map(|s| s.to_string()).collect();
        Self { registry, active }
    }

    /// Create an engine activating only the named rule sets.
    ///
    /// Fails with [`SecurityError::UnknownRuleSet`] if a name is not
    /// registered - a configuration problem caught at startup, not at
    /// evaluation time.
    pub fn with_active(registry: RuleSetRegistry, active: Vec<String>) -> SecurityResult<Self> {
        for name in &active {
            if registry.get(name).is_none() {
                return Err(SecurityError::UnknownRuleSet(name.clone()));
            }
        }
        Ok(Self { registry, active })
    }

    /// Evaluate a resource against one named rule set.
    ///
    /// Returns `Ok` with a verdict whatever the compliance outcome;
    /// non-compliance is data, not an error.
    pub fn evaluate(
        &self,
        resource: &ResourceRecord,
        rule_set: &str,
    ) -> SecurityResult<ComplianceVerdict> {
        let set = self
            .registry
            .get(rule_set)
            .ok_or_else(|| SecurityError::UnknownRuleSet(rule_set.to_string()))?;
        Ok(self.run_set(resource, set))
    }

    /// Evaluate a resource against every active rule set that covers its
    /// classification and kind.
    pub fn evaluate_all(&self, resource: &ResourceRecord) -> ComplianceSummary {
        let mut verdicts = Vec::new();
        for name in &self.active {
            let set = match self.registry.get(name) {
                Some(set) => set,
                None => continue,
            };
            if !set.covers(resource.classification, resource.kind) {
                debug!(
                    rule_set = %name,
                    resource = %resource.id,
                    "Rule set does not cover resource; skipping"
                );
                continue;
            }
            verdicts.push(self.run_set(resource, set));
        }

        let overall_compliant = verdicts.iter().all(|v| v.compliant);
        ComplianceSummary {
            overall_compliant,
            verdicts,
        }
    }

    /// Names of the active rule sets.
    pub fn active_rule_sets(&self) -> &[String] {
        &self.active
    }

    /// The underlying registry.
    pub fn registry(&self) -> &RuleSetRegistry {
        &self.registry
    }

    fn run_set(&self, resource: &ResourceRecord, set: &RuleSet) -> ComplianceVerdict {
        let mut findings: Vec<Finding> = Vec::new();
        let mut warnings: Vec<Finding> = Vec::new();

        // All predicates run; a failure never stops the rest.
        for predicate in &set.predicates {
            if let Err(finding) = predicate.evaluate(resource) {
                match predicate.severity {
                    Severity::Blocking => findings.push(finding),
                    Severity::Advisory => warnings.push(finding),
                }
            }
        }

        let compliant = findings.is_empty();
        info!(
            rule_set = %set.name,
            resource = %resource.id,
            compliant,
            findings = findings.len(),
            warnings = warnings.len(),
            "Compliance evaluation complete"
        );

        ComplianceVerdict {
            rule_set: set.name.clone(),
            version: set.version.clone(),
            compliant,
            findings,
            warnings,
            evaluated_at: Utc::now(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
