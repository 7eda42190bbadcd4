// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Compliance Verdicts
//!
//! The rule engine's output: per-rule-set pass/fail with every failing
//! predicate and its explanation. A verdict is plain data - never an
//! error, never persisted by this core. The caller decides whether to
//! store it, display it, or embed it in a report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One failing predicate with its explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Name of the predicate that failed
    pub predicate: String,
    /// What is missing or wrong, naming the field where applicable
    pub explanation: String,
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.predicate, self.explanation)
    }
}

/// Result of evaluating one rule set against one resource.
///
/// `compliant` is true only when every blocking predicate passed; partial
/// satisfaction is reported, never rounded up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    /// Name of the rule set evaluated
    pub rule_set: String,

    /// Version of the rule set evaluated
    pub version: String,

    /// Whether every blocking predicate was satisfied
    pub compliant: bool,

    /// Blocking predicates that failed
    pub findings: Vec<Finding>,

    /// Advisory predicates that failed
    pub warnings: Vec<Finding>,

    /// When the evaluation ran
    pub evaluated_at: DateTime<Utc>,
}

impl ComplianceVerdict {
    /// Whether the verdict carries any findings or warnings at all.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty() && self.warnings.is_empty()
    }
}

/// Aggregated result of evaluating every active rule set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceSummary {
    /// True only when every evaluated rule set is compliant
    pub overall_compliant: bool,

    /// Per-rule-set verdicts, in active-set order
    pub verdicts: Vec<ComplianceVerdict>,
}

impl ComplianceSummary {
    /// All blocking findings across rule sets, in evaluation order.
    pub fn all_findings(&self) -> Vec<&Finding> {
        self.verdicts.iter().flat_map(|v| v.findings.iter()).collect()
    }

    /// All advisory warnings across rule sets, in evaluation order.
    pub fn all_warnings(&self) -> Vec<&Finding> {
        self.verdicts.iter().flat_map(|v| v.warnings.iter()).collect()
    }
}
