// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Rule-Set Registry
//!
//! Named, versioned collections of compliance predicates, one per
//! regulatory framework. Adding a framework means registering a rule set
//! here - not branching on classifications elsewhere in the code. Built-in
//! sets cover HIPAA, 42 CFR Part 2, and North Dakota records law;
//! deployments extend them declaratively from YAML.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::rule::{Check, Predicate, Severity};
use crate::access::{Classification, ResourceKind};
use crate::audit::DEFAULT_RETENTION_DAYS;

// =============================================================================
// Rule Set
// =============================================================================

/// A named, versioned collection of independent compliance predicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    /// Framework name ("HIPAA", "CFR2", "STATE_ND", ...)
    pub name: String,

    /// Rule-set version, carried into verdicts
    pub version: String,

    /// Classifications this set applies to; empty means all
    #[serde(default)]
    pub applies_to: Vec<Classification>,

    /// Resource kinds this set applies to; empty means all
    #[serde(default)]
    pub kinds: Vec<ResourceKind>,

    /// Ordered predicates; evaluation never short-circuits
    pub predicates: Vec<Predicate>,
}

impl RuleSet {
    /// Whether this set applies to a resource of the given classification
    /// and kind.
    pub fn covers(&self, classification: Classification, kind: ResourceKind) -> bool {
        let classification_ok =
            self.applies_to.is_empty() || self.applies_to.contains(&classification);
        let kind_ok = self.kinds.is_empty() || self.kinds.contains(&kind);
        classification_ok && kind_ok
    }
}

// =============================================================================
// Built-in frameworks
// =============================================================================

/// HIPAA technical-safeguard predicates for PHI resources.
pub fn hipaa() -> RuleSet {
    RuleSet {
        name: "HIPAA".to_string(),
        version: "1.1".to_string(),
        applies_to: vec![Classification::Phi, Classification::Cfr2],
        kinds: vec![],
        predicates: vec![
            Predicate {
                name: "classification-assigned".to_string(),
                check: Check::ClassificationAssigned,
                severity: Severity::Blocking,
                message: "PHI must carry a protected classification".to_string(),
            },
            Predicate {
                name: "encryption-applied".to_string(),
                check: Check::EncryptionApplied,
                severity: Severity::Blocking,
                message: "PHI must be encrypted at rest".to_string(),
            },
            Predicate {
                name: "audit-coverage".to_string(),
                check: Check::AuditCoverage,
                severity: Severity::Blocking,
                message: "Every PHI access must appear in the audit trail".to_string(),
            },
            Predicate {
                name: "retention-recorded".to_string(),
                check: Check::RetentionRecorded,
                severity: Severity::Blocking,
                message: "PHI records must carry a retention period".to_string(),
            },
        ],
    }
}

/// 42 CFR Part 2 predicates for substance-use-disorder records.
pub fn cfr2() -> RuleSet {
    RuleSet {
        name: "CFR2".to_string(),
        version: "1.0".to_string(),
        applies_to: vec![Classification::Cfr2],
        kinds: vec![],
        predicates: vec![
            Predicate {
                name: "classification-assigned".to_string(),
                check: Check::ClassificationAssigned,
                severity: Severity::Blocking,
                message: "Part 2 records must carry a protected classification".to_string(),
            },
            Predicate {
                name: "encryption-applied".to_string(),
                check: Check::EncryptionApplied,
                severity: Severity::Blocking,
                message: "Part 2 records must be encrypted at rest".to_string(),
            },
            Predicate {
                name: "consent-documented".to_string(),
                check: Check::ConsentDocumented,
                severity: Severity::Blocking,
                message: "Part 2 disclosures require written consent".to_string(),
            },
            Predicate {
                name: "audit-coverage".to_string(),
                check: Check::AuditCoverage,
                severity: Severity::Blocking,
                message: "Every Part 2 access, reads included, must appear in the audit trail"
                    .to_string(),
            },
        ],
    }
}

/// North Dakota records-law predicates for complaint records.
pub fn state_nd() -> RuleSet {
    RuleSet {
        name: "STATE_ND".to_string(),
        version: "1.2".to_string(),
        applies_to: vec![],
        kinds: vec![ResourceKind::Complaint],
        predicates: vec![
            Predicate {
                name: "complaint-number-required".to_string(),
                check: Check::FieldRequired {
                    field: "complaint_number".to_string(),
                },
                severity: Severity::Blocking,
                message: "Complaints must carry a complaint number".to_string(),
            },
            Predicate {
                name: "licensee-name-required".to_string(),
                check: Check::FieldRequired {
                    field: "licensee_name".to_string(),
                },
                severity: Severity::Blocking,
                message: "Complaints must identify the licensee".to_string(),
            },
            Predicate {
                name: "license-number-required".to_string(),
                check: Check::FieldRequired {
                    field: "licensee_license_number".to_string(),
                },
                severity: Severity::Blocking,
                message: "Complaints must carry the licensee's license number".to_string(),
            },
            Predicate {
                name: "description-required".to_string(),
                check: Check::FieldRequired {
                    field: "complaint_description".to_string(),
                },
                severity: Severity::Blocking,
                message: "Complaints must describe the alleged conduct".to_string(),
            },
            Predicate {
                name: "license-number-format".to_string(),
                check: Check::FieldMatches {
                    field: "licensee_license_number".to_string(),
                    pattern: "^ND-[0-9]+$".to_string(),
                },
                severity: Severity::Advisory,
                message: "License numbers follow the ND board format".to_string(),
            },
            Predicate {
                name: "retention-recorded".to_string(),
                check: Check::RetentionRecorded,
                severity: Severity::Blocking,
                message: "Complaint records must carry a retention period".to_string(),
            },
            Predicate {
                name: "retention-minimum".to_string(),
                check: Check::RetentionAtLeast {
                    days: DEFAULT_RETENTION_DAYS,
                },
                severity: Severity::Advisory,
                message: "ND records law expects seven-year retention".to_string(),
            },
        ],
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Registry of rule sets keyed by framework name.
#[derive(Debug, Clone, Default)]
pub struct RuleSetRegistry {
    sets: HashMap<String, RuleSet>,
}

impl RuleSetRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the built-in frameworks.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(hipaa());
        registry.register(cfr2());
        registry.register(state_nd());
        registry
    }

    /// Register a rule set, replacing any set with the same name.
    pub fn register(&mut self, set: RuleSet) {
        self.sets.insert(set.name.clone(), set);
    }

    /// Look up a rule set by name.
    pub fn get(&self, name: &str) -> Option<&RuleSet> {
        self.sets.get(name)
    }

    /// Registered framework names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Rule sets applicable to a resource of the given classification and
    /// kind, sorted by name.
    pub fn covering(&self, classification: Classification, kind: ResourceKind) -> Vec<&RuleSet> {
        let mut sets: Vec<&RuleSet> = self
            .sets
            .values()
            .filter(|s| s.covers(classification, kind))
            .collect();
        sets.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        sets
    }

    /// Merge a declarative configuration: new sets are registered,
    /// predicates for existing sets are appended.
    pub fn apply_config(&mut self, config: RuleSetConfig) {
        for definition in config.rule_sets {
            match self.sets.get_mut(&definition.name) {
                Some(existing) => {
                    existing.predicates.extend(definition.predicates);
                    if let Some(version) = definition.version {
                        existing.version = version;
                    }
                }
                None => {
                    self.register(RuleSet {
                        name: definition.name,
                        version: definition.version.unwrap_or_else(|| "1.0".to_string()),
                        applies_to: definition.applies_to,
                        kinds: definition.kinds,
                        predicates: definition.predicates,
                    });
                }
            }
        }
    }
}

// =============================================================================
// Declarative configuration
// =============================================================================

/// Root structure for rule-set YAML files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSetConfig {
    /// Configuration schema version
    pub version: String,

    /// Rule sets to register or extend
    pub rule_sets: Vec<RuleSetDefinition>,
}

/// One rule set in a configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSetDefinition {
    /// Framework name
    pub name: String,

    /// Rule-set version override
    #[serde(default)]
    pub version: Option<String>,

    /// Classifications this set applies to; empty means all
    #[serde(default)]
    pub applies_to: Vec<Classification>,

    /// Resource kinds this set applies to; empty means all
    #[serde(default)]
    pub kinds: Vec<ResourceKind>,

    /// Predicates to add
    pub predicates: Vec<Predicate>,
}

impl RuleSetConfig {
    /// Parse a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize the configuration to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

// =============================================================================
// Tests
// =============================================================================
