// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Compliance Predicates
//!
//! Each predicate is a pure check over a [`ResourceRecord`] - its
//! recorded attributes and audit slice - producing a [`Finding`] with an
//! explanation when unsatisfied. Predicates never mutate anything and
//! never consult external state.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::resource::ResourceRecord;
use super::verdict::Finding;
use crate::access::Classification;

// =============================================================================
// Severity
// =============================================================================

/// How a failing predicate affects the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Failure makes the rule set non-compliant
    #[default]
    Blocking,
    /// Failure is reported as a warning; the rule set can still pass
    Advisory,
}

// =============================================================================
// Checks
// =============================================================================

/// The check a predicate performs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Check {
    /// Resources holding sensitive fields must carry a specially tracked
    /// classification (PHI or CFR2)
    ClassificationAssigned,

    /// Every designated sensitive field must resolve to an encrypted
    /// envelope, not plaintext
    EncryptionApplied,

    /// For specially tracked resources, the audit slice must hold at
    /// least one sensitive-access entry per recorded access event
    AuditCoverage,

    /// Substance-use-disorder records must have written consent
    /// documentation on file
    ConsentDocumented,

    /// A retention period must be recorded on the resource
    RetentionRecorded,

    /// The recorded retention period must meet a minimum
    RetentionAtLeast {
        /// Minimum retention in days
        days: u32,
    },

    /// An attribute must be present and non-null (dot notation supported)
    FieldRequired {
        /// Attribute path
        field: String,
    },

    /// A string attribute must match a pattern
    FieldMatches {
        /// Attribute path
        field: String,
        /// Regular expression the value must match
        pattern: String,
    },
}

// =============================================================================
// Predicate
// =============================================================================

/// A named compliance predicate inside a rule set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Predicate {
    /// Predicate name, unique within its rule set
    pub name: String,

    /// The check to perform
    pub check: Check,

    /// Blocking or advisory
    #[serde(default)]
    pub severity: Severity,

    /// Message prefix used in explanations
    pub message: String,
}

impl Predicate {
    /// Evaluate against a resource. `Ok(())` when satisfied; otherwise a
    /// finding whose explanation names what is missing or wrong.
    pub fn evaluate(&self, resource: &ResourceRecord) -> Result<(), Finding> {
        match &self.check {
            Check::ClassificationAssigned => self.check_classification(resource),
            Check::EncryptionApplied => self.check_encryption(resource),
            Check::AuditCoverage => self.check_audit_coverage(resource),
            Check::ConsentDocumented => self.check_consent(resource),
            Check::RetentionRecorded => self.check_retention_recorded(resource),
            Check::RetentionAtLeast { days } => self.check_retention_minimum(resource, *days),
            Check::FieldRequired { field } => self.check_field_required(resource, field),
            Check::FieldMatches { field, pattern } => {
                self.check_field_matches(resource, field, pattern)
            }
        }
    }

    fn fail(&self, explanation: String) -> Result<(), Finding> {
        Err(Finding {
            predicate: self.name.clone(),
            explanation,
        })
    }

    fn check_classification(&self, resource: &ResourceRecord) -> Result<(), Finding> {
        if !resource.sensitive_fields.is_empty()
            && !resource.classification.is_specially_tracked()
        {
            return self.fail(format!(
                "{}: resource {} holds sensitive fields but is classified {}",
                self.message, resource.id, resource.classification
            ));
        }
        Ok(())
    }

    fn check_encryption(&self, resource: &ResourceRecord) -> Result<(), Finding> {
        let plaintext: Vec<&str> = resource
            .sensitive_fields
            .iter()
            .filter(|f| !resource.field_is_encrypted(f))
            .map(|f| f.as_str())
            .collect();

        if !plaintext.is_empty() {
            return self.fail(format!(
                "{}: field '{}' does not resolve to an encrypted payload",
                self.message,
                plaintext.join("', '")
            ));
        }
        Ok(())
    }

    fn check_audit_coverage(&self, resource: &ResourceRecord) -> Result<(), Finding> {
        if !resource.classification.is_specially_tracked() {
            return Ok(());
        }

        let covered = resource.sensitive_audit_entries();
        if covered < resource.recorded_access_events {
            return self.fail(format!(
                "{}: {} sensitive-access audit entries cover {} recorded access events",
                self.message, covered, resource.recorded_access_events
            ));
        }
        Ok(())
    }

    fn check_consent(&self, resource: &ResourceRecord) -> Result<(), Finding> {
        if resource.classification == Classification::Cfr2 && !resource.consent_documented {
            return self.fail(format!(
                "{}: no written consent documentation on file for {}",
                self.message, resource.id
            ));
        }
        Ok(())
    }

    fn check_retention_recorded(&self, resource: &ResourceRecord) -> Result<(), Finding> {
        if resource.retention_days.is_none() {
            return self.fail(format!(
                "{}: no retention period recorded for {}",
                self.message, resource.id
            ));
        }
        Ok(())
    }

    fn check_retention_minimum(
        &self,
        resource: &ResourceRecord,
        minimum: u32,
    ) -> Result<(), Finding> {
        match resource.retention_days {
            None => self.fail(format!(
                "{}: no retention period recorded (minimum {minimum} days)",
                self.message
            )),
            Some(days) if days < minimum => self.fail(format!(
                "{}: retention set to {days} days, below the {minimum}-day minimum",
                self.message
            )),
            Some(_) => Ok(()),
        }
    }

    fn check_field_required(&self, resource: &ResourceRecord, field: &str) -> Result<(), Finding> {
        let value = resource.attribute(field);
        let missing = match value {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };
        if missing {
            return self.fail(format!("{}: missing required field '{field}'", self.message));
        }
        Ok(())
    }

    fn check_field_matches(
        &self,
        resource: &ResourceRecord,
        field: &str,
        pattern: &str,
    ) -> Result<(), Finding> {
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(_) => {
                return self.fail(format!(
                    "{}: predicate pattern '{pattern}' is not a valid expression",
                    self.message
                ))
            }
        };

        match resource.attribute(field) {
            Some(Value::String(s)) if re.is_match(s) => Ok(()),
            Some(Value::String(s)) => self.fail(format!(
                "{}: field '{field}' value '{s}' does not match expected format",
                self.message
            )),
            _ => self.fail(format!(
                "{}: field '{field}' is missing or not a string",
                self.message
            )),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Classification, ResourceKind};
    use crate::crypto::{CryptoProvider, MasterKey};
    use serde_json::json;

    fn predicate(name: &str, check: Check) -> Predicate {
        Predicate {
            name: name.to_string(),
            check,
            severity: Severity::Blocking,
            message: "test".to_string(),
        }
    }

    fn phi_record() -> ResourceRecord {
        ResourceRecord::new(ResourceKind::Document, "D-1", Classification::Phi)
    }

    #[test]
    fn test_field_required_passes() {
        let p = predicate(
            "complaint-number",
            Check::FieldRequired {
                field: "complaint_number".to_string(),
            },
        );
        let record = phi_record().with_attributes(json!({"complaint_number": "COMP-1"}));
        assert!(p.evaluate(&record).is_ok());
    }

    #[test]
    fn test_field_required_fails_missing_null_and_empty() {
        let p = predicate(
            "complaint-number",
            Check::FieldRequired {
                field: "complaint_number".to_string(),
            },
        );

        for attributes in [
            json!({}),
            json!({"complaint_number": null}),
            json!({"complaint_number": ""}),
        ] {
            let record = phi_record().with_attributes(attributes);
            let finding = p.evaluate(&record).unwrap_err();
            assert!(finding.explanation.contains("complaint_number"));
        }
    }

    #[test]
    fn test_field_required_nested() {
        let p = predicate(
            "license",
            Check::FieldRequired {
                field: "licensee.license_number".to_string(),
            },
        );
        let record = phi_record().with_attributes(json!({"licensee": {"license_number": "ND-1"}}));
        assert!(p.evaluate(&record).is_ok());
    }

    #[test]
    fn test_field_matches() {
        let p = predicate(
            "license-format",
            Check::FieldMatches {
                field: "licensee_license_number".to_string(),
                pattern: "^ND-[0-9]+$".to_string(),
            },
        );

        let good = phi_record().with_attributes(json!({"licensee_license_number": "ND-12345"}));
        assert!(p.evaluate(&good).is_ok());

        let bad = phi_record().with_attributes(json!({"licensee_license_number": "12345"}));
        let finding = p.evaluate(&bad).unwrap_err();
        assert!(finding.explanation.contains("licensee_license_number"));
    }

    #[test]
    fn test_encryption_applied_names_plaintext_field() {
        let provider = CryptoProvider::new(MasterKey::generate());
        let sealed = provider.encrypt_str("history").unwrap();

        let record = phi_record()
            .with_attributes(json!({
                "medical_history": serde_json::to_value(&sealed).unwrap(),
                "diagnosis": "stored in the clear"
            }))
            .with_sensitive_field("medical_history")
            .with_sensitive_field("diagnosis");

        let p = predicate("encryption-applied", Check::EncryptionApplied);
        let finding = p.evaluate(&record).unwrap_err();
        assert!(finding.explanation.contains("'diagnosis'"));
        assert!(!finding.explanation.contains("'medical_history'"));
    }

    #[test]
    fn test_encryption_applied_passes_when_all_sealed() {
        let provider = CryptoProvider::new(MasterKey::generate());
        let sealed = provider.encrypt_str("history").unwrap();

        let record = phi_record()
            .with_attributes(json!({
                "medical_history": serde_json::to_value(&sealed).unwrap()
            }))
            .with_sensitive_field("medical_history");

        let p = predicate("encryption-applied", Check::EncryptionApplied);
        assert!(p.evaluate(&record).is_ok());
    }

    #[test]
    fn test_classification_assigned() {
        let p = predicate("classification-assigned", Check::ClassificationAssigned);

        let misclassified = ResourceRecord::new(
            ResourceKind::Document,
            "D-2",
            Classification::Confidential,
        )
        .with_sensitive_field("medical_history");
        assert!(p.evaluate(&misclassified).is_err());

        let classified = phi_record().with_sensitive_field("medical_history");
        assert!(p.evaluate(&classified).is_ok());

        // No sensitive fields: nothing to demand.
        let plain = ResourceRecord::new(
            ResourceKind::Complaint,
            "C-1",
            Classification::Confidential,
        );
        assert!(p.evaluate(&plain).is_ok());
    }

    #[test]
    fn test_audit_coverage_compares_event_counts() {
        let p = predicate("audit-coverage", Check::AuditCoverage);

        let uncovered = phi_record().with_recorded_access_events(3);
        let finding = p.evaluate(&uncovered).unwrap_err();
        assert!(finding.explanation.contains("0 sensitive-access"));
        assert!(finding.explanation.contains("3 recorded"));

        // Non-tracked classifications are not subject to the check.
        let confidential = ResourceRecord::new(
            ResourceKind::Document,
            "D-3",
            Classification::Confidential,
        )
        .with_recorded_access_events(3);
        assert!(p.evaluate(&confidential).is_ok());
    }

    #[test]
    fn test_consent_documented_only_binds_cfr2() {
        let p = predicate("consent-documented", Check::ConsentDocumented);

        let cfr2 = ResourceRecord::new(ResourceKind::Document, "D-4", Classification::Cfr2);
        assert!(p.evaluate(&cfr2).is_err());

        let consented = ResourceRecord::new(ResourceKind::Document, "D-4", Classification::Cfr2)
            .with_consent_documented();
        assert!(p.evaluate(&consented).is_ok());

        let phi = phi_record();
        assert!(p.evaluate(&phi).is_ok());
    }

    #[test]
    fn test_retention_checks() {
        let recorded = predicate("retention-recorded", Check::RetentionRecorded);
        let minimum = predicate("retention-minimum", Check::RetentionAtLeast { days: 2555 });

        let bare = phi_record();
        assert!(recorded.evaluate(&bare).is_err());
        assert!(minimum.evaluate(&bare).is_err());

        let short = phi_record().with_retention_days(365);
        assert!(recorded.evaluate(&short).is_ok());
        let finding = minimum.evaluate(&short).unwrap_err();
        assert!(finding.explanation.contains("365"));
        assert!(finding.explanation.contains("2555"));

        let compliant = phi_record().with_retention_days(2555);
        assert!(minimum.evaluate(&compliant).is_ok());
    }

    #[test]
    fn test_predicate_yaml_roundtrip() {
        let yaml = r#"
name: "license-format"
check:
  type: field_matches
  field: "licensee_license_number"
  pattern: "^ND-[0-9]+$"
severity: advisory
message: "License numbers follow the ND board format"
"#;
        let p: Predicate = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(p.name, "license-format");
        assert_eq!(p.severity, Severity::Advisory);
        assert!(matches!(p.check, Check::FieldMatches { .. }));
    }

    #[test]
    fn test_severity_defaults_to_blocking() {
        let yaml = r#"
name: "x"
check:
  type: retention_recorded
message: "m"
"#;
        let p: Predicate = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(p.severity, Severity::Blocking);
    }
}
