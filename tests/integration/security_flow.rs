use serde_json::json;

use caseguard_core::access::{AccessContext, Action, Classification, DenyReason, ResourceKind, Role};
use caseguard_core::audit::AuditQuery;
use caseguard_core::compliance::ResourceRecord;
use caseguard_core::config::{SecurityConfig, SecurityCore};
use caseguard_core::crypto::MasterKey;

fn make_core() -> SecurityCore {
    let config = SecurityConfig {
        master_key: Some(MasterKey::generate().to_base64()),
        ..Default::default()
    };
    SecurityCore::from_config(&config).expect("core assembles")
}

#[test]
fn test_admin_update_on_cfr2_is_allowed() {
    let core = make_core();
    let ctx = AccessContext::new("admin-1", Role::Admin).with_origin("10.0.0.2");

    let decision = core
        .checked_access(
            &ctx,
            ResourceKind::Complaint,
            "COMP-2026-014",
            Classification::Cfr2,
            Action::Update,
        )
        .unwrap();

    assert!(decision.is_allowed());
}

#[test]
fn test_read_only_update_on_cfr2_is_denied_and_audited() {
    let core = make_core();
    let ctx = AccessContext::new("viewer-3", Role::ReadOnly).with_origin("10.0.0.9");

    let decision = core
        .checked_access(
            &ctx,
            ResourceKind::Complaint,
            "COMP-2026-014",
            Classification::Cfr2,
            Action::Update,
        )
        .unwrap();

    assert!(!decision.is_allowed());
    assert_eq!(decision.deny_reason(), Some(DenyReason::ActionNotPermitted));

    // The deny was appended, classified CFR2, marked sensitive.
    let entries = core
        .ledger
        .query(&AuditQuery::all().for_actor("viewer-3"))
        .unwrap();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert!(!entry.outcome.is_allow());
    assert_eq!(entry.classification, Classification::Cfr2);
    assert!(entry.sensitive_access);
}

#[test]
fn test_every_decision_lands_in_append_order() {
    let core = make_core();

    let investigator = AccessContext::new("inv-1", Role::Investigator);
    let reviewer = AccessContext::new("rev-1", Role::Reviewer);

    for (ctx, classification, action) in [
        (&investigator, Classification::Phi, Action::Read),
        (&reviewer, Classification::Phi, Action::Read), // deny: ceiling
        (&investigator, Classification::Phi, Action::Update),
        (&reviewer, Classification::Confidential, Action::Read),
    ] {
        core.checked_access(ctx, ResourceKind::Document, "D-55", classification, action)
            .unwrap();
    }

    let entries = core.ledger.query(&AuditQuery::all()).unwrap();
    let sequences: Vec<u64> = entries.iter().map(|e| e.sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3, 4]);

    let report = core.ledger.verify_sequence().unwrap();
    assert!(report.is_intact());
}

#[test]
fn test_phi_document_flow_end_to_end() {
    let core = make_core();
    let ctx = AccessContext::new("inv-2", Role::Investigator).with_origin("10.1.1.1");

    // Write path: authorize, audit, seal the sensitive field.
    let decision = core
        .checked_access(
            &ctx,
            ResourceKind::Document,
            "D-301",
            Classification::Phi,
            Action::Create,
        )
        .unwrap();
    assert!(decision.is_allowed());

    let sealed = core.crypto.encrypt_str("patient treatment narrative").unwrap();

    // Read path: authorize, audit, open the field.
    let decision = core
        .checked_access(
            &ctx,
            ResourceKind::Document,
            "D-301",
            Classification::Phi,
            Action::Read,
        )
        .unwrap();
    assert!(decision.is_allowed());
    assert_eq!(
        core.crypto.decrypt_str(&sealed).unwrap(),
        "patient treatment narrative"
    );

    // Compliance: the record, its sealed field, and its audit slice.
    let history = core
        .ledger
        .query(&AuditQuery::all().for_resource(ResourceKind::Document, "D-301"))
        .unwrap();
    let record = ResourceRecord::new(ResourceKind::Document, "D-301", Classification::Phi)
        .with_attributes(json!({
            "narrative": serde_json::to_value(&sealed).unwrap()
        }))
        .with_sensitive_field("narrative")
        .with_retention_days(2555)
        .with_recorded_access_events(2)
        .with_audit_history(history);

    let verdict = core.engine.evaluate(&record, "HIPAA").unwrap();
    assert!(verdict.compliant, "findings: {:?}", verdict.findings);
}

#[test]
fn test_unencrypted_phi_field_fails_hipaa_by_name() {
    let core = make_core();

    let record = ResourceRecord::new(ResourceKind::Document, "D-400", Classification::Phi)
        .with_attributes(json!({"lab_results": "plaintext values"}))
        .with_sensitive_field("lab_results")
        .with_retention_days(2555);

    let verdict = core.engine.evaluate(&record, "HIPAA").unwrap();
    assert!(!verdict.compliant);

    let finding = verdict
        .findings
        .iter()
        .find(|f| f.predicate == "encryption-applied")
        .expect("encryption-applied must fail");
    assert!(finding.explanation.contains("lab_results"));
}

#[test]
fn test_two_independent_failures_both_reported() {
    let core = make_core();

    // CFR2 record with a plaintext sensitive field AND no consent.
    let record = ResourceRecord::new(ResourceKind::Document, "D-500", Classification::Cfr2)
        .with_attributes(json!({"treatment_note": "plaintext"}))
        .with_sensitive_field("treatment_note");

    let verdict = core.engine.evaluate(&record, "CFR2").unwrap();
    assert!(!verdict.compliant);

    let failed: Vec<&str> = verdict
        .findings
        .iter()
        .map(|f| f.predicate.as_str())
        .collect();
    assert!(failed.contains(&"encryption-applied"));
    assert!(failed.contains(&"consent-documented"));
}

#[test]
fn test_evaluate_all_for_a_complaint_under_every_framework() {
    let core = make_core();
    let sealed = core.crypto.encrypt_str("treatment history").unwrap();

    let record = ResourceRecord::new(
        ResourceKind::Complaint,
        "COMP-2026-020",
        Classification::Cfr2,
    )
    .with_attributes(json!({
        "complaint_number": "COMP-2026-020",
        "licensee_name": "Dr. Jane Doe",
        "licensee_license_number": "ND-67890",
        "complaint_description": "Improper record handling",
        "treatment_history": serde_json::to_value(&sealed).unwrap()
    }))
    .with_sensitive_field("treatment_history")
    .with_consent_documented()
    .with_retention_days(2555);

    let summary = core.engine.evaluate_all(&record);
    let evaluated: Vec<&str> = summary
        .verdicts
        .iter()
        .map(|v| v.rule_set.as_str())
        .collect();
    assert_eq!(evaluated, vec!["CFR2", "HIPAA", "STATE_ND"]);
    assert!(summary.overall_compliant, "findings: {:?}", summary.all_findings());
}

#[test]
fn test_tampered_payload_is_unreadable() {
    let core = make_core();

    let mut sealed = core.crypto.encrypt_str("complainant identity").unwrap();
    sealed.ciphertext[3] ^= 0x80;

    let result = core.crypto.decrypt_str(&sealed);
    assert!(result.is_err());
}

#[test]
fn test_auditor_reads_trail_but_cannot_change_cases() {
    let core = make_core();
    let ctx = AccessContext::new("aud-1", Role::Auditor);

    let read = core
        .checked_access(
            &ctx,
            ResourceKind::AuditLog,
            "trail",
            Classification::Cfr2,
            Action::Read,
        )
        .unwrap();
    assert!(read.is_allowed());

    let update = core
        .checked_access(
            &ctx,
            ResourceKind::Complaint,
            "COMP-1",
            Classification::Confidential,
            Action::Update,
        )
        .unwrap();
    assert_eq!(update.deny_reason(), Some(DenyReason::ActionNotPermitted));
}
