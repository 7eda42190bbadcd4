use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use caseguard_core::access::{
    AccessContext, AccessEvaluator, Action, Classification, PermissionMatrix, ResourceKind, Role,
};
use caseguard_core::compliance::{ComplianceEngine, ResourceRecord, RuleSetRegistry};
use caseguard_core::crypto::{CryptoProvider, MasterKey};

fn bench_authorize(c: &mut Criterion) {
    let evaluator = AccessEvaluator::new(PermissionMatrix::board_default());
    let ctx = AccessContext::new("inv-1", Role::Investigator);

    c.bench_function("authorize_allow", |b| {
        b.iter(|| {
            evaluator.authorize(
                black_box(&ctx),
                black_box(Classification::Phi),
                black_box(Action::Read),
            )
        })
    });

    let viewer = AccessContext::new("viewer-1", Role::ReadOnly);
    c.bench_function("authorize_deny", |b| {
        b.iter(|| {
            evaluator.authorize(
                black_box(&viewer),
                black_box(Classification::Cfr2),
                black_box(Action::Update),
            )
        })
    });
}

fn bench_compliance(c: &mut Criterion) {
    let engine = ComplianceEngine::new(RuleSetRegistry::with_defaults());
    let provider = CryptoProvider::new(MasterKey::generate());
    let sealed = provider.encrypt_str("treatment history").unwrap();

    let record = ResourceRecord::new(
        ResourceKind::Complaint,
        "COMP-2026-001",
        Classification::Cfr2,
    )
    .with_attributes(json!({
        "complaint_number": "COMP-2026-001",
        "licensee_name": "Dr. Jane Doe",
        "licensee_license_number": "ND-12345",
        "complaint_description": "Alleged violation",
        "treatment_history": serde_json::to_value(&sealed).unwrap()
    }))
    .with_sensitive_field("treatment_history")
    .with_consent_documented()
    .with_retention_days(2555);

    c.bench_function("evaluate_single_set", |b| {
        b.iter(|| engine.evaluate(black_box(&record), black_box("STATE_ND")))
    });

    c.bench_function("evaluate_all_sets", |b| {
        b.iter(|| engine.evaluate_all(black_box(&record)))
    });
}

fn bench_crypto(c: &mut Criterion) {
    let provider = CryptoProvider::new(MasterKey::generate());
    let plaintext = vec![42u8; 4096];
    let sealed = provider.encrypt(&plaintext).unwrap();

    c.bench_function("encrypt_4k", |b| {
        b.iter(|| provider.encrypt(black_box(&plaintext)))
    });

    c.bench_function("decrypt_4k", |b| {
        b.iter(|| provider.decrypt(black_box(&sealed)))
    });
}

criterion_group!(benches, bench_authorize, bench_compliance, bench_crypto);
criterion_main!(benches);
