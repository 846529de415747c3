use cloudsweep_core::{
    build_plan_document, classify_snapshot, render_cleanup_report, synthesize_scripts, PhaseKind,
    PlanOptions, Snapshot, COST_SCRIPT, CRITICAL_SCRIPT, MAINTENANCE_SCRIPT,
};

const FIXTURE: &str = include_str!("../../../fixtures/sample-snapshot.json");

fn pinned_options() -> PlanOptions {
    PlanOptions {
        region: "us-east-1".to_string(),
        plan_id: Some("plan-fixture".to_string()),
        created_at: Some("2026-08-01T00:00:00Z".to_string()),
    }
}

#[test]
fn repeated_runs_produce_byte_identical_artifacts() {
    let snapshot = Snapshot::from_json(FIXTURE).expect("fixture parses");

    let run = |snapshot: &Snapshot| {
        let classification = classify_snapshot(snapshot);
        let scripts = synthesize_scripts(&classification.items);
        let document = build_plan_document(
            classification.items,
            classification.warnings,
            &pinned_options(),
        );
        let report = render_cleanup_report(&document);
        let payload = serde_json::to_string_pretty(&document).expect("document serializes");
        (payload, scripts, report)
    };

    let (payload_a, scripts_a, report_a) = run(&snapshot);
    let (payload_b, scripts_b, report_b) = run(&snapshot);

    assert_eq!(payload_a, payload_b);
    assert_eq!(scripts_a, scripts_b);
    assert_eq!(report_a, report_b);
}

#[test]
fn fixture_plan_aggregates_match_the_item_sequence() {
    let snapshot = Snapshot::from_json(FIXTURE).expect("fixture parses");
    let classification = classify_snapshot(&snapshot);
    let document = build_plan_document(
        classification.items,
        classification.warnings,
        &pinned_options(),
    );

    assert_eq!(document.items.len(), 11);
    assert_eq!(document.plan.summary.by_priority.critical, 1);
    assert_eq!(document.plan.summary.by_priority.high, 3);
    assert_eq!(document.plan.summary.by_priority.medium, 4);
    assert_eq!(document.plan.summary.by_priority.low, 3);
    assert_eq!(document.plan.summary.high_impact_items, 4);

    let monthly_total = document
        .items
        .iter()
        .map(|item| item.estimated_monthly_savings)
        .sum::<f64>();
    assert!((document.plan.total_annual_savings - monthly_total * 12.0).abs() < 1e-9);
    assert!((monthly_total - 130.23).abs() < 1e-6);

    let immediate = document
        .plan
        .phases
        .iter()
        .find(|phase| phase.phase == PhaseKind::Immediate)
        .expect("immediate phase present");
    assert_eq!(immediate.count, 1);

    // Two skipped snapshot records surface as warnings, never as failures.
    assert_eq!(document.warnings.len(), 2);
}

#[test]
fn fixture_scripts_respect_block_caps() {
    let snapshot = Snapshot::from_json(FIXTURE).expect("fixture parses");
    let classification = classify_snapshot(&snapshot);
    let bundle = synthesize_scripts(&classification.items);

    let critical = bundle.get(CRITICAL_SCRIPT).expect("critical script");
    assert_eq!(critical.body.matches("echo 'Fixing: ").count(), 1);
    assert_eq!(
        critical
            .body
            .matches("aws ec2 revoke-security-group-ingress")
            .count(),
        3
    );

    let cost = bundle.get(COST_SCRIPT).expect("cost script");
    assert_eq!(cost.body.matches("echo 'Processing: ").count(), 3);

    let maintenance = bundle.get(MAINTENANCE_SCRIPT).expect("maintenance script");
    assert_eq!(maintenance.body.matches("echo 'Maintenance: ").count(), 7);
}

#[test]
fn single_critical_exposure_drives_one_fix_block_and_one_immediate_item() {
    let snapshot = Snapshot::from_json(
        r#"{"sg_audit": {"critical_ports": [{"GroupId": "sg-0123456789abcdef0", "CriticalPort": 22}]}}"#,
    )
    .expect("snapshot parses");

    let classification = classify_snapshot(&snapshot);
    let bundle = synthesize_scripts(&classification.items);
    let critical = bundle.get(CRITICAL_SCRIPT).expect("critical script");
    assert_eq!(critical.body.matches("echo 'Fixing: ").count(), 1);
    assert_eq!(
        critical
            .body
            .matches("aws ec2 revoke-security-group-ingress")
            .count(),
        1
    );

    let document = build_plan_document(
        classification.items,
        classification.warnings,
        &pinned_options(),
    );
    let immediate = document
        .plan
        .phases
        .iter()
        .find(|phase| phase.phase == PhaseKind::Immediate)
        .expect("immediate phase present");
    assert_eq!(immediate.count, 1);
}

#[test]
fn empty_snapshot_still_renders_all_artifacts() {
    let snapshot = Snapshot::default();
    let classification = classify_snapshot(&snapshot);
    assert!(classification.items.is_empty());

    let scripts = synthesize_scripts(&classification.items);
    assert_eq!(scripts.scripts.len(), 5);
    assert!(scripts
        .get(CRITICAL_SCRIPT)
        .expect("critical script")
        .body
        .contains("No critical security issues found!"));

    let document = build_plan_document(
        classification.items,
        classification.warnings,
        &pinned_options(),
    );
    assert_eq!(document.plan.total_annual_savings, 0.0);
    assert!(document.plan.phases.iter().all(|phase| phase.count == 0));

    let report = render_cleanup_report(&document);
    assert!(report.contains("**Total Cleanup Items**: 0"));
}
