use crate::model::{CleanupCategory, CleanupItem, CleanupPlanDocument, PhaseKind, Priority, Risk};
use crate::scripts::{
    BACKUP_SCRIPT, COST_SCRIPT, CRITICAL_SCRIPT, MAINTENANCE_SCRIPT, VERIFY_SCRIPT,
};

/// How many items each phase section lists before eliding the rest.
const PHASE_PREVIEW_LIMIT: usize = 3;

pub fn render_cleanup_report(document: &CleanupPlanDocument) -> String {
    let mut out = String::new();
    out.push_str("# Infrastructure Cleanup Plan\n\n");
    out.push_str(&format!(
        "**Created**: {}\n**Region**: {}\n**Plan id**: `{}`\n\n",
        document.created_at, document.region, document.plan_id
    ));

    out.push_str("## Cost Savings Summary\n\n");
    out.push_str(&format!(
        "**Total Estimated Annual Savings**: ${:.2}\n**Total Cleanup Items**: {}\n\n",
        document.plan.total_annual_savings, document.plan.summary.total_items
    ));

    out.push_str("### Savings by Priority\n\n");
    for phase in &document.plan.phases {
        out.push_str(&format!(
            "- **{}**: ${:.2}/year ({} items)\n",
            phase_label(&phase.phase),
            phase.estimated_annual_savings,
            phase.count
        ));
    }
    out.push('\n');

    out.push_str("## Execution Plan\n\n");
    for phase in &document.plan.phases {
        if phase.count == 0 {
            continue;
        }
        out.push_str(&format!(
            "### {} ({})\n\n**Items**: {}\n**Savings**: ${:.2}/year\n\n",
            phase.description, phase.timeline, phase.count, phase.estimated_annual_savings
        ));
        for item in phase.items.iter().take(PHASE_PREVIEW_LIMIT) {
            out.push_str(&format!("- {}: {}\n", item.resource_name, item.description));
        }
        if phase.count > PHASE_PREVIEW_LIMIT {
            out.push_str(&format!(
                "- ... and {} more items\n",
                phase.count - PHASE_PREVIEW_LIMIT
            ));
        }
        out.push('\n');
    }

    out.push_str("## Quick Start Guide\n\n");
    out.push_str(&format!(
        "1. **BACKUP FIRST**: `bash {BACKUP_SCRIPT}`\n\
         2. **Fix Critical Issues**: `bash {CRITICAL_SCRIPT}`\n\
         3. **Cost Optimization**: `bash {COST_SCRIPT}`\n\
         4. **Maintenance**: `bash {MAINTENANCE_SCRIPT}`\n\
         5. **Verify**: `bash {VERIFY_SCRIPT}`\n\n"
    ));

    out.push_str("## Important Notes\n\n");
    out.push_str(
        "- **Always backup first** before making any changes\n\
         - **Review each script** before execution\n\
         - **Test in non-production** environment when possible\n\
         - **Monitor applications** after changes\n\n",
    );

    if !document.warnings.is_empty() {
        out.push_str("## Warnings\n\n");
        for warning in &document.warnings {
            out.push_str(&format!("- {}\n", warning));
        }
        out.push('\n');
    }

    out.push_str("## Detailed Items\n\n");
    for item in &document.items {
        out.push_str(&render_item(item));
    }

    out
}

fn render_item(item: &CleanupItem) -> String {
    let savings_text = if item.estimated_monthly_savings > 0.0 {
        format!(" (${:.2}/month)", item.estimated_monthly_savings)
    } else {
        String::new()
    };
    format!(
        "### {} {}{}\n**Type**: {}\n**Description**: {}\n**Action**: {}\n**Risk**: {}\n\n",
        priority_symbol(&item.priority),
        item.resource_name,
        savings_text,
        category_label(&item.category),
        item.description,
        item.action,
        risk_label(&item.risk)
    )
}

fn phase_label(phase: &PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Immediate => "Immediate",
        PhaseKind::Urgent => "Urgent",
        PhaseKind::MediumTerm => "Medium term",
        PhaseKind::Maintenance => "Maintenance",
    }
}

/// Presentation-only marker; carries no meaning beyond the report.
fn priority_symbol(priority: &Priority) -> &'static str {
    match priority {
        Priority::Critical => "🚨",
        Priority::High => "⚠️",
        Priority::Medium => "🔵",
        Priority::Low => "⚪",
    }
}

fn category_label(category: &CleanupCategory) -> &'static str {
    match category {
        CleanupCategory::StoppedInstance => "stopped_instance",
        CleanupCategory::OversizedInstance => "oversized_instance",
        CleanupCategory::UnattachedVolume => "unattached_volume",
        CleanupCategory::StaleSnapshots => "stale_snapshots",
        CleanupCategory::UnusedElasticIps => "unused_elastic_ips",
        CleanupCategory::UnderusedLoadBalancers => "underused_load_balancers",
        CleanupCategory::UnusedSecurityGroups => "unused_security_groups",
        CleanupCategory::CriticalExposure => "critical_exposure",
        CleanupCategory::StaleImages => "stale_images",
        CleanupCategory::MissingLogRetention => "missing_log_retention",
    }
}

fn risk_label(risk: &Risk) -> &'static str {
    match risk {
        Risk::Low => "low",
        Risk::Medium => "medium",
        Risk::High => "high",
    }
}

#[cfg(test)]
mod tests {
    use super::render_cleanup_report;
    use crate::model::{CleanupCategory, CleanupItem, Priority, Risk};
    use crate::planner::{build_plan_document, PlanOptions};

    #[test]
    fn report_covers_summary_checklist_and_appendix() {
        let items = vec![
            item("exposures", Priority::Critical, 0.0),
            item("vol-1", Priority::High, 10.0),
        ];
        let document = build_plan_document(items, Vec::new(), &options());
        let report = render_cleanup_report(&document);

        assert!(report.starts_with("# Infrastructure Cleanup Plan\n"));
        assert!(report.contains("**Total Estimated Annual Savings**: $120.00"));
        assert!(report.contains("**Total Cleanup Items**: 2"));
        assert!(report.contains("- **Immediate**: $0.00/year (1 items)"));
        assert!(report.contains("1. **BACKUP FIRST**: `bash 1_backup_everything.sh`"));
        assert!(report.contains("5. **Verify**: `bash 5_verify_cleanup.sh`"));
        assert!(report.contains("### 🚨 exposures\n"));
        assert!(report.contains("### ⚠️ vol-1 ($10.00/month)\n"));
        assert!(report.contains("**Type**: unattached_volume"));
    }

    #[test]
    fn empty_phases_are_omitted_from_the_execution_section() {
        let items = vec![item("vol-1", Priority::High, 2.0)];
        let document = build_plan_document(items, Vec::new(), &options());
        let report = render_cleanup_report(&document);

        assert!(report.contains("### High priority cost savings (1-7 days)"));
        assert!(!report.contains("### Critical security issues - Fix immediately"));
        assert!(!report.contains("### Low priority maintenance items"));
    }

    #[test]
    fn long_phases_elide_past_the_first_three_items() {
        let items = (0..5)
            .map(|index| item(&format!("vol-{index}"), Priority::High, 1.0))
            .collect();
        let document = build_plan_document(items, Vec::new(), &options());
        let report = render_cleanup_report(&document);

        assert!(report.contains("- vol-0: test item vol-0"));
        assert!(report.contains("- vol-2: test item vol-2"));
        assert!(!report.contains("- vol-3: test item vol-3"));
        assert!(report.contains("- ... and 2 more items"));
    }

    #[test]
    fn warnings_section_appears_only_when_present() {
        let clean = build_plan_document(Vec::new(), Vec::new(), &options());
        assert!(!render_cleanup_report(&clean).contains("## Warnings"));

        let noisy = build_plan_document(
            Vec::new(),
            vec!["Skipped EBS snapshot snap-bad: unparseable start time 'x'".to_string()],
            &options(),
        );
        let report = render_cleanup_report(&noisy);
        assert!(report.contains("## Warnings"));
        assert!(report.contains("snap-bad"));
    }

    #[test]
    fn zero_savings_items_omit_the_savings_suffix() {
        let items = vec![item("groups", Priority::Medium, 0.0)];
        let document = build_plan_document(items, Vec::new(), &options());
        let report = render_cleanup_report(&document);
        assert!(report.contains("### 🔵 groups\n"));
        assert!(!report.contains("groups ($"));
    }

    fn options() -> PlanOptions {
        PlanOptions {
            region: "us-east-1".to_string(),
            plan_id: Some("plan-test".to_string()),
            created_at: Some("2026-08-01T00:00:00Z".to_string()),
        }
    }

    fn item(id: &str, priority: Priority, savings: f64) -> CleanupItem {
        CleanupItem {
            category: CleanupCategory::UnattachedVolume,
            resource_id: id.to_string(),
            resource_name: id.to_string(),
            description: format!("test item {id}"),
            action: "test".to_string(),
            priority,
            risk: Risk::Medium,
            estimated_monthly_savings: savings,
            commands: vec![format!("# {id}")],
        }
    }
}
