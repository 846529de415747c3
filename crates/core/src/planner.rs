use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use crate::model::{
    CleanupItem, CleanupPlanDocument, ExecutionPhase, ExecutionPlan, PhaseKind, PlanSummary,
    Priority, PriorityCounts, PLAN_VERSION,
};

const MONTHS_PER_YEAR: f64 = 12.0;

/// Phase definitions in execution order. Each priority maps to exactly one
/// phase, so partitioning the item sequence is total and non-overlapping.
const PHASE_TABLE: [(PhaseKind, Priority, &str, &str); 4] = [
    (
        PhaseKind::Immediate,
        Priority::Critical,
        "Critical security issues - Fix immediately",
        "0-24 hours",
    ),
    (
        PhaseKind::Urgent,
        Priority::High,
        "High priority cost savings",
        "1-7 days",
    ),
    (
        PhaseKind::MediumTerm,
        Priority::Medium,
        "Medium priority optimizations",
        "1-4 weeks",
    ),
    (
        PhaseKind::Maintenance,
        Priority::Low,
        "Low priority maintenance items",
        "1-3 months",
    ),
];

/// Metadata for the plan document. Both fields are normally left `None`
/// (fresh id, current timestamp); tests pin them for byte-stable output.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub region: String,
    pub plan_id: Option<String>,
    pub created_at: Option<String>,
}

/// Partitions the classified items into the four fixed phases and
/// aggregates savings. Every item's estimate counts toward its phase and
/// toward the overall total: the total is one reduction over the full
/// sequence, so it always equals the sum of the phase aggregates.
pub fn build_execution_plan(items: &[CleanupItem]) -> ExecutionPlan {
    let phases = PHASE_TABLE
        .iter()
        .map(|(phase, priority, description, timeline)| {
            let phase_items = items
                .iter()
                .filter(|item| item.priority == *priority)
                .cloned()
                .collect::<Vec<_>>();
            let monthly = phase_items
                .iter()
                .map(|item| item.estimated_monthly_savings)
                .sum::<f64>();
            ExecutionPhase {
                phase: *phase,
                description: description.to_string(),
                timeline: timeline.to_string(),
                count: phase_items.len(),
                estimated_annual_savings: monthly * MONTHS_PER_YEAR,
                items: phase_items,
            }
        })
        .collect::<Vec<_>>();

    let total_annual_savings = items
        .iter()
        .map(|item| item.estimated_monthly_savings)
        .sum::<f64>()
        * MONTHS_PER_YEAR;

    ExecutionPlan {
        phases,
        total_annual_savings,
        summary: summarize(items),
    }
}

fn summarize(items: &[CleanupItem]) -> PlanSummary {
    let by_priority = items
        .iter()
        .fold(PriorityCounts::default(), |mut counts, item| {
            match item.priority {
                Priority::Critical => counts.critical += 1,
                Priority::High => counts.high += 1,
                Priority::Medium => counts.medium += 1,
                Priority::Low => counts.low += 1,
            }
            counts
        });
    PlanSummary {
        total_items: items.len(),
        high_impact_items: by_priority.critical + by_priority.high,
        by_priority,
    }
}

/// Wraps the execution plan into the output-boundary payload.
pub fn build_plan_document(
    items: Vec<CleanupItem>,
    warnings: Vec<String>,
    options: &PlanOptions,
) -> CleanupPlanDocument {
    let plan = build_execution_plan(&items);
    CleanupPlanDocument {
        plan_version: PLAN_VERSION.to_string(),
        plan_id: options
            .plan_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        created_at: options
            .created_at
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        region: options.region.clone(),
        plan,
        items,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::{build_execution_plan, build_plan_document, PlanOptions};
    use crate::model::{CleanupCategory, CleanupItem, PhaseKind, Priority, Risk};

    #[test]
    fn partitions_items_by_priority_in_order() {
        let items = vec![
            item("critical-1", Priority::Critical, 0.0),
            item("high-1", Priority::High, 10.0),
            item("high-2", Priority::High, 3.65),
            item("medium-1", Priority::Medium, 4.0),
            item("low-1", Priority::Low, 24.0),
        ];

        let plan = build_execution_plan(&items);
        assert_eq!(plan.phases.len(), 4);

        let immediate = &plan.phases[0];
        assert_eq!(immediate.phase, PhaseKind::Immediate);
        assert_eq!(immediate.count, 1);
        assert_eq!(immediate.estimated_annual_savings, 0.0);

        let urgent = &plan.phases[1];
        assert_eq!(urgent.count, 2);
        assert_eq!(
            urgent.items.iter().map(|i| i.resource_id.as_str()).collect::<Vec<_>>(),
            vec!["high-1", "high-2"],
            "classification order survives partitioning"
        );
        assert!((urgent.estimated_annual_savings - 13.65 * 12.0).abs() < 1e-9);
    }

    #[test]
    fn total_equals_sum_of_phase_aggregates() {
        let items = vec![
            item("high-1", Priority::High, 10.0),
            item("medium-1", Priority::Medium, 7.2),
            item("low-1", Priority::Low, 6.0),
        ];

        let plan = build_execution_plan(&items);
        let phase_sum = plan
            .phases
            .iter()
            .map(|phase| phase.estimated_annual_savings)
            .sum::<f64>();
        assert!((plan.total_annual_savings - phase_sum).abs() < 1e-9);
        assert!((plan.total_annual_savings - 23.2 * 12.0).abs() < 1e-9);
    }

    #[test]
    fn summary_counts_priorities_and_high_impact() {
        let items = vec![
            item("critical-1", Priority::Critical, 0.0),
            item("high-1", Priority::High, 1.0),
            item("high-2", Priority::High, 1.0),
            item("low-1", Priority::Low, 1.0),
        ];

        let plan = build_execution_plan(&items);
        assert_eq!(plan.summary.total_items, 4);
        assert_eq!(plan.summary.by_priority.critical, 1);
        assert_eq!(plan.summary.by_priority.high, 2);
        assert_eq!(plan.summary.by_priority.medium, 0);
        assert_eq!(plan.summary.high_impact_items, 3);
    }

    #[test]
    fn empty_item_sequence_builds_an_empty_plan() {
        let plan = build_execution_plan(&[]);
        assert_eq!(plan.total_annual_savings, 0.0);
        assert!(plan.phases.iter().all(|phase| phase.count == 0));
        assert_eq!(plan.summary.total_items, 0);
    }

    #[test]
    fn document_honors_pinned_metadata() {
        let options = PlanOptions {
            region: "eu-west-1".to_string(),
            plan_id: Some("plan-fixed".to_string()),
            created_at: Some("2026-08-01T00:00:00Z".to_string()),
        };
        let document = build_plan_document(
            vec![item("high-1", Priority::High, 2.0)],
            vec!["skipped one record".to_string()],
            &options,
        );

        assert_eq!(document.plan_id, "plan-fixed");
        assert_eq!(document.created_at, "2026-08-01T00:00:00Z");
        assert_eq!(document.region, "eu-west-1");
        assert_eq!(document.items.len(), 1);
        assert_eq!(document.warnings.len(), 1);
    }

    #[test]
    fn fresh_documents_get_distinct_plan_ids() {
        let options = PlanOptions {
            region: "us-east-1".to_string(),
            ..PlanOptions::default()
        };
        let first = build_plan_document(Vec::new(), Vec::new(), &options);
        let second = build_plan_document(Vec::new(), Vec::new(), &options);
        assert_ne!(first.plan_id, second.plan_id);
    }

    fn item(id: &str, priority: Priority, savings: f64) -> CleanupItem {
        CleanupItem {
            category: CleanupCategory::UnattachedVolume,
            resource_id: id.to_string(),
            resource_name: id.to_string(),
            description: format!("test item {id}"),
            action: "test".to_string(),
            priority,
            risk: Risk::Low,
            estimated_monthly_savings: savings,
            commands: vec![format!("# {id}")],
        }
    }
}
