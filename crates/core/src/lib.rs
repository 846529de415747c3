pub mod classify;
pub mod markdown;
pub mod model;
pub mod planner;
pub mod pricing;
pub mod scripts;

pub use classify::{classify_snapshot, Classification};
pub use markdown::render_cleanup_report;
pub use model::{
    AddressInventory, CleanupCategory, CleanupItem, CleanupPlanDocument, CriticalExposure,
    EbsSnapshot, EbsVolume, Ec2Audit, Ec2Instance, ElasticIp, ExecutionPhase, ExecutionPlan,
    ImageInventory, LoadBalancer, LoadBalancerInventory, LogGroup, LogGroupInventory, MachineImage,
    PhaseKind, PlanSummary, Priority, PriorityCounts, RenderedScript, Risk, ScriptBundle,
    SecurityGroupFindings, SecurityGroupRef, Snapshot, SnapshotError, SnapshotInventory,
    VolumeInventory, PLAN_VERSION,
};
pub use planner::{build_execution_plan, build_plan_document, PlanOptions};
pub use pricing::{downsize_suggestion, instance_monthly_cost, volume_gb_month};
pub use scripts::{
    synthesize_scripts, BACKUP_SCRIPT, COST_SCRIPT, CRITICAL_SCRIPT, MAINTENANCE_SCRIPT,
    VERIFY_SCRIPT,
};
