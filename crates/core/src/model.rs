use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PLAN_VERSION: &str = "1.0.0";

/// Raised when the snapshot text is not shaped the way the audit bundle
/// promises (top level not a mapping, a section not list/mapping-shaped).
/// This is the engine's only fatal error class; every other irregularity
/// is absorbed during classification.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not structurally valid: {0}")]
    InvalidStructure(#[from] serde_json::Error),
}

/// Externally supplied bundle of resource inventory and pre-computed
/// security findings. Every section defaults to empty: an absent category
/// means "no data", never an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Snapshot {
    #[serde(default)]
    pub ec2_audit: Ec2Audit,
    #[serde(default)]
    pub ebs_raw: VolumeInventory,
    #[serde(default)]
    pub ebs_snapshots_raw: SnapshotInventory,
    #[serde(default)]
    pub eip_raw: AddressInventory,
    #[serde(default)]
    pub lb_raw: LoadBalancerInventory,
    #[serde(default)]
    pub sg_audit: SecurityGroupFindings,
    #[serde(default)]
    pub ami_raw: ImageInventory,
    #[serde(default)]
    pub cloudwatch_raw: LogGroupInventory,
}

impl Snapshot {
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Ec2Audit {
    #[serde(default)]
    pub stopped: Vec<Ec2Instance>,
    #[serde(default)]
    pub active: Vec<Ec2Instance>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ec2Instance {
    #[serde(rename = "InstanceId")]
    pub instance_id: String,
    #[serde(default, rename = "Name")]
    pub name: Option<String>,
    #[serde(default, rename = "Type")]
    pub instance_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VolumeInventory {
    #[serde(default)]
    pub volumes: Vec<EbsVolume>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EbsVolume {
    #[serde(rename = "VolumeId")]
    pub volume_id: String,
    #[serde(default, rename = "State")]
    pub state: String,
    #[serde(default, rename = "Size")]
    pub size_gb: u64,
    #[serde(default = "default_volume_type", rename = "VolumeType")]
    pub volume_type: String,
}

fn default_volume_type() -> String {
    "gp2".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SnapshotInventory {
    #[serde(default, rename = "Snapshots")]
    pub snapshots: Vec<EbsSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EbsSnapshot {
    #[serde(default, rename = "SnapshotId")]
    pub snapshot_id: Option<String>,
    /// RFC 3339 creation timestamp; records that lack one or carry an
    /// unparseable value are skipped during classification.
    #[serde(default, rename = "StartTime")]
    pub start_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AddressInventory {
    #[serde(default, rename = "Addresses")]
    pub addresses: Vec<ElasticIp>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElasticIp {
    #[serde(default, rename = "PublicIp")]
    pub public_ip: Option<String>,
    #[serde(default, rename = "AssociationId")]
    pub association_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LoadBalancerInventory {
    #[serde(default, rename = "ApplicationLoadBalancers")]
    pub application: Vec<LoadBalancer>,
    #[serde(default, rename = "NetworkLoadBalancers")]
    pub network: Vec<LoadBalancer>,
    #[serde(default, rename = "ClassicLoadBalancers")]
    pub classic: Vec<LoadBalancer>,
}

impl LoadBalancerInventory {
    pub fn total(&self) -> usize {
        self.application.len() + self.network.len() + self.classic.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadBalancer {
    #[serde(default, rename = "LoadBalancerName")]
    pub name: Option<String>,
}

/// Findings sub-bundle produced by the upstream security-rule evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SecurityGroupFindings {
    #[serde(default)]
    pub unused: Vec<SecurityGroupRef>,
    #[serde(default)]
    pub critical_ports: Vec<CriticalExposure>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityGroupRef {
    #[serde(rename = "GroupId")]
    pub group_id: String,
    #[serde(default, rename = "GroupName")]
    pub group_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CriticalExposure {
    #[serde(rename = "GroupId")]
    pub group_id: String,
    #[serde(rename = "CriticalPort")]
    pub critical_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ImageInventory {
    #[serde(default, rename = "Images")]
    pub images: Vec<MachineImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MachineImage {
    #[serde(default, rename = "ImageId")]
    pub image_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LogGroupInventory {
    #[serde(default, rename = "LogGroups")]
    pub log_groups: Vec<LogGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogGroup {
    #[serde(rename = "logGroupName")]
    pub log_group_name: String,
    #[serde(default, rename = "retentionInDays")]
    pub retention_in_days: Option<u32>,
}

/// One classified remediation opportunity. Immutable after creation:
/// priority and risk are assigned at classification time and never revised
/// downstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CleanupItem {
    pub category: CleanupCategory,
    pub resource_id: String,
    pub resource_name: String,
    pub description: String,
    pub action: String,
    pub priority: Priority,
    pub risk: Risk,
    pub estimated_monthly_savings: f64,
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CleanupCategory {
    StoppedInstance,
    OversizedInstance,
    UnattachedVolume,
    StaleSnapshots,
    UnusedElasticIps,
    UnderusedLoadBalancers,
    UnusedSecurityGroups,
    CriticalExposure,
    StaleImages,
    MissingLogRetention,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

/// Operational blast-radius of applying an item's action, independent of
/// its priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Risk {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionPlan {
    pub phases: Vec<ExecutionPhase>,
    pub total_annual_savings: f64,
    pub summary: PlanSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionPhase {
    pub phase: PhaseKind,
    pub description: String,
    pub timeline: String,
    pub items: Vec<CleanupItem>,
    pub count: usize,
    pub estimated_annual_savings: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Immediate,
    Urgent,
    MediumTerm,
    Maintenance,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlanSummary {
    pub total_items: usize,
    pub by_priority: PriorityCounts,
    pub high_impact_items: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PriorityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// The structured output-boundary payload handed to the persistence
/// collaborator alongside the script bundle and the markdown report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CleanupPlanDocument {
    pub plan_version: String,
    pub plan_id: String,
    pub created_at: String,
    pub region: String,
    pub plan: ExecutionPlan,
    pub items: Vec<CleanupItem>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScriptBundle {
    pub scripts: Vec<RenderedScript>,
}

impl ScriptBundle {
    pub fn get(&self, file_name: &str) -> Option<&RenderedScript> {
        self.scripts
            .iter()
            .find(|script| script.file_name == file_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderedScript {
    pub file_name: String,
    pub body: String,
}
