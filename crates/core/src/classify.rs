use chrono::DateTime;
use tracing::warn;

use crate::model::{
    AddressInventory, CleanupCategory, CleanupItem, Ec2Audit, ImageInventory, LoadBalancerInventory,
    LogGroupInventory, Priority, Risk, SecurityGroupFindings, Snapshot, SnapshotInventory,
    VolumeInventory,
};
use crate::pricing::{
    downsize_suggestion, instance_monthly_cost, volume_gb_month, ELASTIC_IP_MONTHLY_RATE,
    IMAGE_MONTHLY_RATE, LOAD_BALANCER_MONTHLY_RATE, LOG_GROUP_MONTHLY_RATE, SNAPSHOT_MONTHLY_RATE,
};

/// A rightsizing proposal is only worth surfacing above this differential.
const MIN_RIGHTSIZING_SAVINGS: f64 = 10.0;
/// Snapshot/image inventories below these counts are left alone.
const SNAPSHOT_REVIEW_THRESHOLD: usize = 10;
const IMAGE_REVIEW_THRESHOLD: usize = 10;
/// Share of the load-balancer fleet cost assumed recoverable by review.
const LB_OPTIMIZABLE_FRACTION: f64 = 0.2;
/// Per-item remediation commands are capped to keep scripts reviewable.
const SG_DELETE_COMMAND_LIMIT: usize = 5;
const EXPOSURE_COMMAND_LIMIT: usize = 3;
const LOG_GROUP_COMMAND_LIMIT: usize = 3;

/// Output of one classification run: the ordered item sequence plus
/// human-readable notes about records that were skipped along the way.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub items: Vec<CleanupItem>,
    pub warnings: Vec<String>,
}

/// Maps the snapshot to the ordered sequence of cleanup items. Pure and
/// deterministic: category rules run in a fixed order, and within each
/// category snapshot iteration order is preserved. Absent sections
/// contribute nothing.
pub fn classify_snapshot(snapshot: &Snapshot) -> Classification {
    let mut items = Vec::new();
    let mut warnings = Vec::new();

    items.extend(stopped_instance_items(&snapshot.ec2_audit));
    items.extend(oversized_instance_items(&snapshot.ec2_audit));
    items.extend(unattached_volume_items(&snapshot.ebs_raw));
    items.extend(stale_snapshot_item(&snapshot.ebs_snapshots_raw, &mut warnings));
    items.extend(unused_elastic_ip_item(&snapshot.eip_raw));
    items.extend(underused_load_balancer_item(&snapshot.lb_raw));
    items.extend(unused_security_group_item(&snapshot.sg_audit));
    items.extend(critical_exposure_item(&snapshot.sg_audit));
    items.extend(stale_image_item(&snapshot.ami_raw));
    items.extend(missing_log_retention_item(&snapshot.cloudwatch_raw));

    Classification { items, warnings }
}

fn stopped_instance_items(ec2: &Ec2Audit) -> Vec<CleanupItem> {
    ec2.stopped
        .iter()
        .map(|instance| {
            let name = display_name(instance.name.as_deref());
            CleanupItem {
                category: CleanupCategory::StoppedInstance,
                resource_id: instance.instance_id.clone(),
                resource_name: name.to_string(),
                description: format!("EC2 instance '{name}' has been stopped"),
                action: "Review and terminate if not needed".to_string(),
                priority: Priority::Medium,
                risk: Risk::Medium,
                // Stopped instances accrue no compute charges.
                estimated_monthly_savings: 0.0,
                commands: vec![
                    format!("# Review instance {}", instance.instance_id),
                    format!(
                        "aws ec2 describe-instances --instance-ids {}",
                        instance.instance_id
                    ),
                    "# If not needed:".to_string(),
                    format!(
                        "aws ec2 terminate-instances --instance-ids {}",
                        instance.instance_id
                    ),
                ],
            }
        })
        .collect()
}

fn oversized_instance_items(ec2: &Ec2Audit) -> Vec<CleanupItem> {
    let mut output = Vec::new();
    for instance in &ec2.active {
        let Some(instance_type) = instance.instance_type.as_deref() else {
            continue;
        };
        if !instance_type.contains("large") {
            continue;
        }

        let smaller_type = downsize_suggestion(instance_type);
        let savings = instance_monthly_cost(instance_type) - instance_monthly_cost(smaller_type);
        if !exceeds_rightsizing_threshold(savings) {
            continue;
        }

        let name = display_name(instance.name.as_deref());
        output.push(CleanupItem {
            category: CleanupCategory::OversizedInstance,
            resource_id: instance.instance_id.clone(),
            resource_name: name.to_string(),
            description: format!("Instance '{name}' might be oversized ({instance_type})"),
            action: format!("Consider downsizing to {smaller_type}"),
            priority: Priority::Low,
            risk: Risk::Low,
            estimated_monthly_savings: savings,
            commands: vec![
                "# Monitor usage first".to_string(),
                format!("# If underutilized, resize from {instance_type} to {smaller_type}:"),
                format!(
                    "aws ec2 stop-instances --instance-ids {}",
                    instance.instance_id
                ),
                format!(
                    "aws ec2 modify-instance-attribute --instance-id {} --instance-type {smaller_type}",
                    instance.instance_id
                ),
                format!(
                    "aws ec2 start-instances --instance-ids {}",
                    instance.instance_id
                ),
            ],
        });
    }
    output
}

/// Strictly greater: a differential exactly at the threshold does not emit.
fn exceeds_rightsizing_threshold(savings: f64) -> bool {
    savings > MIN_RIGHTSIZING_SAVINGS
}

fn unattached_volume_items(ebs: &VolumeInventory) -> Vec<CleanupItem> {
    ebs.volumes
        .iter()
        .filter(|volume| volume.state == "available")
        .map(|volume| {
            let monthly_cost = volume.size_gb as f64 * volume_gb_month(&volume.volume_type);
            CleanupItem {
                category: CleanupCategory::UnattachedVolume,
                resource_id: volume.volume_id.clone(),
                resource_name: format!("EBS Volume ({}GB)", volume.size_gb),
                description: format!(
                    "Unattached EBS volume ({}GB, {})",
                    volume.size_gb, volume.volume_type
                ),
                action: "Create snapshot and delete if not needed".to_string(),
                priority: Priority::High,
                risk: Risk::Medium,
                estimated_monthly_savings: monthly_cost,
                commands: vec![
                    "# Backup first".to_string(),
                    format!(
                        "aws ec2 create-snapshot --volume-id {} --description 'Backup before deletion'",
                        volume.volume_id
                    ),
                    "# Delete volume (be careful!)".to_string(),
                    format!("aws ec2 delete-volume --volume-id {}", volume.volume_id),
                ],
            }
        })
        .collect()
}

fn stale_snapshot_item(
    inventory: &SnapshotInventory,
    warnings: &mut Vec<String>,
) -> Option<CleanupItem> {
    let mut well_formed = 0_usize;
    for (index, snapshot) in inventory.snapshots.iter().enumerate() {
        let label = snapshot
            .snapshot_id
            .clone()
            .unwrap_or_else(|| format!("#{index}"));
        match snapshot.start_time.as_deref() {
            Some(start_time) if DateTime::parse_from_rfc3339(start_time).is_ok() => {
                well_formed += 1;
            }
            Some(start_time) => {
                warn!(snapshot = %label, start_time, "skipping snapshot with unparseable start time");
                warnings.push(format!(
                    "Skipped EBS snapshot {label}: unparseable start time '{start_time}'"
                ));
            }
            None => {
                warn!(snapshot = %label, "skipping snapshot without start time");
                warnings.push(format!("Skipped EBS snapshot {label}: missing start time"));
            }
        }
    }

    if well_formed <= SNAPSHOT_REVIEW_THRESHOLD {
        return None;
    }

    Some(CleanupItem {
        category: CleanupCategory::StaleSnapshots,
        resource_id: "multiple_snapshots".to_string(),
        resource_name: format!("{well_formed} EBS snapshots"),
        description: format!("Found {well_formed} EBS snapshots that might be old"),
        action: "Review and delete unnecessary snapshots".to_string(),
        priority: Priority::Low,
        risk: Risk::Low,
        estimated_monthly_savings: well_formed as f64 * SNAPSHOT_MONTHLY_RATE,
        commands: vec![
            "# List old snapshots".to_string(),
            "aws ec2 describe-snapshots --owner-ids self --query 'Snapshots[?StartTime<=`2023-01-01`]'"
                .to_string(),
            "# Delete specific snapshot (example)".to_string(),
            "# aws ec2 delete-snapshot --snapshot-id snap-xxxxxxxx".to_string(),
        ],
    })
}

fn unused_elastic_ip_item(eips: &AddressInventory) -> Option<CleanupItem> {
    let unassociated = eips
        .addresses
        .iter()
        .filter(|address| address.association_id.is_none())
        .count();
    if unassociated == 0 {
        return None;
    }

    Some(CleanupItem {
        category: CleanupCategory::UnusedElasticIps,
        resource_id: "multiple_eips".to_string(),
        resource_name: format!("{unassociated} Elastic IPs"),
        description: format!("{unassociated} unassociated Elastic IPs"),
        action: "Release unused Elastic IPs".to_string(),
        priority: Priority::High,
        risk: Risk::Low,
        estimated_monthly_savings: unassociated as f64 * ELASTIC_IP_MONTHLY_RATE,
        commands: vec![
            "# List unassociated EIPs".to_string(),
            "aws ec2 describe-addresses --query 'Addresses[?!AssociationId]'".to_string(),
            "# Release specific EIP (example)".to_string(),
            "# aws ec2 release-address --allocation-id eipalloc-xxxxxxxx".to_string(),
        ],
    })
}

fn underused_load_balancer_item(lbs: &LoadBalancerInventory) -> Option<CleanupItem> {
    let total = lbs.total();
    if total == 0 {
        return None;
    }

    let fleet_cost = total as f64 * LOAD_BALANCER_MONTHLY_RATE;
    Some(CleanupItem {
        category: CleanupCategory::UnderusedLoadBalancers,
        resource_id: "multiple_lbs".to_string(),
        resource_name: format!("{total} Load Balancers"),
        description: format!("Review {total} load balancers for utilization"),
        action: "Review load balancers and consolidate if possible".to_string(),
        priority: Priority::Medium,
        // Load balancers are availability-critical; acting on this item
        // carries the widest blast radius of any category.
        risk: Risk::High,
        estimated_monthly_savings: fleet_cost * LB_OPTIMIZABLE_FRACTION,
        commands: vec![
            "# List all load balancers".to_string(),
            "aws elbv2 describe-load-balancers".to_string(),
            "aws elb describe-load-balancers".to_string(),
            "# Review target health and utilization before making changes".to_string(),
        ],
    })
}

fn unused_security_group_item(findings: &SecurityGroupFindings) -> Option<CleanupItem> {
    if findings.unused.is_empty() {
        return None;
    }

    let count = findings.unused.len();
    let mut commands = vec![
        "# List unused security groups".to_string(),
        "# aws ec2 describe-security-groups --group-ids sg-xxxxxxxx".to_string(),
        "# Delete unused SGs (check dependencies first)".to_string(),
    ];
    commands.extend(
        findings
            .unused
            .iter()
            .take(SG_DELETE_COMMAND_LIMIT)
            .map(|group| format!("aws ec2 delete-security-group --group-id {}", group.group_id)),
    );

    Some(CleanupItem {
        category: CleanupCategory::UnusedSecurityGroups,
        resource_id: "multiple_sgs".to_string(),
        resource_name: format!("{count} Security Groups"),
        description: format!("{count} unused Security Groups found"),
        action: "Remove unused Security Groups".to_string(),
        priority: Priority::Medium,
        risk: Risk::Low,
        // No direct cost, only rule-set complexity.
        estimated_monthly_savings: 0.0,
        commands,
    })
}

fn critical_exposure_item(findings: &SecurityGroupFindings) -> Option<CleanupItem> {
    if findings.critical_ports.is_empty() {
        return None;
    }

    let count = findings.critical_ports.len();
    let mut commands = vec!["# URGENT: Fix critical exposures".to_string()];
    commands.extend(
        findings
            .critical_ports
            .iter()
            .take(EXPOSURE_COMMAND_LIMIT)
            .map(|exposure| {
                format!(
                    "aws ec2 revoke-security-group-ingress --group-id {} --protocol tcp --port {} --cidr 0.0.0.0/0",
                    exposure.group_id, exposure.critical_port
                )
            }),
    );

    Some(CleanupItem {
        category: CleanupCategory::CriticalExposure,
        resource_id: "multiple_sgs".to_string(),
        resource_name: format!("{count} Critical Exposures"),
        description: format!("{count} critical ports exposed to Internet"),
        action: "URGENT: Restrict critical port access".to_string(),
        priority: Priority::Critical,
        // Low risk to fix, high risk to leave.
        risk: Risk::Low,
        estimated_monthly_savings: 0.0,
        commands,
    })
}

fn stale_image_item(amis: &ImageInventory) -> Option<CleanupItem> {
    let count = amis.images.len();
    if count <= IMAGE_REVIEW_THRESHOLD {
        return None;
    }

    Some(CleanupItem {
        category: CleanupCategory::StaleImages,
        resource_id: "multiple_amis".to_string(),
        resource_name: format!("{count} AMIs"),
        description: format!("Review {count} custom AMIs for cleanup"),
        action: "Review and delete unused AMIs".to_string(),
        priority: Priority::Low,
        risk: Risk::Medium,
        estimated_monthly_savings: count as f64 * IMAGE_MONTHLY_RATE,
        commands: vec![
            "# List your AMIs".to_string(),
            "aws ec2 describe-images --owners self".to_string(),
            "# Deregister old AMI (example)".to_string(),
            "# aws ec2 deregister-image --image-id ami-xxxxxxxx".to_string(),
        ],
    })
}

fn missing_log_retention_item(cloudwatch: &LogGroupInventory) -> Option<CleanupItem> {
    let no_retention = cloudwatch
        .log_groups
        .iter()
        .filter(|group| group.retention_in_days.is_none())
        .collect::<Vec<_>>();
    if no_retention.is_empty() {
        return None;
    }

    let count = no_retention.len();
    let mut commands = vec!["# Set retention policy (example: 30 days)".to_string()];
    commands.extend(no_retention.iter().take(LOG_GROUP_COMMAND_LIMIT).map(|group| {
        format!(
            "aws logs put-retention-policy --log-group-name {} --retention-in-days 30",
            group.log_group_name
        )
    }));

    Some(CleanupItem {
        category: CleanupCategory::MissingLogRetention,
        resource_id: "multiple_log_groups".to_string(),
        resource_name: format!("{count} Log Groups"),
        description: format!("{count} log groups without retention policy"),
        action: "Set retention policies to control costs".to_string(),
        priority: Priority::Medium,
        risk: Risk::Low,
        estimated_monthly_savings: count as f64 * LOG_GROUP_MONTHLY_RATE,
        commands,
    })
}

fn display_name(name: Option<&str>) -> &str {
    match name {
        Some(name) if !name.is_empty() => name,
        _ => "Unknown",
    }
}
