//! Renders the five remediation scripts. Each script is assembled as
//! structured blocks first and serialized to text in one place, so tests
//! can reason about block counts instead of matching substrings.

use crate::model::{CleanupItem, Priority, RenderedScript, ScriptBundle};

pub const BACKUP_SCRIPT: &str = "1_backup_everything.sh";
pub const CRITICAL_SCRIPT: &str = "2_critical_security_fixes.sh";
pub const COST_SCRIPT: &str = "3_cost_optimization.sh";
pub const MAINTENANCE_SCRIPT: &str = "4_maintenance_tasks.sh";
pub const VERIFY_SCRIPT: &str = "5_verify_cleanup.sh";

/// The maintenance script keeps only the first N medium/low items so it
/// stays reviewable in one sitting.
const MAINTENANCE_ITEM_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
struct ScriptSpec {
    file_name: &'static str,
    /// Comment lines placed under the shebang.
    purpose: Vec<String>,
    /// Banner echoed before the first block.
    banner: String,
    blocks: Vec<ScriptBlock>,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ScriptBlock {
    lines: Vec<String>,
}

impl ScriptBlock {
    fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// Produces all five scripts, in execution order, from the classified
/// items. Pure: no file-system or network access happens here, and the
/// interactive pause lines are text emitted into the scripts, not prompts
/// performed by the engine.
pub fn synthesize_scripts(items: &[CleanupItem]) -> ScriptBundle {
    let specs = vec![
        backup_spec(),
        critical_fix_spec(items),
        cost_optimization_spec(items),
        maintenance_spec(items),
        verification_spec(),
    ];

    ScriptBundle {
        scripts: specs.into_iter().map(render).collect(),
    }
}

fn render(spec: ScriptSpec) -> RenderedScript {
    let mut lines = vec!["#!/bin/bash".to_string()];
    lines.extend(spec.purpose.iter().map(|line| format!("# {line}")));
    lines.push(String::new());
    lines.push("set -e".to_string());
    lines.push(spec.banner);
    lines.push(String::new());
    for block in spec.blocks {
        lines.extend(block.lines);
        lines.push(String::new());
    }

    RenderedScript {
        file_name: spec.file_name.to_string(),
        body: lines.join("\n"),
    }
}

/// Read-only inventory dump; intentionally independent of the classified
/// items so it protects even resources no rule fired on.
fn backup_spec() -> ScriptSpec {
    ScriptSpec {
        file_name: BACKUP_SCRIPT,
        purpose: vec![
            "Complete AWS Infrastructure Backup Script".to_string(),
            "Run this BEFORE making any changes!".to_string(),
        ],
        banner: "echo 'Creating complete AWS backup...'".to_string(),
        blocks: vec![
            ScriptBlock::from_lines([
                "timestamp=$(date +%Y%m%d_%H%M%S)",
                "backup_dir=\"aws_backup_$timestamp\"",
                "mkdir -p \"$backup_dir\"",
            ]),
            ScriptBlock::from_lines([
                "# Backup EC2 instances",
                "aws ec2 describe-instances > \"$backup_dir/ec2_instances.json\"",
            ]),
            ScriptBlock::from_lines([
                "# Backup Security Groups",
                "aws ec2 describe-security-groups > \"$backup_dir/security_groups.json\"",
            ]),
            ScriptBlock::from_lines([
                "# Backup EBS volumes",
                "aws ec2 describe-volumes > \"$backup_dir/ebs_volumes.json\"",
            ]),
            ScriptBlock::from_lines([
                "# Backup Load Balancers",
                "aws elbv2 describe-load-balancers > \"$backup_dir/load_balancers.json\" 2>/dev/null || echo 'No ALBs'",
                "aws elb describe-load-balancers > \"$backup_dir/classic_load_balancers.json\" 2>/dev/null || echo 'No CLBs'",
            ]),
            ScriptBlock::from_lines([
                "# Backup Elastic IPs",
                "aws ec2 describe-addresses > \"$backup_dir/elastic_ips.json\"",
            ]),
            ScriptBlock::from_lines([
                "echo \"Backup completed in: $backup_dir\"",
                "echo \"Keep this backup safe before making changes!\"",
            ]),
        ],
    }
}

fn critical_fix_spec(items: &[CleanupItem]) -> ScriptSpec {
    let blocks = items
        .iter()
        .filter(|item| item.priority == Priority::Critical)
        .map(|item| {
            let mut lines = vec![
                format!("# {}", item.description),
                format!("echo 'Fixing: {}'", item.resource_name),
            ];
            lines.extend(item.commands.iter().cloned());
            ScriptBlock { lines }
        })
        .collect::<Vec<_>>();

    ScriptSpec {
        file_name: CRITICAL_SCRIPT,
        purpose: vec![
            "CRITICAL Security Fixes".to_string(),
            "Execute immediately after backup".to_string(),
        ],
        banner: "echo 'Applying critical security fixes...'".to_string(),
        blocks: with_fallback(blocks, "echo 'No critical security issues found!'"),
    }
}

fn cost_optimization_spec(items: &[CleanupItem]) -> ScriptSpec {
    let blocks = items
        .iter()
        .filter(|item| item.priority == Priority::High)
        .map(|item| {
            let mut lines = vec![
                format!(
                    "# {} (${:.2}/month savings)",
                    item.description, item.estimated_monthly_savings
                ),
                format!("echo 'Processing: {}'", item.resource_name),
            ];
            lines.extend(item.commands.iter().cloned());
            // Force a manual checkpoint between destructive cost actions.
            lines.push("echo 'Completed - verify before continuing'".to_string());
            lines.push("read -p 'Press Enter to continue or Ctrl+C to stop...'".to_string());
            ScriptBlock { lines }
        })
        .collect::<Vec<_>>();

    ScriptSpec {
        file_name: COST_SCRIPT,
        purpose: vec![
            "Cost Optimization Cleanup".to_string(),
            "Review each command before executing".to_string(),
        ],
        banner: "echo 'Starting cost optimization cleanup...'".to_string(),
        blocks: with_fallback(blocks, "echo 'No high priority cost items found!'"),
    }
}

fn maintenance_spec(items: &[CleanupItem]) -> ScriptSpec {
    let blocks = items
        .iter()
        .filter(|item| matches!(item.priority, Priority::Medium | Priority::Low))
        .take(MAINTENANCE_ITEM_LIMIT)
        .map(|item| {
            let mut lines = vec![
                format!("# {}", item.description),
                format!("echo 'Maintenance: {}'", item.resource_name),
            ];
            lines.extend(item.commands.iter().cloned());
            ScriptBlock { lines }
        })
        .collect::<Vec<_>>();

    ScriptSpec {
        file_name: MAINTENANCE_SCRIPT,
        purpose: vec![
            "General Maintenance Tasks".to_string(),
            "Low priority items for regular maintenance".to_string(),
        ],
        banner: "echo 'Running maintenance tasks...'".to_string(),
        blocks: with_fallback(blocks, "echo 'No maintenance items found!'"),
    }
}

/// Read-only post-checks mirroring the categories the other scripts act on.
fn verification_spec() -> ScriptSpec {
    ScriptSpec {
        file_name: VERIFY_SCRIPT,
        purpose: vec![
            "Post-Cleanup Verification".to_string(),
            "Run this after cleanup to verify everything is working".to_string(),
        ],
        banner: "echo 'Verifying infrastructure after cleanup...'".to_string(),
        blocks: vec![
            ScriptBlock::from_lines([
                "# Check running instances",
                "echo 'Running EC2 instances:'",
                "aws ec2 describe-instances --filters 'Name=instance-state-name,Values=running' --query 'Reservations[].Instances[].{ID:InstanceId,Type:InstanceType,State:State.Name}' --output table",
            ]),
            ScriptBlock::from_lines([
                "# Check load balancers",
                "echo 'Active Load Balancers:'",
                "aws elbv2 describe-load-balancers --query 'LoadBalancers[].{Name:LoadBalancerName,State:State.Code}' --output table 2>/dev/null || echo 'No ALBs found'",
            ]),
            ScriptBlock::from_lines([
                "# Check security groups with issues",
                "echo 'Checking for remaining security issues...'",
                "aws ec2 describe-security-groups --query 'SecurityGroups[?IpPermissions[?IpProtocol==`tcp` && (FromPort==`22` || FromPort==`3306` || FromPort==`3389`) && IpRanges[?CidrIp==`0.0.0.0/0`]]].{GroupId:GroupId,GroupName:GroupName}' --output table",
            ]),
            ScriptBlock::from_lines([
                "# Check unattached volumes",
                "echo 'Unattached EBS volumes:'",
                "aws ec2 describe-volumes --filters 'Name=status,Values=available' --query 'Volumes[].{VolumeId:VolumeId,Size:Size,VolumeType:VolumeType}' --output table",
            ]),
            ScriptBlock::from_lines(["echo 'Verification completed!'"]),
        ],
    }
}

fn with_fallback(blocks: Vec<ScriptBlock>, fallback_line: &str) -> Vec<ScriptBlock> {
    if blocks.is_empty() {
        vec![ScriptBlock::from_lines([fallback_line])]
    } else {
        blocks
    }
}
