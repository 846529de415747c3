//! Static price book for the resource shapes the classifier cares about.
//! Lookups never fail: unknown shapes resolve to a documented default.

/// Applied when an instance type is missing from the price table.
pub const DEFAULT_INSTANCE_MONTHLY_COST: f64 = 50.0;

/// Applied when a volume class is missing from the price table ($/GB-month).
pub const DEFAULT_VOLUME_GB_MONTH: f64 = 0.10;

/// Monthly holding cost of an unassociated Elastic IP.
pub const ELASTIC_IP_MONTHLY_RATE: f64 = 3.65;

/// Rough monthly cost of one load balancer, any kind.
pub const LOAD_BALANCER_MONTHLY_RATE: f64 = 18.0;

/// Rough monthly storage cost of one EBS snapshot.
pub const SNAPSHOT_MONTHLY_RATE: f64 = 2.0;

/// Rough monthly storage cost of one registered machine image.
pub const IMAGE_MONTHLY_RATE: f64 = 0.5;

/// Rough monthly cost of one log group with unbounded retention.
pub const LOG_GROUP_MONTHLY_RATE: f64 = 2.0;

/// Estimated monthly cost of a running instance of the given type.
pub fn instance_monthly_cost(instance_type: &str) -> f64 {
    match instance_type {
        "t2.micro" => 8.47,
        "t2.small" => 16.79,
        "t2.medium" => 33.58,
        "t2.large" => 67.77,
        "t3.micro" => 7.59,
        "t3.small" => 15.18,
        "t3.medium" => 30.37,
        "t3.large" => 60.74,
        "t3.xlarge" => 121.47,
        "t3.2xlarge" => 242.94,
        "m5.large" => 70.08,
        "m5.xlarge" => 140.16,
        "m5.2xlarge" => 280.32,
        "c5.large" => 62.05,
        "c5.xlarge" => 124.10,
        "c5.2xlarge" => 248.20,
        "r5.large" => 91.98,
        "r5.xlarge" => 183.96,
        _ => DEFAULT_INSTANCE_MONTHLY_COST,
    }
}

/// Monthly storage price per GB for the given volume class.
pub fn volume_gb_month(volume_type: &str) -> f64 {
    match volume_type {
        "gp2" => 0.10,
        "gp3" => 0.08,
        "io1" | "io2" => 0.125,
        "st1" => 0.045,
        "sc1" => 0.025,
        _ => DEFAULT_VOLUME_GB_MONTH,
    }
}

/// Next smaller instance type worth proposing for the given one. Types with
/// no smaller option defined come back unchanged (terminal, not an error).
pub fn downsize_suggestion(instance_type: &str) -> &str {
    match instance_type {
        "t3.2xlarge" => "t3.xlarge",
        "t3.xlarge" => "t3.large",
        "t3.large" => "t3.medium",
        "t3.medium" => "t3.small",
        "m5.2xlarge" => "m5.xlarge",
        "m5.xlarge" => "m5.large",
        "m5.large" => "t3.large",
        "c5.2xlarge" => "c5.xlarge",
        "c5.xlarge" => "c5.large",
        "c5.large" => "t3.large",
        "r5.xlarge" => "r5.large",
        "r5.large" => "m5.large",
        other => other,
    }
}
