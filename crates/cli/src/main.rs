use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cloudsweep_core::{render_cleanup_report, PlanOptions, Priority, Risk};
use cloudsweep_service::{build_cleanup_bundle, load_snapshot, write_artifacts};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "cloudsweep",
    version,
    about = "Turn a cloud audit snapshot into a prioritized cleanup plan, remediation scripts, and a report."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the full cleanup plan and write all artifacts to a directory.
    Plan(PlanArgs),
    /// Classify a snapshot and list the cleanup items without writing artifacts.
    Classify(ClassifyArgs),
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Input snapshot JSON file.
    #[arg(long, value_name = "FILE")]
    snapshot: PathBuf,

    /// Directory for the plan, scripts, and report.
    #[arg(long, default_value = "cleanup-artifacts", value_name = "DIR")]
    output_dir: PathBuf,

    /// Region label recorded in the plan document.
    #[arg(long, default_value = "us-east-1")]
    region: String,

    /// Fixed plan id (a fresh one is generated when omitted).
    #[arg(long, value_name = "ID")]
    plan_id: Option<String>,
}

#[derive(Debug, Args)]
struct ClassifyArgs {
    /// Input snapshot JSON file.
    #[arg(long, value_name = "FILE")]
    snapshot: PathBuf,

    /// Region label recorded in the report.
    #[arg(long, default_value = "us-east-1")]
    region: String,

    /// Optional markdown report output file.
    #[arg(long, value_name = "FILE")]
    md: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan(args) => run_plan_command(args),
        Commands::Classify(args) => run_classify_command(args),
    }
}

fn run_plan_command(args: PlanArgs) -> Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let options = PlanOptions {
        region: args.region,
        plan_id: args.plan_id,
        created_at: None,
    };

    let bundle = build_cleanup_bundle(&snapshot, &options);
    let paths = write_artifacts(&bundle, &args.output_dir)?;

    let summary = &bundle.document.plan.summary;
    println!("Cleanup plan written to {}", paths.plan.display());
    println!(
        "{} cleanup item(s), {} warning(s).",
        summary.total_items,
        bundle.document.warnings.len()
    );
    println!(
        "Estimated annual savings: ${:.2}",
        bundle.document.plan.total_annual_savings
    );
    println!(
        "Critical items: {}, high priority items: {}.",
        summary.by_priority.critical, summary.by_priority.high
    );
    println!(
        "{} script(s) and the report are in {}; review every script before running it.",
        paths.scripts.len(),
        args.output_dir.display()
    );

    Ok(())
}

fn run_classify_command(args: ClassifyArgs) -> Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let options = PlanOptions {
        region: args.region,
        plan_id: None,
        created_at: None,
    };
    let bundle = build_cleanup_bundle(&snapshot, &options);

    if bundle.document.items.is_empty() {
        println!(
            "No cleanup opportunities found in {}",
            args.snapshot.display()
        );
    } else {
        println!(
            "Found {} cleanup item(s) in {}:",
            bundle.document.items.len(),
            args.snapshot.display()
        );
        for item in &bundle.document.items {
            println!(
                "- [{} | risk {} | ${:.2}/month] {}: {}",
                priority_label(&item.priority),
                risk_label(&item.risk),
                item.estimated_monthly_savings,
                item.resource_name,
                item.description
            );
        }
    }

    for warning in &bundle.document.warnings {
        println!("Warning: {warning}");
    }

    if let Some(md_path) = args.md {
        let markdown = render_cleanup_report(&bundle.document);
        fs::write(&md_path, markdown)
            .with_context(|| format!("failed to write markdown report to {}", md_path.display()))?;
        println!("Markdown report written to {}", md_path.display());
    }

    Ok(())
}

fn priority_label(priority: &Priority) -> &'static str {
    match priority {
        Priority::Critical => "critical",
        Priority::High => "high",
        Priority::Medium => "medium",
        Priority::Low => "low",
    }
}

fn risk_label(risk: &Risk) -> &'static str {
    match risk {
        Risk::Low => "low",
        Risk::Medium => "medium",
        Risk::High => "high",
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
