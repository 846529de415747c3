use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cloudsweep_core::{
    build_plan_document, classify_snapshot, render_cleanup_report, synthesize_scripts,
    CleanupPlanDocument, PlanOptions, ScriptBundle, Snapshot,
};
use tracing::info;

pub const PLAN_FILE: &str = "cleanup_plan.json";
pub const REPORT_FILE: &str = "cleanup_report.md";

/// Everything one classification run hands over for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanupBundle {
    pub document: CleanupPlanDocument,
    pub scripts: ScriptBundle,
    pub report: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub plan: PathBuf,
    pub scripts: Vec<PathBuf>,
    pub report: PathBuf,
}

pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Snapshot> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let snapshot = Snapshot::from_json(&data)
        .with_context(|| format!("failed to decode snapshot {}", path.display()))?;
    Ok(snapshot)
}

/// Runs the whole derivation pipeline: classification, plan building,
/// script synthesis, report rendering. Sequential and side-effect free;
/// each invocation works from its own snapshot.
pub fn build_cleanup_bundle(snapshot: &Snapshot, options: &PlanOptions) -> CleanupBundle {
    let classification = classify_snapshot(snapshot);
    let scripts = synthesize_scripts(&classification.items);
    let document = build_plan_document(classification.items, classification.warnings, options);
    let report = render_cleanup_report(&document);

    info!(
        items = document.plan.summary.total_items,
        warnings = document.warnings.len(),
        "cleanup bundle built"
    );

    CleanupBundle {
        document,
        scripts,
        report,
    }
}

/// Writes the plan document, the five scripts, and the markdown report
/// into `output_dir`, creating it if needed. Scripts are marked
/// executable so they can be handed straight to an operator.
pub fn write_artifacts(bundle: &CleanupBundle, output_dir: impl AsRef<Path>) -> Result<ArtifactPaths> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let plan_path = output_dir.join(PLAN_FILE);
    let payload = serde_json::to_string_pretty(&bundle.document)
        .context("failed to serialize cleanup plan")?;
    fs::write(&plan_path, payload)
        .with_context(|| format!("failed to write plan to {}", plan_path.display()))?;

    let mut script_paths = Vec::new();
    for script in &bundle.scripts.scripts {
        let script_path = output_dir.join(&script.file_name);
        fs::write(&script_path, &script.body)
            .with_context(|| format!("failed to write script {}", script_path.display()))?;
        mark_executable(&script_path)?;
        script_paths.push(script_path);
    }

    let report_path = output_dir.join(REPORT_FILE);
    fs::write(&report_path, &bundle.report)
        .with_context(|| format!("failed to write report to {}", report_path.display()))?;

    info!(directory = %output_dir.display(), "cleanup artifacts written");

    Ok(ArtifactPaths {
        plan: plan_path,
        scripts: script_paths,
        report: report_path,
    })
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("failed to mark {} executable", path.display()))
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}
