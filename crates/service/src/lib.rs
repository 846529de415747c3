pub mod service;

pub use service::{
    build_cleanup_bundle, load_snapshot, write_artifacts, ArtifactPaths, CleanupBundle, PLAN_FILE,
    REPORT_FILE,
};
