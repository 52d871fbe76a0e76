use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{
    batch::MotionBatch,
    config::Config,
    error::{PlanError, Result},
    manifest::{self, ClipManifest},
    planner::{apply_plan, ClipPlanner, TimelineSink},
};

/// Result of a planning run
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub manifest: ClipManifest,

    /// Where the manifest was written
    pub manifest_path: PathBuf,

    /// Number of motions handed to the timeline sink, 0 without a sink
    pub placed: usize,
}

/// Producer-side pipeline: plans a batch and writes its manifest
///
/// The pipeline follows a clear sequence:
/// 1. Planning - compute clip placement for the batch
/// 2. Timeline - load the motions onto the host timeline (optional)
/// 3. Manifest - write `<basename>_clips.json` beside the export
pub struct PlanPipeline {
    config: Config,
}

impl PlanPipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Plan `batch`, load it onto `timeline` if given, and write the manifest
    /// belonging to `export_path`
    ///
    /// A missing `.fbx` extension is added to `export_path`.
    pub fn run<P: AsRef<Path>>(
        &self,
        batch: &MotionBatch,
        timeline: Option<&mut dyn TimelineSink>,
        export_path: P,
    ) -> Result<PlanOutcome> {
        let export_path = with_fbx_extension(export_path.as_ref());

        info!("🎬 Planning {} motions for {:?}", batch.len(), export_path);

        // Step 1: Planning
        let manifest = self.plan(batch)?;

        // Step 2: Timeline
        let placed = match timeline {
            Some(sink) => {
                info!("⏱️  Loading motions onto the timeline...");
                apply_plan(&manifest, batch.sources(), sink)?
            }
            None => {
                debug!("No timeline sink given, skipping placement");
                0
            }
        };

        // Step 3: Manifest
        let manifest_path = manifest::sidecar_path(&export_path);
        manifest::write_manifest(&manifest, &manifest_path)?;

        info!("✅ {} -> {:?}", manifest.summary(), manifest_path);
        Ok(PlanOutcome {
            manifest,
            manifest_path,
            placed,
        })
    }

    /// Plan `batch` without touching any file
    pub fn plan(&self, batch: &MotionBatch) -> Result<ClipManifest> {
        if batch.is_empty() {
            return Err(PlanError::EmptyBatch.into());
        }

        let planner = ClipPlanner::from_config(&self.config.planner);
        debug!("Planner: {} fps, {} ms gap", planner.fps(), planner.gap_ms());
        planner.plan(batch.sources())
    }
}

fn with_fbx_extension(path: &Path) -> PathBuf {
    let is_fbx = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("fbx"))
        .unwrap_or(false);

    if is_fbx {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".fbx");
        PathBuf::from(name)
    }
}
