use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::Result,
    manifest::{self, ClipManifest},
    splitter::{
        export_tracks, layout_tracks, repeated_names, ExportReport, ExportSink, ManifestSplitter,
        MarkerSplitter, SplitMethod, SplitOptions, SplitReport, TimelineInfo, TimelineMarker,
        Track,
    },
};

/// Result of a split run
#[derive(Debug)]
pub struct SplitOutcome {
    /// Strategy used, `None` when there was nothing to split by
    pub method: Option<SplitMethod>,

    /// No manifest was found beside the animation
    pub manifest_missing: bool,

    /// Frame rate the manifest was authored at, when one was used
    pub manifest_fps: Option<f64>,

    /// Frame rate of the timeline the clips were cut from
    pub timeline_fps: f64,

    pub report: Option<SplitReport>,
    pub tracks: Vec<Track>,
    pub export: Option<ExportReport>,

    /// The continuous source animation should be left in place
    pub keep_original_action: bool,
}

impl SplitOutcome {
    fn empty(timeline_fps: f64, keep_original_action: bool) -> Self {
        Self {
            method: None,
            manifest_missing: true,
            manifest_fps: None,
            timeline_fps,
            report: None,
            tracks: Vec::new(),
            export: None,
            keep_original_action,
        }
    }

    /// Number of clips extracted
    pub fn clip_count(&self) -> usize {
        self.report.as_ref().map(|r| r.len()).unwrap_or(0)
    }
}

/// Consumer-side pipeline: recovers clips from an imported continuous timeline
///
/// Steps:
/// 1. Manifest - find `<basename>_clips.json` or use the given path
/// 2. Split - cut by manifest, or by markers when no manifest exists
/// 3. Tracks - lay clips out as one track each (optional)
/// 4. Export - hand tracks to an export sink (optional)
pub struct SplitPipeline {
    config: Config,
}

impl SplitPipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Split the timeline imported from `animation_path`
    ///
    /// A manifest that exists but fails validation is fatal. Without a
    /// manifest, `markers` are used if there are any; otherwise the outcome
    /// is empty and flags `manifest_missing`.
    pub fn run<P: AsRef<Path>>(
        &self,
        animation_path: P,
        manifest_path: Option<&Path>,
        timeline: TimelineInfo,
        markers: &[TimelineMarker],
        sink: Option<&mut dyn ExportSink>,
    ) -> Result<SplitOutcome> {
        let animation_path = animation_path.as_ref();
        let splitter_config = &self.config.splitter;

        info!("✂️  Splitting {:?} ({} frames @ {} fps)",
              animation_path, timeline.length_frames, timeline.fps);

        // Step 1: Manifest
        let manifest = match self.locate_manifest(animation_path, manifest_path) {
            Some(path) => Some(manifest::read_manifest(&path)?),
            None => None,
        };

        // Step 2: Split
        let (report, manifest_fps) = match &manifest {
            Some(manifest) => (self.split_by_manifest(&timeline, manifest)?, Some(manifest.fps)),
            None if !markers.is_empty() => {
                info!("No clip manifest found, splitting by {} timeline markers", markers.len());
                timeline.validate()?;
                let report = MarkerSplitter::from_config(splitter_config)
                    .split(timeline.length_frames, markers)?;
                (report, None)
            }
            None => {
                warn!("No clip metadata found for {:?}", animation_path);
                return Ok(SplitOutcome::empty(timeline.fps, splitter_config.keep_original_action));
            }
        };

        for skipped in &report.skipped {
            warn!("Skipped: {}", skipped);
        }

        // Step 3: Tracks
        let tracks = if splitter_config.create_tracks {
            let tracks = layout_tracks(&report);
            let repeated = repeated_names(&tracks);
            if !repeated.is_empty() {
                warn!("Repeated clip names: {}", repeated.join(", "));
            }
            tracks
        } else {
            debug!("Track creation disabled");
            Vec::new()
        };

        // Step 4: Export
        if sink.is_some() && !splitter_config.create_tracks {
            warn!("Track creation is disabled, nothing will be exported");
        }
        let export = sink.map(|sink| export_tracks(&tracks, timeline.fps, sink));

        info!("✅ Created {} clips by {}", report.len(), report.method);
        Ok(SplitOutcome {
            method: Some(report.method),
            manifest_missing: manifest.is_none(),
            manifest_fps,
            timeline_fps: timeline.fps,
            report: Some(report),
            tracks,
            export,
            keep_original_action: splitter_config.keep_original_action,
        })
    }

    fn locate_manifest(&self, animation_path: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            // An explicit path is always read, so a missing file surfaces as NotFound
            Some(path) => Some(path.to_path_buf()),
            None => manifest::find_sidecar(animation_path),
        }
    }

    fn split_by_manifest(&self, timeline: &TimelineInfo, manifest: &ClipManifest) -> Result<SplitReport> {
        let options = SplitOptions::from(&self.config.splitter);
        if !options.override_fps && manifest.fps != timeline.fps {
            warn!("Manifest was authored at {} fps but the timeline runs at {} fps",
                  manifest.fps, timeline.fps);
        }
        ManifestSplitter::new(options).split(timeline, manifest)
    }
}
