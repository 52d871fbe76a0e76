use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    batch::MotionSource,
    config::PlannerConfig,
    error::{PlanError, Result},
    manifest::ClipManifest,
    timing::{self, FrameRange},
};

/// One motion placed on the combined timeline
///
/// Serialized as an entry of the manifest's `clips` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipPlan {
    /// Position in playback order, 0-based
    pub index: usize,

    pub name: String,

    /// Provenance of the motion, copied verbatim
    #[serde(rename = "source_file")]
    pub source_path: String,

    pub start_time_ms: i64,
    pub length_ms: i64,

    pub start_frame: i64,
    pub end_frame: i64,
    pub length_frames: i64,
}

impl ClipPlan {
    /// Place `source` at `start_time_ms` on a timeline running at `fps`
    pub fn place(index: usize, source: &MotionSource, start_time_ms: i64, fps: f64) -> Self {
        let length_ms = source.native_length_ms();
        let frames = timing::span_to_frames(start_time_ms, length_ms, fps);

        Self {
            index,
            name: source.name.clone(),
            source_path: source.origin_path.clone(),
            start_time_ms,
            length_ms,
            start_frame: frames.start,
            end_frame: frames.end,
            length_frames: frames.len(),
        }
    }

    /// Frame range `[start_frame, end_frame)`
    pub fn frame_range(&self) -> FrameRange {
        FrameRange::new(self.start_frame, self.end_frame)
    }

    /// First millisecond after the clip, saturating at `i64::MAX`
    pub fn end_time_ms(&self) -> i64 {
        self.start_time_ms.saturating_add(self.length_ms)
    }
}

/// Computes clip placement for a batch of motions
#[derive(Debug, Clone)]
pub struct ClipPlanner {
    fps: f64,
    gap_ms: i64,
    source: String,
    avatar_name: String,
}

impl ClipPlanner {
    /// Create a planner for a timeline at `fps` with `gap_ms` between clips
    pub fn new(fps: f64, gap_ms: i64) -> Self {
        let defaults = PlannerConfig::default();
        Self {
            fps,
            gap_ms,
            source: defaults.source,
            avatar_name: defaults.avatar_name,
        }
    }

    /// Create a planner from configuration
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            fps: config.fps,
            gap_ms: config.effective_gap_ms(),
            source: config.source.clone(),
            avatar_name: config.avatar_name.clone(),
        }
    }

    /// Set the character name recorded in the manifest
    pub fn with_avatar<S: Into<String>>(mut self, avatar_name: S) -> Self {
        self.avatar_name = avatar_name.into();
        self
    }

    /// Set the provenance label recorded in the manifest
    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = source.into();
        self
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn gap_ms(&self) -> i64 {
        self.gap_ms
    }

    /// Plan `sources` in the given order
    ///
    /// Fails on an empty batch, a non-positive motion length, a non-positive
    /// frame rate or a negative gap.
    pub fn plan(&self, sources: &[MotionSource]) -> Result<ClipManifest> {
        if !timing::is_valid_fps(self.fps) {
            return Err(PlanError::InvalidFps { fps: self.fps }.into());
        }

        if self.gap_ms < 0 {
            return Err(PlanError::InvalidGap { gap_ms: self.gap_ms }.into());
        }

        if sources.is_empty() {
            return Err(PlanError::EmptyBatch.into());
        }

        if let Some((index, source)) = sources
            .iter()
            .enumerate()
            .find(|(_, s)| s.native_length_ms() <= 0)
        {
            return Err(PlanError::InvalidDuration {
                index,
                name: source.name.clone(),
                length_ms: source.native_length_ms(),
            }.into());
        }

        let mut clips = Vec::with_capacity(sources.len());
        let mut current_time_ms = 0i64;

        for (index, source) in sources.iter().enumerate() {
            // The motion has to end inside the millisecond range
            if current_time_ms.checked_add(source.native_length_ms()).is_none() {
                return Err(PlanError::InvalidDuration {
                    index,
                    name: source.name.clone(),
                    length_ms: source.native_length_ms(),
                }.into());
            }

            let clip = ClipPlan::place(index, source, current_time_ms, self.fps);
            debug!("Planned {} | frames {}-{} ({} ms at {} ms)",
                   clip.name, clip.start_frame, clip.end_frame, clip.length_ms, clip.start_time_ms);

            current_time_ms = clip.end_time_ms().saturating_add(self.gap_ms);
            clips.push(clip);
        }

        let manifest = ClipManifest::new(&self.source, &self.avatar_name, self.fps, clips);

        info!("Planned {} clips: {}", manifest.clip_count, manifest.summary());
        Ok(manifest)
    }
}

/// Plan `sources` on one timeline at `fps`, leaving `gap_ms` between clips
pub fn plan(sources: &[MotionSource], gap_ms: i64, fps: f64, avatar_name: &str) -> Result<ClipManifest> {
    ClipPlanner::new(fps, gap_ms).with_avatar(avatar_name).plan(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SplitterError;

    fn sources(lengths: &[i64]) -> Vec<MotionSource> {
        lengths
            .iter()
            .enumerate()
            .map(|(i, &ms)| MotionSource::new(format!("clip{}", i), format!("m/clip{}.rlmotion", i), ms))
            .collect()
    }

    #[test]
    fn test_gap_inserted_between_clips() {
        let manifest = plan(&sources(&[3000, 2000]), 500, 30.0, "Kate").unwrap();

        assert_eq!(manifest.clips[0].start_time_ms, 0);
        assert_eq!(manifest.clips[1].start_time_ms, 3500);
        assert_eq!(manifest.clips[0].frame_range(), FrameRange::new(0, 90));
        assert_eq!(manifest.clips[1].frame_range(), FrameRange::new(105, 165));
        assert_eq!(manifest.total_frames, 165);
        assert_eq!(manifest.avatar_name, "Kate");
    }

    #[test]
    fn test_no_gap_after_last_clip() {
        let manifest = plan(&sources(&[1000]), 5000, 30.0, "Kate").unwrap();
        assert_eq!(manifest.total_frames, 30);
        assert_eq!(manifest.clip_count, 1);
    }

    #[test]
    fn test_ranges_do_not_overlap() {
        let lengths = [1033, 17, 2501, 999, 20, 20, 20, 7777, 1234, 50, 3333];
        for &fps in &[24.0, 25.0, 29.97, 30.0, 60.0] {
            for &gap in &[0, 16, 500] {
                let manifest = plan(&sources(&lengths), gap, fps, "A").unwrap();

                for pair in manifest.clips.windows(2) {
                    assert!(pair[0].index < pair[1].index);
                    assert!(pair[0].end_frame <= pair[1].start_frame,
                            "overlap at fps {} gap {}: {:?} / {:?}", fps, gap, pair[0], pair[1]);
                }

                let last = manifest.clips.last().unwrap();
                assert_eq!(last.end_frame, manifest.total_frames);
                assert_eq!(manifest.clip_count, lengths.len());
            }
        }
    }

    #[test]
    fn test_start_frames_do_not_drift() {
        // 33 ms clips at 30 fps round to 1 frame each; summing rounded
        // frame counts would drift away from the millisecond timeline.
        let manifest = plan(&sources(&[33; 100]), 0, 30.0, "A").unwrap();
        let last = manifest.clips.last().unwrap();
        assert_eq!(last.start_time_ms, 3267);
        assert_eq!(last.start_frame, 98);
    }

    #[test]
    fn test_preserves_input_order() {
        let batch = vec![
            MotionSource::new("walk", "walk.fbx", 1000),
            MotionSource::new("walk_1", "walk.fbx", 1000),
            MotionSource::new("idle", "idle.fbx", 500),
        ];
        let manifest = plan(&batch, 0, 30.0, "A").unwrap();
        let names: Vec<&str> = manifest.clips.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["walk", "walk_1", "idle"]);
        assert_eq!(manifest.clips[1].source_path, "walk.fbx");
    }

    #[test]
    fn test_empty_batch_fails() {
        let err = plan(&[], 0, 30.0, "A").unwrap_err();
        assert!(matches!(err, SplitterError::Plan(PlanError::EmptyBatch)));
    }

    #[test]
    fn test_invalid_duration_fails() {
        let err = plan(&sources(&[1000, 0, 2000]), 0, 30.0, "A").unwrap_err();
        match err {
            SplitterError::Plan(PlanError::InvalidDuration { index, name, length_ms }) => {
                assert_eq!(index, 1);
                assert_eq!(name, "clip1");
                assert_eq!(length_ms, 0);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_timeline_overflow_fails() {
        let err = plan(&sources(&[i64::MAX, 1]), 0, 30.0, "A").unwrap_err();
        assert!(matches!(
            err,
            SplitterError::Plan(PlanError::InvalidDuration { index: 1, length_ms: 1, .. })
        ));

        // The gap alone pushes the second start past the end
        let err = plan(&sources(&[i64::MAX - 10, 1]), 100, 30.0, "A").unwrap_err();
        assert!(matches!(err, SplitterError::Plan(PlanError::InvalidDuration { index: 1, .. })));

        // A single motion right up to the limit still plans
        assert!(plan(&sources(&[i64::MAX]), 500, 30.0, "A").is_ok());
    }

    #[test]
    fn test_invalid_fps_and_gap_fail() {
        assert!(plan(&sources(&[1000]), 0, 0.0, "A").is_err());
        assert!(plan(&sources(&[1000]), -1, 30.0, "A").is_err());
    }

    #[test]
    fn test_planner_from_config() {
        let mut config = PlannerConfig::default();
        config.fps = 60.0;
        config.gap_frames = Some(30);
        config.source = "iClone Motion Batch Loader".to_string();

        let planner = ClipPlanner::from_config(&config);
        assert_eq!(planner.gap_ms(), 500);

        let manifest = planner.plan(&sources(&[1000, 1000])).unwrap();
        assert_eq!(manifest.source, "iClone Motion Batch Loader");
        assert_eq!(manifest.clips[1].start_frame, 90);
    }
}
