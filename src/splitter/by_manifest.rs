use tracing::{debug, info, warn};

use crate::{
    error::{Result, SplitError},
    manifest::ClipManifest,
    planner::ClipPlan,
    splitter::types::{SplitClip, SplitMethod, SplitOptions, SplitReport, TimelineInfo},
    timing::{self, FrameRange},
};

/// Splits a timeline using the clip boundaries recorded in a manifest
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestSplitter {
    options: SplitOptions,
}

impl ManifestSplitter {
    pub fn new(options: SplitOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> SplitOptions {
        self.options
    }

    /// Cut `timeline` into the clips described by `manifest`
    ///
    /// Clips are emitted in manifest index order. A clip starting at or past
    /// the end of the timeline is skipped and recorded in the report; clip ends
    /// are clamped to the timeline length.
    pub fn split(&self, timeline: &TimelineInfo, manifest: &ClipManifest) -> Result<SplitReport> {
        timeline.validate()?;

        if self.options.override_fps && manifest.fps != timeline.fps {
            info!("Re-deriving clip frames from {} fps manifest at {} fps timeline",
                  manifest.fps, timeline.fps);
        }

        let mut clips: Vec<&ClipPlan> = manifest.clips.iter().collect();
        clips.sort_by_key(|c| c.index);

        let mut report = SplitReport::new(SplitMethod::Manifest);

        for clip in clips {
            let source_range = self.source_range(clip, timeline);

            if source_range.start >= timeline.length_frames {
                let err = SplitError::RangeOutOfBounds {
                    index: clip.index,
                    name: clip.name.clone(),
                    start_frame: source_range.start,
                    timeline_length: timeline.length_frames,
                };
                warn!("Skipping clip: {}", err);
                report.skipped.push(err);
                continue;
            }

            let clamped = source_range.clamp_end(timeline.length_frames);
            if clamped != source_range {
                debug!("Clamped clip '{}' end from {} to {}", clip.name, source_range.end, clamped.end);
            }

            let local_range = if self.options.offset_to_zero {
                clamped.rebased()
            } else {
                clamped
            };

            debug!("Split '{}' frames {} -> {}", clip.name, clamped, local_range);
            report.clips.push(SplitClip {
                index: clip.index,
                name: clip.name.clone(),
                source_range: clamped,
                local_range,
            });
        }

        info!("Split {} clips from manifest ({} skipped)", report.clips.len(), report.skipped.len());
        Ok(report)
    }

    fn source_range(&self, clip: &ClipPlan, timeline: &TimelineInfo) -> FrameRange {
        if self.options.override_fps {
            timing::span_to_frames(clip.start_time_ms, clip.length_ms, timeline.fps)
        } else {
            clip.frame_range()
        }
    }
}

/// Split a `timeline_length_frames`-frame timeline at `timeline_fps` by `manifest`
pub fn split_by_manifest(
    timeline_length_frames: i64,
    timeline_fps: f64,
    manifest: &ClipManifest,
    offset_to_zero: bool,
    override_fps: bool,
) -> Result<SplitReport> {
    ManifestSplitter::new(SplitOptions { offset_to_zero, override_fps })
        .split(&TimelineInfo::new(timeline_length_frames, timeline_fps), manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::MotionSource;
    use crate::planner::plan;

    fn planned(lengths: &[i64], gap_ms: i64, fps: f64) -> ClipManifest {
        let sources: Vec<MotionSource> = lengths
            .iter()
            .enumerate()
            .map(|(i, &ms)| MotionSource::new(format!("clip{}", i), format!("clip{}.fbx", i), ms))
            .collect();
        plan(&sources, gap_ms, fps, "A").unwrap()
    }

    #[test]
    fn test_round_trip_at_same_fps() {
        let lengths = [1033, 20, 20, 2501, 999, 50, 7777];
        let manifest = planned(&lengths, 16, 30.0);

        for &override_fps in &[false, true] {
            let report = split_by_manifest(manifest.total_frames, 30.0, &manifest, false, override_fps).unwrap();

            assert!(report.is_complete());
            assert_eq!(report.clips.len(), lengths.len());
            for (clip, plan) in report.clips.iter().zip(&manifest.clips) {
                assert_eq!(clip.source_range, plan.frame_range());
                assert_eq!(clip.local_range, plan.frame_range());
            }
        }
    }

    #[test]
    fn test_fps_override_rescales_frames() {
        let manifest = planned(&[2000], 0, 60.0);
        assert_eq!(manifest.clips[0].length_frames, 120);

        let report = split_by_manifest(60, 30.0, &manifest, true, true).unwrap();
        assert_eq!(report.clips[0].local_range.len(), 60);
        assert_eq!(report.clips[0].source_range, FrameRange::new(0, 60));
    }

    #[test]
    fn test_without_override_trusts_stored_frames() {
        let manifest = planned(&[2000], 0, 60.0);
        let report = split_by_manifest(200, 30.0, &manifest, true, false).unwrap();
        assert_eq!(report.clips[0].local_range, FrameRange::new(0, 120));
    }

    #[test]
    fn test_offset_to_zero_rebases_ranges() {
        let manifest = planned(&[3000, 2000], 500, 30.0);
        let report = split_by_manifest(165, 30.0, &manifest, true, false).unwrap();

        assert_eq!(report.ranges(), vec![
            ("clip0", FrameRange::new(0, 90)),
            ("clip1", FrameRange::new(0, 60)),
        ]);
        assert_eq!(report.clips[1].source_range, FrameRange::new(105, 165));
    }

    #[test]
    fn test_out_of_bounds_clip_is_skipped() {
        let manifest = planned(&[3000, 2000, 1000], 0, 30.0);
        // Timeline only reaches the middle of the second clip
        let report = split_by_manifest(120, 30.0, &manifest, false, false).unwrap();

        assert_eq!(report.clips.len(), 2);
        assert_eq!(report.clips[0].source_range, FrameRange::new(0, 90));
        // Second clip clamped to the timeline end
        assert_eq!(report.clips[1].source_range, FrameRange::new(90, 120));

        assert_eq!(report.skipped, vec![SplitError::RangeOutOfBounds {
            index: 2,
            name: "clip2".to_string(),
            start_frame: 150,
            timeline_length: 120,
        }]);
    }

    #[test]
    fn test_emits_in_index_order() {
        let mut manifest = planned(&[1000, 1000, 1000], 0, 30.0);
        manifest.clips.reverse();

        let report = split_by_manifest(90, 30.0, &manifest, false, false).unwrap();
        let indices: Vec<usize> = report.clips.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_extreme_start_is_skipped() {
        let far = MotionSource::new("far", "far.fbx", 1);
        let clip = ClipPlan::place(0, &far, i64::MAX, 30.0);
        let manifest = ClipManifest::new("test", "A", 30.0, vec![clip]);

        let report = split_by_manifest(100, 30.0, &manifest, true, true).unwrap();
        assert!(report.clips.is_empty());
        assert!(matches!(report.skipped[0], SplitError::RangeOutOfBounds { index: 0, .. }));
    }

    #[test]
    fn test_invalid_timeline_is_fatal() {
        let manifest = planned(&[1000], 0, 30.0);
        assert!(split_by_manifest(-5, 30.0, &manifest, true, true).is_err());
        assert!(split_by_manifest(30, 0.0, &manifest, true, true).is_err());
    }
}
