use tracing::{debug, info};

use crate::{
    batch::MotionSource,
    error::{PlanError, Result},
    manifest::ClipManifest,
};

/// Host timeline that motions are loaded onto, one after another
pub trait TimelineSink {
    /// Load `source` so that it starts at `start_time_ms`
    fn place(&mut self, source: &MotionSource, start_time_ms: i64) -> Result<()>;
}

/// Load every planned clip onto `sink` exactly where the plan put it
///
/// `sources` must be the batch the manifest was planned from. Clips are
/// placed in index order; the first placement failure stops the run, since a
/// partially loaded timeline no longer matches its manifest.
pub fn apply_plan(manifest: &ClipManifest, sources: &[MotionSource], sink: &mut dyn TimelineSink) -> Result<usize> {
    for clip in &manifest.clips {
        let source = sources
            .get(clip.index)
            .filter(|s| s.name == clip.name && s.native_length_ms() == clip.length_ms)
            .ok_or_else(|| PlanError::SourceMismatch {
                index: clip.index,
                name: clip.name.clone(),
            })?;

        debug!("Loading {} at {} ms", source.name, clip.start_time_ms);
        sink.place(source, clip.start_time_ms)?;
    }

    info!("Loaded {} motions onto the timeline", manifest.clips.len());
    Ok(manifest.clips.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SplitterError;
    use crate::planner::plan;

    #[derive(Default)]
    struct RecordingTimeline {
        placed: Vec<(String, i64)>,
    }

    impl TimelineSink for RecordingTimeline {
        fn place(&mut self, source: &MotionSource, start_time_ms: i64) -> Result<()> {
            self.placed.push((source.name.clone(), start_time_ms));
            Ok(())
        }
    }

    fn batch() -> Vec<MotionSource> {
        vec![
            MotionSource::new("walk", "walk.rlmotion", 3000),
            MotionSource::new("run", "run.rlmotion", 2000),
        ]
    }

    #[test]
    fn test_sink_receives_planned_starts() {
        let sources = batch();
        let manifest = plan(&sources, 500, 30.0, "A").unwrap();

        let mut timeline = RecordingTimeline::default();
        assert_eq!(apply_plan(&manifest, &sources, &mut timeline).unwrap(), 2);
        assert_eq!(timeline.placed, vec![("walk".to_string(), 0), ("run".to_string(), 3500)]);
    }

    #[test]
    fn test_reordered_batch_is_rejected() {
        let sources = batch();
        let manifest = plan(&sources, 0, 30.0, "A").unwrap();

        let mut reordered = sources.clone();
        reordered.swap(0, 1);

        let mut timeline = RecordingTimeline::default();
        let err = apply_plan(&manifest, &reordered, &mut timeline).unwrap_err();
        assert!(matches!(err, SplitterError::Plan(PlanError::SourceMismatch { index: 0, .. })));
        assert!(timeline.placed.is_empty());
    }
}
