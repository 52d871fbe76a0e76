use serde::{Deserialize, Serialize};

use crate::{
    splitter::types::{SplitClip, SplitReport},
    timing::FrameRange,
};

/// An independent, re-playable animation unit built from one split clip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub index: usize,
    pub name: String,

    /// Frame the track's strip is placed at
    pub strip_start: i64,

    /// Frames of the extracted clip
    pub frames: FrameRange,

    /// Frames on the continuous timeline the clip came from
    pub source_frames: FrameRange,

    /// Muted tracks do not play by default
    pub muted: bool,
}

impl Track {
    fn from_clip(clip: &SplitClip, muted: bool) -> Self {
        Self {
            index: clip.index,
            name: clip.name.clone(),
            strip_start: clip.local_range.start,
            frames: clip.local_range,
            source_frames: clip.source_range,
            muted,
        }
    }
}

/// Lay split clips out as tracks, one per clip
///
/// Every track is muted except the first, so only one clip plays at a time.
pub fn layout_tracks(report: &SplitReport) -> Vec<Track> {
    report
        .clips
        .iter()
        .enumerate()
        .map(|(position, clip)| Track::from_clip(clip, position != 0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splitter::{split_by_markers, MarkerSplitter, TimelineMarker};
    use crate::config::MarkerOrder;

    #[test]
    fn test_first_track_unmuted() {
        let markers = vec![TimelineMarker::new("idle", 0), TimelineMarker::new("walk", 180)];
        let tracks = layout_tracks(&split_by_markers(300, &markers).unwrap());

        assert_eq!(tracks.len(), 2);
        assert!(!tracks[0].muted);
        assert!(tracks[1].muted);
        assert_eq!(tracks[1].strip_start, 0);
        assert_eq!(tracks[1].source_frames, FrameRange::new(180, 300));
    }

    #[test]
    fn test_strip_keeps_source_position_without_offset() {
        let markers = vec![TimelineMarker::new("idle", 0), TimelineMarker::new("walk", 180)];
        let report = MarkerSplitter::new(MarkerOrder::Sort, false).split(300, &markers).unwrap();
        let tracks = layout_tracks(&report);

        assert_eq!(tracks[1].strip_start, 180);
        assert_eq!(tracks[1].frames, FrameRange::new(180, 300));
    }
}
