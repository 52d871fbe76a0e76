use serde::{Deserialize, Serialize};

use crate::{
    config::SplitterConfig,
    error::{Result, SplitError},
    timing::{self, FrameRange},
};

/// Length and rate of an imported continuous timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineInfo {
    /// Number of frames; valid frames are `0..length_frames`
    pub length_frames: i64,

    /// Rate the timeline was imported at
    pub fps: f64,
}

impl TimelineInfo {
    pub fn new(length_frames: i64, fps: f64) -> Self {
        Self { length_frames, fps }
    }

    /// Reject negative lengths and unusable frame rates
    pub fn validate(&self) -> Result<()> {
        if self.length_frames < 0 || !timing::is_valid_fps(self.fps) {
            return Err(SplitError::InvalidTimeline {
                length_frames: self.length_frames,
                fps: self.fps,
            }.into());
        }
        Ok(())
    }
}

/// Named marker on the consumer's timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineMarker {
    pub name: String,
    pub frame: i64,
}

impl TimelineMarker {
    pub fn new<S: Into<String>>(name: S, frame: i64) -> Self {
        Self {
            name: name.into(),
            frame,
        }
    }
}

impl std::str::FromStr for TimelineMarker {
    type Err = String;

    /// Parse `name@frame`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, frame) = s
            .rsplit_once('@')
            .ok_or_else(|| format!("expected NAME@FRAME, got '{}'", s))?;
        let frame = frame
            .trim()
            .parse()
            .map_err(|_| format!("invalid frame '{}' in marker '{}'", frame, s))?;
        Ok(Self::new(name.trim(), frame))
    }
}

/// Options for manifest-driven splitting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitOptions {
    /// Re-base every clip so it starts at frame 0
    pub offset_to_zero: bool,

    /// Re-derive frames from milliseconds at the timeline's rate instead of
    /// trusting the manifest's stored frames
    pub override_fps: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            offset_to_zero: true,
            override_fps: true,
        }
    }
}

impl From<&SplitterConfig> for SplitOptions {
    fn from(config: &SplitterConfig) -> Self {
        Self {
            offset_to_zero: config.offset_to_zero,
            override_fps: config.override_fps,
        }
    }
}

/// Which strategy produced a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    Manifest,
    Markers,
}

impl std::fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manifest => write!(f, "manifest"),
            Self::Markers => write!(f, "markers"),
        }
    }
}

/// One clip cut out of the continuous timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitClip {
    /// Position of the clip in its manifest or marker list
    pub index: usize,

    pub name: String,

    /// Frames on the continuous timeline the clip is copied from
    pub source_range: FrameRange,

    /// Frames the clip occupies once extracted
    pub local_range: FrameRange,
}

/// Result of splitting a timeline
///
/// Clips that could not be placed are not fatal; they are listed in
/// `skipped` so the caller can report them.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitReport {
    pub method: SplitMethod,
    pub clips: Vec<SplitClip>,
    pub skipped: Vec<SplitError>,
}

impl SplitReport {
    pub fn new(method: SplitMethod) -> Self {
        Self {
            method,
            clips: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// `(name, local_range)` pairs in output order
    pub fn ranges(&self) -> Vec<(&str, FrameRange)> {
        self.clips
            .iter()
            .map(|c| (c.name.as_str(), c.local_range))
            .collect()
    }

    /// True when no clip was skipped
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
