//! # Timing
//!
//! Conversion between the millisecond domain motions are authored in and the
//! integer frame domain timelines are keyed in.
//!
//! Every conversion in the crate goes through [`ms_to_frames`], which rounds
//! half away from zero. The planner and the splitter share it, so a manifest
//! split against a timeline at its own frame rate reproduces the planned
//! boundaries exactly.

use serde::{Deserialize, Serialize};

/// Convert a millisecond time to the nearest frame at `fps`
///
/// Rounds half away from zero (`f64::round`).
pub fn ms_to_frames(ms: i64, fps: f64) -> i64 {
    (ms as f64 * fps / 1000.0).round() as i64
}

/// Frame range covered by `length_ms` starting at `start_ms`
///
/// Both boundaries are rounded from milliseconds, so ranges of back-to-back
/// spans never overlap, whatever their fractional frame parts. The end time
/// saturates at `i64::MAX` instead of overflowing.
pub fn span_to_frames(start_ms: i64, length_ms: i64, fps: f64) -> FrameRange {
    FrameRange::new(ms_to_frames(start_ms, fps), ms_to_frames(start_ms.saturating_add(length_ms), fps))
}

/// Convert a frame count at `fps` to milliseconds, truncating toward zero
pub fn frames_to_ms(frames: i64, fps: f64) -> i64 {
    if fps <= 0.0 {
        return 0;
    }
    (frames as f64 / fps * 1000.0) as i64
}

/// Check that a frame rate can be used for conversion
pub fn is_valid_fps(fps: f64) -> bool {
    fps.is_finite() && fps > 0.0
}

/// Half-open frame range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: i64,
    pub end: i64,
}

impl FrameRange {
    /// Create a range, collapsing an inverted one to empty at `start`
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Number of frames covered
    pub fn len(&self) -> i64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check whether a frame falls inside the range
    pub fn contains(&self, frame: i64) -> bool {
        frame >= self.start && frame < self.end
    }

    /// Check whether two ranges share at least one frame
    pub fn overlaps(&self, other: &FrameRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }

    /// Limit the end of the range to `limit`
    pub fn clamp_end(&self, limit: i64) -> Self {
        Self::new(self.start, self.end.min(limit))
    }

    /// The same length, re-based so it starts at frame 0
    pub fn rebased(&self) -> Self {
        Self::new(0, self.len())
    }
}

impl std::fmt::Display for FrameRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
