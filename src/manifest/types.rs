use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;

use crate::{
    error::{ManifestError, Result},
    planner::ClipPlan,
    timing,
};

/// Manifest format version written by the planner
pub const MANIFEST_VERSION: &str = "1.0";

/// Serialized description of clips placed on one continuous timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipManifest {
    pub version: String,

    /// Tool that produced the manifest
    pub source: String,

    pub avatar_name: String,

    /// Frame rate the clip frames were computed at
    #[serde(serialize_with = "serialize_fps")]
    pub fps: f64,

    pub total_frames: i64,
    pub clip_count: usize,

    /// Clips in index order
    pub clips: Vec<ClipPlan>,
}

impl ClipManifest {
    /// Build a manifest around planned clips, deriving the totals
    pub fn new(source: &str, avatar_name: &str, fps: f64, clips: Vec<ClipPlan>) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            source: source.to_string(),
            avatar_name: avatar_name.to_string(),
            fps,
            total_frames: clips.iter().map(|c| c.end_frame).max().unwrap_or(0),
            clip_count: clips.len(),
            clips,
        }
    }

    /// Parse and validate a manifest from JSON text
    ///
    /// `context` names the document in error messages (usually its path).
    pub fn from_json(json: &str, context: &str) -> Result<Self> {
        let document: ManifestDocument = serde_json::from_str(json)
            .map_err(|e| parse_error(context, e.to_string()))?;

        Self::from_document(document, context)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ManifestError::Write {
                path: "<memory>".to_string(),
                reason: e.to_string(),
            }.into())
    }

    /// Seconds covered by the whole timeline
    pub fn duration_secs(&self) -> f64 {
        if timing::is_valid_fps(self.fps) {
            self.total_frames as f64 / self.fps
        } else {
            0.0
        }
    }

    /// One-line description, e.g. `3 clips | 450 frames | 15.0s`
    pub fn summary(&self) -> String {
        if self.clips.is_empty() {
            return "No clips loaded".to_string();
        }

        format!("{} clips | {} frames | {:.1}s", self.clip_count, self.total_frames, self.duration_secs())
    }

    /// Look up a clip by name
    pub fn clip(&self, name: &str) -> Option<&ClipPlan> {
        self.clips.iter().find(|c| c.name == name)
    }

    fn from_document(document: ManifestDocument, context: &str) -> Result<Self> {
        if !timing::is_valid_fps(document.fps) {
            return Err(parse_error(context, format!("fps must be positive, got {}", document.fps)));
        }

        if let Some(count) = document.clip_count {
            if count != document.clips.len() {
                return Err(parse_error(
                    context,
                    format!("clip_count is {} but {} clips are listed", count, document.clips.len()),
                ));
            }
        }

        let mut seen = HashSet::new();
        let mut clips = Vec::with_capacity(document.clips.len());

        for (position, entry) in document.clips.into_iter().enumerate() {
            let index = entry.index.unwrap_or(position);
            if !seen.insert(index) {
                return Err(parse_error(context, format!("duplicate clip index {}", index)));
            }

            clips.push(entry.into_plan(index, context)?);
        }

        clips.sort_by_key(|c| c.index);

        let max_end = clips.iter().map(|c| c.end_frame).max().unwrap_or(0);
        if document.total_frames != max_end {
            return Err(parse_error(
                context,
                format!("total_frames is {} but clips end at frame {}", document.total_frames, max_end),
            ));
        }

        Ok(Self {
            version: document.version.unwrap_or_else(|| MANIFEST_VERSION.to_string()),
            source: document.source.unwrap_or_default(),
            avatar_name: document.avatar_name.unwrap_or_default(),
            fps: document.fps,
            total_frames: document.total_frames,
            clip_count: clips.len(),
            clips,
        })
    }
}

/// Manifest as found on disk, before validation
#[derive(Debug, Deserialize)]
struct ManifestDocument {
    version: Option<String>,
    source: Option<String>,
    avatar_name: Option<String>,
    fps: f64,
    total_frames: i64,
    clip_count: Option<usize>,
    clips: Vec<ClipEntry>,
}

#[derive(Debug, Deserialize)]
struct ClipEntry {
    index: Option<usize>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    source_file: String,
    start_time_ms: i64,
    length_ms: i64,
    start_frame: i64,
    end_frame: i64,
    length_frames: Option<i64>,
}

impl ClipEntry {
    fn into_plan(self, index: usize, context: &str) -> Result<ClipPlan> {
        let name = if self.name.trim().is_empty() {
            format!("Clip_{}", index)
        } else {
            self.name
        };

        let invalid = |reason: String| parse_error(context, format!("clip #{} '{}': {}", index, name, reason));

        if self.start_time_ms < 0 || self.length_ms < 0 {
            return Err(invalid(format!(
                "negative time (start {} ms, length {} ms)",
                self.start_time_ms, self.length_ms
            )));
        }

        if self.start_time_ms.checked_add(self.length_ms).is_none() {
            return Err(invalid(format!(
                "clip end overflows (start {} ms, length {} ms)",
                self.start_time_ms, self.length_ms
            )));
        }

        if self.start_frame < 0 || self.end_frame < self.start_frame {
            return Err(invalid(format!("invalid frame range {}-{}", self.start_frame, self.end_frame)));
        }

        let length_frames = self.length_frames.unwrap_or(self.end_frame - self.start_frame);
        if length_frames != self.end_frame - self.start_frame {
            return Err(invalid(format!(
                "length_frames {} does not match frames {}-{}",
                length_frames, self.start_frame, self.end_frame
            )));
        }

        Ok(ClipPlan {
            index,
            name,
            source_path: self.source_file,
            start_time_ms: self.start_time_ms,
            length_ms: self.length_ms,
            start_frame: self.start_frame,
            end_frame: self.end_frame,
            length_frames,
        })
    }
}

impl<'de> Deserialize<'de> for ClipManifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let document = ManifestDocument::deserialize(deserializer)?;
        Self::from_document(document, "manifest").map_err(serde::de::Error::custom)
    }
}

fn parse_error<S: Into<String>>(context: &str, reason: S) -> crate::SplitterError {
    ManifestError::Parse {
        context: context.to_string(),
        reason: reason.into(),
    }.into()
}

/// Whole-number rates are written as JSON integers (`30`, not `30.0`)
fn serialize_fps<S: Serializer>(fps: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if fps.is_finite() && fps.fract() == 0.0 && fps.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*fps as i64)
    } else {
        serializer.serialize_f64(*fps)
    }
}
