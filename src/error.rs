use thiserror::Error;

/// Main error type for the motion-splitter library
#[derive(Error, Debug)]
pub enum SplitterError {
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    #[error("Planning error: {0}")]
    Plan(#[from] PlanError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Split error: {0}")]
    Split(#[from] SplitError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while assembling a motion batch
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Unsupported motion format: {path}")]
    UnsupportedFormat { path: String },

    #[error("Motion already in batch: {path}")]
    DuplicateSource { path: String },

    #[error("Batch index {index} out of range (batch has {len} motions)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Could not read motion length for {path}: {reason}")]
    Probe { path: String, reason: String },

    #[error("Failed to scan motion library {path}: {reason}")]
    LibraryScan { path: String, reason: String },
}

/// Errors raised by the clip planner
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Cannot plan an empty batch")]
    EmptyBatch,

    #[error("Motion #{index} '{name}' has invalid length {length_ms} ms")]
    InvalidDuration {
        index: usize,
        name: String,
        length_ms: i64,
    },

    #[error("Invalid frame rate: {fps}")]
    InvalidFps { fps: f64 },

    #[error("Invalid gap between clips: {gap_ms} ms")]
    InvalidGap { gap_ms: i64 },

    #[error("Planned clip #{index} '{name}' has no matching motion in the batch")]
    SourceMismatch { index: usize, name: String },
}

/// Errors raised while reading or writing a clip manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Malformed clip manifest ({context}): {reason}")]
    Parse { context: String, reason: String },

    #[error("Clip manifest not found: {path}")]
    NotFound { path: String },

    #[error("Failed to write clip manifest {path}: {reason}")]
    Write { path: String, reason: String },
}

/// Errors raised while splitting a timeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplitError {
    #[error("Clip #{index} '{name}' starts at frame {start_frame}, outside the {timeline_length}-frame timeline")]
    RangeOutOfBounds {
        index: usize,
        name: String,
        start_frame: i64,
        timeline_length: i64,
    },

    #[error("Clip #{index} '{name}' has no frames at {start_frame}")]
    EmptyRange {
        index: usize,
        name: String,
        start_frame: i64,
    },

    #[error("Marker #{position} at frame {frame} comes before frame {previous}")]
    UnsortedMarkers {
        position: usize,
        frame: i64,
        previous: i64,
    },

    #[error("No timeline markers to split by")]
    EmptyMarkerSet,

    #[error("Invalid timeline: {length_frames} frames at {fps} fps")]
    InvalidTimeline { length_frames: i64, fps: f64 },
}

/// Errors raised by an export sink
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to export track '{name}': {reason}")]
    Failed { name: String, reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using SplitterError
pub type Result<T> = std::result::Result<T, SplitterError>;

impl SplitterError {
    /// Check if this error only affects one clip and the rest of the work can go on
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Split(SplitError::RangeOutOfBounds { .. }) => true,
            Self::Split(SplitError::EmptyRange { .. }) => true,
            Self::Export(ExportError::Failed { .. }) => true,
            // A partially trusted manifest must never be applied
            Self::Manifest(_) => false,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Plan(PlanError::EmptyBatch) => {
                "No motion files added. Add motions to the batch first.".to_string()
            }
            Self::Manifest(ManifestError::NotFound { path }) => {
                format!("No clip metadata found at '{}'.", path)
            }
            Self::Manifest(ManifestError::Parse { context, reason }) => {
                format!("Failed to read clip metadata '{}': {}", context, reason)
            }
            Self::Batch(BatchError::UnsupportedFormat { path }) => {
                format!(
                    "'{}' is not a supported motion file. Supported: .rlmotion, .imotion, .imotionplus, .fbx, .bvh",
                    path
                )
            }
            Self::Split(SplitError::EmptyMarkerSet) => {
                "Add at least one timeline marker to define clips.".to_string()
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_errors_are_recoverable() {
        let err: SplitterError = SplitError::RangeOutOfBounds {
            index: 2,
            name: "jump".to_string(),
            start_frame: 500,
            timeline_length: 450,
        }
        .into();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("jump"));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_manifest_errors_are_fatal() {
        let err: SplitterError = ManifestError::Parse {
            context: "walk_clips.json".to_string(),
            reason: "missing field `clips`".to_string(),
        }
        .into();
        assert!(!err.is_recoverable());
        assert!(err.user_message().contains("walk_clips.json"));
    }
}
