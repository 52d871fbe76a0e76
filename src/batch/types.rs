use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Motion file extensions accepted by default (lowercase, without the dot)
pub const DEFAULT_EXTENSIONS: &[&str] = &["rlmotion", "imotion", "imotionplus", "fbx", "bvh"];

/// One input motion before it is placed on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionSource {
    /// Display name, unique within its batch
    pub name: String,

    /// Where the motion came from; copied verbatim into the manifest
    pub origin_path: String,

    /// Intrinsic duration in milliseconds as reported by the probe
    native_length_ms: i64,
}

impl MotionSource {
    /// Create a motion source
    pub fn new<N: Into<String>, P: Into<String>>(name: N, origin_path: P, native_length_ms: i64) -> Self {
        Self {
            name: name.into(),
            origin_path: origin_path.into(),
            native_length_ms,
        }
    }

    /// Create a source named after the file stem of `path`
    pub fn from_path<P: AsRef<Path>>(path: P, native_length_ms: i64) -> Self {
        let path = path.as_ref();
        Self::new(stem_name(path), path.display().to_string(), native_length_ms)
    }

    /// Intrinsic duration in milliseconds
    pub fn native_length_ms(&self) -> i64 {
        self.native_length_ms
    }

    /// The origin as a path
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.origin_path)
    }
}

/// Name derived from a file path: its stem, or the whole file name if it has none
pub fn stem_name(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Check whether `path` has one of `extensions` (case-insensitive)
pub fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => extensions
            .iter()
            .any(|allowed| allowed.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_path() {
        let source = MotionSource::from_path("/motions/Walk_Loop.rlmotion", 3000);
        assert_eq!(source.name, "Walk_Loop");
        assert_eq!(source.origin_path, "/motions/Walk_Loop.rlmotion");
        assert_eq!(source.native_length_ms(), 3000);
    }

    #[test]
    fn test_extension_matching() {
        assert!(has_extension(Path::new("a/run.FBX"), DEFAULT_EXTENSIONS));
        assert!(has_extension(Path::new("a/idle.imotionplus"), DEFAULT_EXTENSIONS));
        assert!(has_extension(Path::new("a/idle.bvh"), &[".bvh"]));
        assert!(!has_extension(Path::new("a/notes.txt"), DEFAULT_EXTENSIONS));
        assert!(!has_extension(Path::new("a/noext"), DEFAULT_EXTENSIONS));
    }
}
