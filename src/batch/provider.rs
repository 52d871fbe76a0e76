use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{BatchError, ConfigError, Result};

/// Reads the intrinsic length of a motion asset
///
/// The format of motion files is opaque to this crate; hosts implement this
/// trait with whatever can open them.
pub trait MotionProbe {
    /// Length of the motion at `path` in milliseconds
    fn native_length_ms(&self, path: &Path) -> Result<i64>;
}

impl<F> MotionProbe for F
where
    F: Fn(&Path) -> Result<i64>,
{
    fn native_length_ms(&self, path: &Path) -> Result<i64> {
        self(path)
    }
}

/// One motion listed in a batch file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFileEntry {
    pub path: PathBuf,
    pub length_ms: i64,
}

/// TOML listing of motions with their known lengths
///
/// ```toml
/// [[motion]]
/// path = "motions/walk.rlmotion"
/// length_ms = 3000
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchFile {
    #[serde(default, rename = "motion")]
    pub motions: Vec<BatchFileEntry>,
}

impl BatchFile {
    /// Load a batch listing from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() }.into())
    }

    /// Listed paths in file order
    pub fn paths(&self) -> Vec<PathBuf> {
        self.motions.iter().map(|m| m.path.clone()).collect()
    }

    fn lengths(&self) -> HashMap<&Path, i64> {
        self.motions
            .iter()
            .map(|m| (m.path.as_path(), m.length_ms))
            .collect()
    }
}

impl MotionProbe for BatchFile {
    fn native_length_ms(&self, path: &Path) -> Result<i64> {
        self.lengths()
            .get(path)
            .copied()
            .ok_or_else(|| BatchError::Probe {
                path: path.display().to_string(),
                reason: "not listed in batch file".to_string(),
            }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_batch_file_probe() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("batch.toml");
        std::fs::write(
            &file_path,
            "[[motion]]\npath = \"walk.rlmotion\"\nlength_ms = 3000\n\n\
             [[motion]]\npath = \"run.fbx\"\nlength_ms = 2000\n",
        )
        .unwrap();

        let listing = BatchFile::from_file(&file_path).unwrap();
        assert_eq!(listing.paths(), vec![PathBuf::from("walk.rlmotion"), PathBuf::from("run.fbx")]);
        assert_eq!(listing.native_length_ms(Path::new("run.fbx")).unwrap(), 2000);
        assert!(listing.native_length_ms(Path::new("jump.fbx")).is_err());
    }

    #[test]
    fn test_closure_probe() {
        let probe = |_: &Path| -> Result<i64> { Ok(1500) };
        assert_eq!(probe.native_length_ms(Path::new("any.bvh")).unwrap(), 1500);
    }

    #[test]
    fn test_malformed_batch_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("batch.toml");
        std::fs::write(&file_path, "[[motion]]\npath = 12\n").unwrap();
        assert!(BatchFile::from_file(&file_path).is_err());
    }
}
