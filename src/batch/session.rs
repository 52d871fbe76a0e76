use std::path::Path;
use tracing::{debug, info, warn};

use crate::{
    batch::{
        provider::MotionProbe,
        types::{has_extension, stem_name, MotionSource, DEFAULT_EXTENSIONS},
    },
    error::{BatchError, Result},
};

/// Ordered, user-editable batch of motions waiting to be planned
#[derive(Debug, Clone)]
pub struct MotionBatch {
    sources: Vec<MotionSource>,
    extensions: Vec<String>,
}

impl MotionBatch {
    /// Create an empty batch accepting the default motion extensions
    pub fn new() -> Self {
        Self::with_extensions(DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect())
    }

    /// Create an empty batch accepting the given extensions
    pub fn with_extensions(extensions: Vec<String>) -> Self {
        Self {
            sources: Vec::new(),
            extensions,
        }
    }

    /// Add one motion file, reading its length through `probe`
    ///
    /// Unsupported extensions and paths already in the batch are rejected.
    /// A name that collides with an existing motion gets the new motion's
    /// batch index as a suffix.
    pub fn add<P: AsRef<Path>>(&mut self, path: P, probe: &dyn MotionProbe) -> Result<&MotionSource> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        if !has_extension(path, &self.extensions) {
            return Err(BatchError::UnsupportedFormat { path: path_str }.into());
        }

        if self.sources.iter().any(|s| s.origin_path == path_str) {
            return Err(BatchError::DuplicateSource { path: path_str }.into());
        }

        let native_length_ms = probe.native_length_ms(path)?;
        let name = self.unique_name(stem_name(path));

        debug!("Queued motion #{}: {} ({} ms)", self.sources.len(), name, native_length_ms);
        self.sources.push(MotionSource::new(name, path_str, native_length_ms));

        Ok(&self.sources[self.sources.len() - 1])
    }

    /// Add several motion files, skipping the ones that are rejected
    ///
    /// Returns how many were added. Probe failures are propagated.
    pub fn add_all<I, P>(&mut self, paths: I, probe: &dyn MotionProbe) -> Result<usize>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut added = 0;
        for path in paths {
            match self.add(path.as_ref(), probe) {
                Ok(_) => added += 1,
                Err(crate::SplitterError::Batch(
                    e @ (BatchError::UnsupportedFormat { .. } | BatchError::DuplicateSource { .. }),
                )) => {
                    warn!("Skipping motion: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        info!("Added {} motions to batch ({} total)", added, self.sources.len());
        Ok(added)
    }

    /// Append an already-measured source, keeping names unique
    pub fn push(&mut self, mut source: MotionSource) {
        source.name = self.unique_name(source.name);
        self.sources.push(source);
    }

    /// Remove the motion at `index`
    pub fn remove(&mut self, index: usize) -> Result<MotionSource> {
        self.check_index(index)?;
        Ok(self.sources.remove(index))
    }

    /// Remove every motion
    pub fn clear(&mut self) {
        self.sources.clear();
    }

    /// Swap the motion at `index` with the one before it
    ///
    /// Moving the first motion up is a no-op.
    pub fn move_up(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if index > 0 {
            self.sources.swap(index, index - 1);
        }
        Ok(())
    }

    /// Swap the motion at `index` with the one after it
    ///
    /// Moving the last motion down is a no-op.
    pub fn move_down(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if index + 1 < self.sources.len() {
            self.sources.swap(index, index + 1);
        }
        Ok(())
    }

    /// Move the motion at `from` so it ends up at `to`
    pub fn move_to(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        let source = self.sources.remove(from);
        self.sources.insert(to, source);
        Ok(())
    }

    /// Motions in batch order
    pub fn sources(&self) -> &[MotionSource] {
        &self.sources
    }

    pub fn iter(&self) -> impl Iterator<Item = &MotionSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Total length of all motions, gaps excluded
    pub fn total_length_ms(&self) -> i64 {
        self.sources.iter().map(|s| s.native_length_ms()).sum()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.sources.len() {
            return Err(BatchError::IndexOutOfRange {
                index,
                len: self.sources.len(),
            }.into());
        }
        Ok(())
    }

    fn unique_name(&self, base: String) -> String {
        let taken = |candidate: &str| self.sources.iter().any(|s| s.name == candidate);
        if !taken(&base) {
            return base;
        }

        let mut suffix = self.sources.len();
        loop {
            let candidate = format!("{}_{}", base, suffix);
            if !taken(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

impl Default for MotionBatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SplitterError;

    fn fixed_length(_: &Path) -> Result<i64> {
        Ok(2000)
    }

    fn names(batch: &MotionBatch) -> Vec<&str> {
        batch.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_add_and_reorder() {
        let mut batch = MotionBatch::new();
        batch.add("m/walk.rlmotion", &fixed_length).unwrap();
        batch.add("m/run.fbx", &fixed_length).unwrap();
        batch.add("m/jump.bvh", &fixed_length).unwrap();
        assert_eq!(names(&batch), vec!["walk", "run", "jump"]);

        batch.move_up(2).unwrap();
        assert_eq!(names(&batch), vec!["walk", "jump", "run"]);

        batch.move_down(0).unwrap();
        assert_eq!(names(&batch), vec!["jump", "walk", "run"]);

        // Edges are no-ops
        batch.move_up(0).unwrap();
        batch.move_down(2).unwrap();
        assert_eq!(names(&batch), vec!["jump", "walk", "run"]);

        batch.move_to(2, 0).unwrap();
        assert_eq!(names(&batch), vec!["run", "jump", "walk"]);

        let removed = batch.remove(1).unwrap();
        assert_eq!(removed.name, "jump");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.total_length_ms(), 4000);

        batch.clear();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_duplicate_names_get_index_suffix() {
        let mut batch = MotionBatch::new();
        batch.add("a/walk.rlmotion", &fixed_length).unwrap();
        batch.add("b/walk.rlmotion", &fixed_length).unwrap();
        batch.add("c/walk.fbx", &fixed_length).unwrap();
        assert_eq!(names(&batch), vec!["walk", "walk_1", "walk_2"]);
    }

    #[test]
    fn test_rejects_unsupported_and_duplicate_paths() {
        let mut batch = MotionBatch::new();
        let err = batch.add("notes.txt", &fixed_length).unwrap_err();
        assert!(matches!(err, SplitterError::Batch(BatchError::UnsupportedFormat { .. })));

        batch.add("walk.rlmotion", &fixed_length).unwrap();
        let err = batch.add("walk.rlmotion", &fixed_length).unwrap_err();
        assert!(matches!(err, SplitterError::Batch(BatchError::DuplicateSource { .. })));
    }

    #[test]
    fn test_add_all_skips_rejected_paths() {
        let mut batch = MotionBatch::new();
        let added = batch
            .add_all(["walk.rlmotion", "readme.md", "walk.rlmotion", "run.fbx"], &fixed_length)
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(names(&batch), vec!["walk", "run"]);
    }

    #[test]
    fn test_probe_failure_propagates() {
        let failing = |path: &Path| -> Result<i64> {
            Err(BatchError::Probe {
                path: path.display().to_string(),
                reason: "corrupt".to_string(),
            }
            .into())
        };
        let mut batch = MotionBatch::new();
        assert!(batch.add_all(["walk.fbx"], &failing).is_err());
        assert!(batch.is_empty());
    }

    #[test]
    fn test_index_out_of_range() {
        let mut batch = MotionBatch::new();
        assert!(batch.remove(0).is_err());
        assert!(batch.move_up(3).is_err());
    }
}
