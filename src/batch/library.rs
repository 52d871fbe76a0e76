use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{
    batch::types::{has_extension, stem_name, DEFAULT_EXTENSIONS},
    error::{BatchError, Result},
};

/// A motion file found while scanning a library folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    /// Display name (file stem)
    pub name: String,

    /// Absolute or root-relative path to the motion file
    pub path: PathBuf,

    /// Folder path relative to the library root, `""` for the root itself
    pub folder: String,
}

/// Discovers motion files under a library folder
pub struct MotionLibrary {
    root: PathBuf,
    extensions: Vec<String>,
}

impl MotionLibrary {
    /// Library rooted at `root`, accepting the default motion extensions
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self::with_extensions(root, DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect())
    }

    pub fn with_extensions<P: Into<PathBuf>>(root: P, extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            extensions,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the library and collect every supported motion file, sorted by path
    ///
    /// Hidden files and folders are skipped. Unreadable entries are logged and
    /// skipped; a missing root is an error.
    pub fn scan(&self) -> Result<Vec<LibraryEntry>> {
        if !self.root.is_dir() {
            return Err(BatchError::LibraryScan {
                path: self.root.display().to_string(),
                reason: "not a directory".to_string(),
            }.into());
        }

        let mut entries = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable library entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !has_extension(path, &self.extensions) {
                continue;
            }

            let folder = path
                .parent()
                .and_then(|p| p.strip_prefix(&self.root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();

            debug!("Found motion: {:?}", path);
            entries.push(LibraryEntry {
                name: stem_name(path),
                path: path.to_path_buf(),
                folder,
            });
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));

        info!("Found {} motions under {:?}", entries.len(), self.root);
        Ok(entries)
    }

    /// Distinct folders containing motions, in sorted order
    pub fn folders(&self) -> Result<Vec<String>> {
        let mut folders: Vec<String> = self.scan()?.into_iter().map(|e| e.folder).collect();
        folders.sort();
        folders.dedup();
        Ok(folders)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_scan_finds_supported_motions() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("Locomotion")).unwrap();
        std::fs::create_dir_all(root.join(".cache")).unwrap();
        std::fs::write(root.join("idle.rlmotion"), b"").unwrap();
        std::fs::write(root.join("Locomotion/walk.imotion"), b"").unwrap();
        std::fs::write(root.join("Locomotion/run.FBX"), b"").unwrap();
        std::fs::write(root.join("Locomotion/readme.txt"), b"").unwrap();
        std::fs::write(root.join(".cache/ghost.rlmotion"), b"").unwrap();
        std::fs::write(root.join(".hidden.bvh"), b"").unwrap();

        let library = MotionLibrary::new(root);
        let entries = library.scan().unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["run", "walk", "idle"]);
        assert_eq!(entries[0].folder, "Locomotion");
        assert_eq!(entries[2].folder, "");

        assert_eq!(library.folders().unwrap(), vec!["".to_string(), "Locomotion".to_string()]);
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = tempdir().unwrap();
        let library = MotionLibrary::new(dir.path().join("missing"));
        assert!(library.scan().is_err());
    }
}
