use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{
    error::{ManifestError, Result},
    manifest::types::ClipManifest,
};

/// Appended to the animation file's stem to name its manifest
pub const SIDECAR_SUFFIX: &str = "_clips.json";

/// Manifest path belonging to an animation file: `dir/model.fbx` -> `dir/model_clips.json`
pub fn sidecar_path<P: AsRef<Path>>(animation_path: P) -> PathBuf {
    let path = animation_path.as_ref();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    path.with_file_name(format!("{}{}", stem, SIDECAR_SUFFIX))
}

/// The manifest beside `animation_path`, if one exists
pub fn find_sidecar<P: AsRef<Path>>(animation_path: P) -> Option<PathBuf> {
    let candidate = sidecar_path(animation_path);
    debug!("Looking for clip manifest at {:?}", candidate);
    candidate.is_file().then_some(candidate)
}

/// Read and validate a manifest file
pub fn read_manifest<P: AsRef<Path>>(path: P) -> Result<ClipManifest> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ManifestError::NotFound { path: path.display().to_string() }.into());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ManifestError::Parse {
        context: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let manifest = ClipManifest::from_json(&content, &path.display().to_string())?;
    info!("Read clip manifest {:?}: {}", path, manifest.summary());
    Ok(manifest)
}

/// Write a manifest as pretty-printed UTF-8 JSON
pub fn write_manifest<P: AsRef<Path>>(manifest: &ClipManifest, path: P) -> Result<()> {
    let path = path.as_ref();
    let json = manifest.to_json()?;

    std::fs::write(path, json).map_err(|e| ManifestError::Write {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    info!("Clip metadata saved to: {:?}", path);
    Ok(())
}
