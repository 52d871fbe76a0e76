//! # Clip Manifest
//!
//! The JSON side-car that carries clip boundaries from the planner to the
//! splitter. It is the only contract between the two sides, so parsing is
//! strict: a manifest that is structurally wrong or internally inconsistent is
//! rejected as a whole rather than partially applied.
//!
//! A manifest for `model.fbx` lives beside it as `model_clips.json`.

pub mod io;
pub mod types;

pub use io::{find_sidecar, read_manifest, sidecar_path, write_manifest, SIDECAR_SUFFIX};
pub use types::{ClipManifest, MANIFEST_VERSION};
