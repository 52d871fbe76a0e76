//! # Clip Splitter
//!
//! Partitions one continuous baked timeline into independent clips.
//!
//! Two separate strategies exist, reflecting two different sources of truth:
//!
//! - [`ManifestSplitter`] trusts explicit metadata written by the planner. The
//!   manifest must be fully valid; individual clips that fall outside the
//!   imported timeline are skipped and reported.
//! - [`MarkerSplitter`] infers ranges from named timeline markers, each clip
//!   running from its marker to the next one (the last to the timeline end).
//!
//! Split clips can then be laid out as [`Track`]s and handed to an
//! [`ExportSink`], one independent unit per track.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use motion_splitter::{
//!     manifest::read_manifest,
//!     splitter::{ManifestSplitter, SplitOptions, TimelineInfo},
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let manifest = read_manifest("kate_clips.json")?;
//! let timeline = TimelineInfo::new(450, 30.0);
//! let report = ManifestSplitter::new(SplitOptions::default()).split(&timeline, &manifest)?;
//!
//! for clip in &report.clips {
//!     println!("{} {}", clip.name, clip.local_range);
//! }
//! # Ok(())
//! # }
//! ```

pub mod by_manifest;
pub mod by_markers;
pub mod export;
pub mod tracks;
pub mod types;

pub use by_manifest::{split_by_manifest, ManifestSplitter};
pub use by_markers::{split_by_markers, MarkerSplitter};
pub use export::{export_tracks, repeated_names, ExportReport, ExportSink, TrackFileSink};
pub use tracks::{layout_tracks, Track};
pub use types::{SplitClip, SplitMethod, SplitOptions, SplitReport, TimelineInfo, TimelineMarker};
