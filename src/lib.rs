//! # Motion-Splitter
//!
//! Pack many character motions into one continuous animation export, then
//! recover them as separate clips on the other side.
//!
//! Tools that can only bake one timeline per export lose clip boundaries when
//! several motions are combined. The producer side lays a batch of motions end
//! to end and records where each one landed in a JSON side-car manifest; the
//! consumer side reads that manifest (or falls back to timeline markers) and
//! cuts the imported timeline back into independent clips.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use motion_splitter::{
//!     batch::{BatchFile, MotionBatch},
//!     config::Config,
//!     pipeline::{PlanPipeline, SplitPipeline},
//!     splitter::{TimelineInfo, TrackFileSink},
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//!
//! // Producer: plan the batch and write kate_clips.json beside kate.fbx
//! let listing = BatchFile::from_file("batch.toml")?;
//! let mut batch = MotionBatch::new();
//! batch.add_all(listing.paths(), &listing)?;
//! let planned = PlanPipeline::new(config.clone()).run(&batch, None, "kate.fbx")?;
//!
//! // Consumer: split the imported timeline back into clips
//! let mut sink = TrackFileSink::new("exported", "json");
//! let outcome = SplitPipeline::new(config).run(
//!     "kate.fbx",
//!     None,
//!     TimelineInfo::new(planned.manifest.total_frames, 30.0),
//!     &[],
//!     Some(&mut sink),
//! )?;
//! println!("{} clips", outcome.clip_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`timing`] - Millisecond/frame conversion and frame ranges
//! - [`batch`] - Motion batch session, motion probes and library scanning
//! - [`planner`] - Sequential clip layout and timeline placement
//! - [`manifest`] - The clip manifest format and its side-car files
//! - [`splitter`] - Manifest and marker splitting, tracks and export
//! - [`pipeline`] - End-to-end producer and consumer runs
//! - [`config`] - Configuration management
//!
//! ## Hosting
//!
//! Reading motion assets and driving a real timeline are left to the host.
//! Implement [`MotionProbe`](batch::MotionProbe) to report motion lengths,
//! [`TimelineSink`](planner::TimelineSink) to place motions, and
//! [`ExportSink`](splitter::ExportSink) to write each split track:
//!
//! ```rust,no_run
//! use motion_splitter::{splitter::{ExportSink, Track}, Result};
//!
//! struct PrintSink;
//!
//! impl ExportSink for PrintSink {
//!     fn export(&mut self, track: &Track, fps: f64) -> Result<()> {
//!         println!("{} {} @ {} fps", track.name, track.frames, fps);
//!         Ok(())
//!     }
//! }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod planner;
pub mod splitter;
pub mod timing;

// Re-export commonly used types for convenience
pub use crate::{
    batch::{MotionBatch, MotionProbe, MotionSource},
    config::Config,
    error::{Result, SplitterError},
    manifest::ClipManifest,
    pipeline::{PlanPipeline, SplitPipeline},
    planner::{ClipPlan, ClipPlanner},
    splitter::{ManifestSplitter, MarkerSplitter, SplitReport},
};
