//! # Pipelines
//!
//! Thin command layer tying the pure planner and splitter to files and host
//! collaborators. Each pipeline runs a fixed sequence of steps and holds no
//! state between runs.
//!
//! - [`PlanPipeline`]: batch -> plan -> timeline sink -> `<basename>_clips.json`
//! - [`SplitPipeline`]: sidecar lookup -> manifest (or markers) -> clips -> tracks -> export sink

pub mod plan;
pub mod split;

pub use plan::{PlanOutcome, PlanPipeline};
pub use split::{SplitOutcome, SplitPipeline};
