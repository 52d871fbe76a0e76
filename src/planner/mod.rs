//! # Clip Planner
//!
//! Lays an ordered batch of motions end to end on one continuous timeline and
//! describes the placement as a [`ClipManifest`](crate::manifest::ClipManifest).
//!
//! Each clip starts where the previous one ended plus the configured gap. Frame
//! boundaries are derived from every clip's own millisecond start, never by
//! summing rounded frame counts, so rounding error does not build up along a
//! long batch.

pub mod layout;
pub mod timeline;

pub use layout::{plan, ClipPlan, ClipPlanner};
pub use timeline::{apply_plan, TimelineSink};
