//! # Motion Batch
//!
//! Assembles the ordered list of motions that the planner lays end to end.
//!
//! A [`MotionBatch`] is an explicit session object: it is created empty, motions
//! are added, reordered and removed through it, and it is cleared or dropped when
//! the user starts over. Nothing about the batch lives in global state.
//!
//! Motion lengths come from a [`MotionProbe`], the seam to whatever tool can read
//! a motion asset. [`BatchFile`] is a probe backed by a TOML listing, and
//! [`MotionLibrary`] discovers motion files on disk.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use motion_splitter::batch::{BatchFile, MotionBatch};
//!
//! # fn main() -> anyhow::Result<()> {
//! let listing = BatchFile::from_file("batch.toml")?;
//! let mut batch = MotionBatch::new();
//! batch.add_all(listing.paths(), &listing)?;
//! batch.move_up(1)?;
//! # Ok(())
//! # }
//! ```

pub mod library;
pub mod provider;
pub mod session;
pub mod types;

pub use library::{LibraryEntry, MotionLibrary};
pub use provider::{BatchFile, BatchFileEntry, MotionProbe};
pub use session::MotionBatch;
pub use types::MotionSource;
