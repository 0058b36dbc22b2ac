//! Domain layer: height-versioned snapshot history.
//!
//! Rows are never mutated. Each entity's history is an append-only
//! [`SnapshotTimeline`] ordered by block height.

pub mod timeline;

pub use timeline::{Snapshot, SnapshotTimeline, group_timelines};
