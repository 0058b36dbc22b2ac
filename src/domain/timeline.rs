//! Append-only, height-ordered history of snapshot rows.
//!
//! A [`SnapshotTimeline`] holds every snapshot of one logical entity (one
//! validator's voting power, one delegation, the staking pool...). Rows are
//! never replaced: a later height supersedes an earlier one while the old
//! row stays queryable through [`SnapshotTimeline::at`].

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};

use crate::error::TimelineError;
use crate::persistence::models::{
    StakingPoolRow, ValidatorCommissionRow, ValidatorDelegationRow, ValidatorDelegationSharesRow,
    ValidatorDescriptionRow, ValidatorRedelegationRow, ValidatorUnbondingDelegationRow,
    ValidatorUptimeRow, ValidatorVotingPowerRow,
};

/// A row versioned by block height.
pub trait Snapshot: Eq {
    /// Natural key of the entity, without the height.
    type Key: Clone + Eq + Hash + fmt::Debug;

    /// Returns the entity this snapshot describes.
    fn entity_key(&self) -> Self::Key;

    /// Returns the block height the snapshot was taken at.
    fn height(&self) -> i64;
}

/// Ordered snapshots of a single entity.
#[derive(Debug, Clone)]
pub struct SnapshotTimeline<R> {
    rows: Vec<R>,
}

impl<R> Default for SnapshotTimeline<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R: Snapshot> SnapshotTimeline<R> {
    /// Creates an empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a snapshot.
    ///
    /// Returns `Ok(false)` when an identical snapshot is already recorded
    /// at the same height, which makes re-ingesting an overlapping height
    /// range idempotent.
    ///
    /// # Errors
    ///
    /// - [`TimelineError::EntityMismatch`] if the row describes another entity.
    /// - [`TimelineError::HeightRegression`] if the row is older than the latest.
    /// - [`TimelineError::ConflictingSnapshot`] if a different row exists at
    ///   the same height.
    pub fn push(&mut self, row: R) -> Result<bool, TimelineError> {
        if let Some(first) = self.rows.first() {
            let expected = first.entity_key();
            let found = row.entity_key();
            if expected != found {
                return Err(TimelineError::EntityMismatch {
                    expected: format!("{expected:?}"),
                    found: format!("{found:?}"),
                });
            }
        }

        if let Some(latest) = self.rows.last() {
            let height = row.height();
            if height < latest.height() {
                return Err(TimelineError::HeightRegression {
                    latest: latest.height(),
                    height,
                });
            }
            if height == latest.height() {
                if *latest == row {
                    return Ok(false);
                }
                return Err(TimelineError::ConflictingSnapshot { height });
            }
        }

        self.rows.push(row);
        Ok(true)
    }

    /// Returns the state as of `height`: the latest snapshot taken at or
    /// before it.
    #[must_use]
    pub fn at(&self, height: i64) -> Option<&R> {
        let end = self.rows.partition_point(|row| row.height() <= height);
        end.checked_sub(1).and_then(|idx| self.rows.get(idx))
    }

    /// Returns the most recent snapshot.
    #[must_use]
    pub fn latest(&self) -> Option<&R> {
        self.rows.last()
    }

    /// Returns the entity key, if any snapshot was recorded.
    #[must_use]
    pub fn entity_key(&self) -> Option<R::Key> {
        self.rows.first().map(Snapshot::entity_key)
    }

    /// Iterates snapshots from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.rows.iter()
    }

    /// Number of recorded snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no snapshot was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consumes the timeline, returning its rows in height order.
    #[must_use]
    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }
}

/// Partitions rows into one timeline per entity.
///
/// Rows must arrive in non-decreasing height order per entity, as returned
/// by [`crate::persistence::postgres::PostgresStakingStore::load_range`].
/// Identical duplicates are dropped.
///
/// # Errors
///
/// Returns the first [`TimelineError`] raised by [`SnapshotTimeline::push`].
pub fn group_timelines<R, I>(rows: I) -> Result<HashMap<R::Key, SnapshotTimeline<R>>, TimelineError>
where
    R: Snapshot,
    I: IntoIterator<Item = R>,
{
    let mut timelines: HashMap<R::Key, SnapshotTimeline<R>> = HashMap::new();
    for row in rows {
        timelines.entry(row.entity_key()).or_default().push(row)?;
    }
    Ok(timelines)
}

impl Snapshot for StakingPoolRow {
    type Key = ();

    fn entity_key(&self) -> Self::Key {}

    fn height(&self) -> i64 {
        self.height
    }
}

impl Snapshot for ValidatorUptimeRow {
    type Key = String;

    fn entity_key(&self) -> Self::Key {
        self.consensus_address.clone()
    }

    fn height(&self) -> i64 {
        self.height
    }
}

impl Snapshot for ValidatorDelegationRow {
    type Key = (String, String);

    fn entity_key(&self) -> Self::Key {
        (
            self.consensus_address.clone(),
            self.delegator_address.clone(),
        )
    }

    fn height(&self) -> i64 {
        self.height
    }
}

impl Snapshot for ValidatorUnbondingDelegationRow {
    type Key = (String, String, DateTime<Utc>);

    fn entity_key(&self) -> Self::Key {
        (
            self.consensus_address.clone(),
            self.delegator_address.clone(),
            self.completion_timestamp,
        )
    }

    fn height(&self) -> i64 {
        self.height
    }
}

impl Snapshot for ValidatorRedelegationRow {
    type Key = (String, String, String, DateTime<Utc>);

    fn entity_key(&self) -> Self::Key {
        (
            self.delegator_address.clone(),
            self.src_validator_address.clone(),
            self.dst_validator_address.clone(),
            self.completion_time,
        )
    }

    fn height(&self) -> i64 {
        self.height
    }
}

impl Snapshot for ValidatorCommissionRow {
    type Key = String;

    fn entity_key(&self) -> Self::Key {
        self.operator_address.clone()
    }

    fn height(&self) -> i64 {
        self.height
    }
}

impl Snapshot for ValidatorDelegationSharesRow {
    type Key = (String, String);

    fn entity_key(&self) -> Self::Key {
        (self.operator_address.clone(), self.delegator_address.clone())
    }

    fn height(&self) -> i64 {
        self.height
    }
}

impl Snapshot for ValidatorVotingPowerRow {
    type Key = String;

    fn entity_key(&self) -> Self::Key {
        self.consensus_address.clone()
    }

    fn height(&self) -> i64 {
        self.height
    }
}

impl Snapshot for ValidatorDescriptionRow {
    type Key = String;

    fn entity_key(&self) -> Self::Key {
        self.operator_address.clone()
    }

    fn height(&self) -> i64 {
        self.height
    }
}
