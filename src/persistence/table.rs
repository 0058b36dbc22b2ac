//! Table layout of every row type and the statements built from it.

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{FromRow, Postgres};

use super::models::{
    StakingPoolRow, ValidatorCommissionRow, ValidatorDelegationRow, ValidatorDelegationSharesRow,
    ValidatorDescriptionRow, ValidatorInfoRow, ValidatorRedelegationRow, ValidatorRow,
    ValidatorUnbondingDelegationRow, ValidatorUptimeRow, ValidatorVotingPowerRow,
};
use super::timestamp::UnixNanos;
use crate::domain::Snapshot;

/// Postgres query with positional arguments.
pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// A row type persisted in its own table.
pub trait StakingTable: for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin {
    /// Table name.
    const TABLE: &'static str;
    /// Column names, in the order [`StakingTable::bind_values`] binds them.
    const COLUMNS: &'static [&'static str];
    /// Columns of the natural key (the primary key of the table).
    const CONFLICT_KEY: &'static [&'static str];

    /// Binds the row's fields to `query`, one per column.
    ///
    /// Block times bind as [`UnixNanos`]. A time outside that range binds
    /// as `NULL`, so the insert fails on the column's `NOT NULL` constraint.
    fn bind_values<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;
}

/// Builds the insert statement for `R`.
///
/// Rows already present under the same natural key are left untouched,
/// which keeps history append-only and re-ingestion idempotent.
#[must_use]
pub fn insert_sql<R: StakingTable>() -> String {
    let placeholders = (1..=R::COLUMNS.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) DO NOTHING",
        R::TABLE,
        R::COLUMNS.join(", "),
        placeholders,
        R::CONFLICT_KEY.join(", "),
    )
}

/// Builds the select statement returning rows of `R` with `$1 <= height <= $2`,
/// oldest first.
#[must_use]
pub fn select_range_sql<R: StakingTable + Snapshot>() -> String {
    format!(
        "SELECT {} FROM {} WHERE height >= $1 AND height <= $2 ORDER BY {}",
        R::COLUMNS.join(", "),
        R::TABLE,
        order_by::<R>(),
    )
}

fn order_by<R: StakingTable>() -> String {
    std::iter::once("height")
        .chain(R::CONFLICT_KEY.iter().copied().filter(|c| *c != "height"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl StakingTable for StakingPoolRow {
    const TABLE: &'static str = "staking_pool";
    const COLUMNS: &'static [&'static str] =
        &["bonded_tokens", "not_bonded_tokens", "height", "timestamp"];
    const CONFLICT_KEY: &'static [&'static str] = &["height"];

    fn bind_values<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.bonded_tokens)
            .bind(self.not_bonded_tokens)
            .bind(self.height)
            .bind(UnixNanos::from_datetime(&self.timestamp))
    }
}

impl StakingTable for ValidatorRow {
    const TABLE: &'static str = "validator";
    const COLUMNS: &'static [&'static str] = &["consensus_address", "consensus_pubkey"];
    const CONFLICT_KEY: &'static [&'static str] = &["consensus_address"];

    fn bind_values<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.consensus_address)
            .bind(&self.consensus_pubkey)
    }
}

impl StakingTable for ValidatorInfoRow {
    const TABLE: &'static str = "validator_info";
    const COLUMNS: &'static [&'static str] = &[
        "consensus_address",
        "operator_address",
        "self_delegate_address",
        "max_change_rate",
        "max_rate",
    ];
    const CONFLICT_KEY: &'static [&'static str] = &["operator_address"];

    fn bind_values<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.consensus_address)
            .bind(&self.operator_address)
            .bind(&self.self_delegate_address)
            .bind(&self.max_change_rate)
            .bind(&self.max_rate)
    }
}

impl StakingTable for ValidatorUptimeRow {
    const TABLE: &'static str = "validator_uptime";
    const COLUMNS: &'static [&'static str] = &[
        "consensus_address",
        "height",
        "signed_blocks_window",
        "missed_blocks_counter",
    ];
    const CONFLICT_KEY: &'static [&'static str] = &["consensus_address", "height"];

    fn bind_values<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.consensus_address)
            .bind(self.height)
            .bind(self.signed_blocks_window)
            .bind(self.missed_blocks_counter)
    }
}

impl StakingTable for ValidatorDelegationRow {
    const TABLE: &'static str = "validator_delegation";
    const COLUMNS: &'static [&'static str] = &[
        "consensus_address",
        "delegator_address",
        "amount",
        "height",
        "timestamp",
    ];
    const CONFLICT_KEY: &'static [&'static str] =
        &["consensus_address", "delegator_address", "height"];

    fn bind_values<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.consensus_address)
            .bind(&self.delegator_address)
            .bind(&self.amount)
            .bind(self.height)
            .bind(UnixNanos::from_datetime(&self.timestamp))
    }
}

impl StakingTable for ValidatorUnbondingDelegationRow {
    const TABLE: &'static str = "validator_unbonding_delegation";
    const COLUMNS: &'static [&'static str] = &[
        "consensus_address",
        "delegator_address",
        "amount",
        "completion_timestamp",
        "height",
        "timestamp",
    ];
    const CONFLICT_KEY: &'static [&'static str] = &[
        "consensus_address",
        "delegator_address",
        "completion_timestamp",
        "height",
    ];

    fn bind_values<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.consensus_address)
            .bind(&self.delegator_address)
            .bind(&self.amount)
            .bind(UnixNanos::from_datetime(&self.completion_timestamp))
            .bind(self.height)
            .bind(UnixNanos::from_datetime(&self.timestamp))
    }
}

impl StakingTable for ValidatorRedelegationRow {
    const TABLE: &'static str = "validator_redelegation";
    const COLUMNS: &'static [&'static str] = &[
        "delegator_address",
        "src_validator_address",
        "dst_validator_address",
        "amount",
        "height",
        "completion_time",
    ];
    const CONFLICT_KEY: &'static [&'static str] = &[
        "delegator_address",
        "src_validator_address",
        "dst_validator_address",
        "completion_time",
        "height",
    ];

    fn bind_values<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.delegator_address)
            .bind(&self.src_validator_address)
            .bind(&self.dst_validator_address)
            .bind(&self.amount)
            .bind(self.height)
            .bind(UnixNanos::from_datetime(&self.completion_time))
    }
}

impl StakingTable for ValidatorCommissionRow {
    const TABLE: &'static str = "validator_commission";
    const COLUMNS: &'static [&'static str] = &[
        "operator_address",
        "commission",
        "min_self_delegation",
        "height",
        "timestamp",
    ];
    const CONFLICT_KEY: &'static [&'static str] = &["operator_address", "height"];

    fn bind_values<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.operator_address)
            .bind(&self.commission)
            .bind(&self.min_self_delegation)
            .bind(self.height)
            .bind(UnixNanos::from_datetime(&self.timestamp))
    }
}

impl StakingTable for ValidatorDelegationSharesRow {
    const TABLE: &'static str = "validator_delegation_shares";
    const COLUMNS: &'static [&'static str] = &[
        "operator_address",
        "delegator_address",
        "shares",
        "timestamp",
        "height",
    ];
    const CONFLICT_KEY: &'static [&'static str] =
        &["operator_address", "delegator_address", "height"];

    fn bind_values<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.operator_address)
            .bind(&self.delegator_address)
            .bind(self.shares)
            .bind(UnixNanos::from_datetime(&self.timestamp))
            .bind(self.height)
    }
}

impl StakingTable for ValidatorVotingPowerRow {
    const TABLE: &'static str = "validator_voting_power";
    const COLUMNS: &'static [&'static str] = &["consensus_address", "voting_power", "height"];
    const CONFLICT_KEY: &'static [&'static str] = &["consensus_address", "height"];

    fn bind_values<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.consensus_address)
            .bind(self.voting_power)
            .bind(self.height)
    }
}

impl StakingTable for ValidatorDescriptionRow {
    const TABLE: &'static str = "validator_description";
    const COLUMNS: &'static [&'static str] = &[
        "operator_address",
        "moniker",
        "identity",
        "website",
        "security_contact",
        "details",
        "height",
        "timestamp",
    ];
    const CONFLICT_KEY: &'static [&'static str] = &["operator_address", "height"];

    fn bind_values<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.operator_address)
            .bind(&self.moniker)
            .bind(&self.identity)
            .bind(&self.website)
            .bind(&self.security_contact)
            .bind(&self.details)
            .bind(self.height)
            .bind(UnixNanos::from_datetime(&self.timestamp))
    }
}
