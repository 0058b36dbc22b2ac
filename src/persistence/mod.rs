//! Persistence layer: row model and PostgreSQL storage.
//!
//! [`models`] defines one immutable row type per table, [`table`] maps each
//! row type to its table layout, [`timestamp`] encodes block times for their
//! columns, and [`postgres`] stores and loads rows through `sqlx::PgPool`.

pub mod models;
pub mod postgres;
pub mod table;
pub mod timestamp;

pub use models::{
    DbCoin, StakingPoolRow, ValidatorCommissionRow, ValidatorData, ValidatorDelegationRow,
    ValidatorDelegationSharesRow, ValidatorDescriptionRow, ValidatorInfoRow,
    ValidatorRedelegationRow, ValidatorRow, ValidatorUnbondingDelegationRow, ValidatorUptimeRow,
    ValidatorVotingPowerRow,
};
pub use postgres::PostgresStakingStore;
pub use table::StakingTable;
pub use timestamp::UnixNanos;
