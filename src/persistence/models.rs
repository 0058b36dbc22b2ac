//! Database rows for staking-pool and validator history.
//!
//! Every row is an immutable snapshot of chain state. Identifiers and rates
//! are kept in their stored string encoding so a row round-trips through the
//! database byte for byte; [`ValidatorData`] re-decodes them on demand.
//! Equality (`PartialEq`) compares every persisted field, timestamps by
//! instant.

use std::cmp::Ordering;
use std::str::FromStr;

use bigdecimal::num_bigint::BigInt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chain::{AccAddress, Bech32Prefixes, ConsAddress, ConsPubKey, Dec, ValAddress};
use super::timestamp::UnixNanos;
use crate::error::DecodeError;

/// Coin amount stored as the `coin (denom, amount)` composite type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "coin")]
pub struct DbCoin {
    /// Denomination, e.g. `"uatom"`.
    pub denom: String,
    /// Integer amount in base units, as decimal text.
    pub amount: String,
}

impl DbCoin {
    /// Creates a coin from its denomination and integer amount text.
    #[must_use]
    pub fn new(denom: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }

    /// Decodes the amount as a non-negative integer.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidCoinAmount`] unless the amount is a
    /// non-empty run of ASCII digits.
    pub fn amount_value(&self) -> Result<BigInt, DecodeError> {
        let invalid = || DecodeError::InvalidCoinAmount(self.amount.clone());
        if self.amount.is_empty() || !self.amount.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        BigInt::from_str(&self.amount).map_err(|_| invalid())
    }
}

/// A row of the `staking_pool` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StakingPoolRow {
    /// Tokens bonded to active validators.
    pub bonded_tokens: i64,
    /// Tokens not bonded (unbonding or unbonded).
    pub not_bonded_tokens: i64,
    /// Block height of the snapshot.
    pub height: i64,
    /// Block time of the snapshot.
    #[sqlx(try_from = "UnixNanos")]
    pub timestamp: DateTime<Utc>,
}

impl StakingPoolRow {
    /// Creates a new staking pool snapshot.
    #[must_use]
    pub const fn new(
        bonded_tokens: i64,
        not_bonded_tokens: i64,
        height: i64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            bonded_tokens,
            not_bonded_tokens,
            height,
            timestamp,
        }
    }
}

/// A row of the `validator` table: the permanent consensus identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ValidatorRow {
    /// Bech32 consensus address.
    pub consensus_address: String,
    /// Bech32 consensus public key.
    pub consensus_pubkey: String,
}

impl ValidatorRow {
    /// Creates a new validator identity row.
    #[must_use]
    pub fn new(
        consensus_address: impl Into<String>,
        consensus_pubkey: impl Into<String>,
    ) -> Self {
        Self {
            consensus_address: consensus_address.into(),
            consensus_pubkey: consensus_pubkey.into(),
        }
    }
}

/// A row of the `validator_info` table: registration-time parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ValidatorInfoRow {
    /// Bech32 consensus address.
    pub consensus_address: String,
    /// Bech32 operator address.
    pub operator_address: String,
    /// Bech32 account address of the self-delegation.
    pub self_delegate_address: String,
    /// Raw scaled integer of the maximum daily commission change.
    pub max_change_rate: String,
    /// Raw scaled integer of the maximum commission rate.
    pub max_rate: String,
}

impl ValidatorInfoRow {
    /// Creates a new validator info row.
    #[must_use]
    pub fn new(
        consensus_address: impl Into<String>,
        operator_address: impl Into<String>,
        self_delegate_address: impl Into<String>,
        max_change_rate: impl Into<String>,
        max_rate: impl Into<String>,
    ) -> Self {
        Self {
            consensus_address: consensus_address.into(),
            operator_address: operator_address.into(),
            self_delegate_address: self_delegate_address.into(),
            max_change_rate: max_change_rate.into(),
            max_rate: max_rate.into(),
        }
    }
}

/// Joined view of `validator` and `validator_info`.
///
/// The decode accessors turn the stored strings back into chain values.
/// A [`DecodeError`] from any of them means the stored row is corrupted or
/// was written under another chain's prefixes. Callers must abort the
/// operation that needed the value and surface the error; it is never a
/// condition to recover from or substitute a default for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ValidatorData {
    /// Bech32 consensus address.
    pub consensus_address: String,
    /// Bech32 operator address.
    pub operator_address: String,
    /// Bech32 consensus public key.
    pub consensus_pubkey: String,
    /// Bech32 self-delegation account address.
    pub self_delegate_address: String,
    /// Raw scaled integer of the maximum commission rate.
    pub max_rate: String,
    /// Raw scaled integer of the maximum daily commission change.
    pub max_change_rate: String,
}

impl ValidatorData {
    /// Creates a new aggregate validator view.
    #[must_use]
    pub fn new(
        consensus_address: impl Into<String>,
        operator_address: impl Into<String>,
        consensus_pubkey: impl Into<String>,
        self_delegate_address: impl Into<String>,
        max_rate: impl Into<String>,
        max_change_rate: impl Into<String>,
    ) -> Self {
        Self {
            consensus_address: consensus_address.into(),
            operator_address: operator_address.into(),
            consensus_pubkey: consensus_pubkey.into(),
            self_delegate_address: self_delegate_address.into(),
            max_rate: max_rate.into(),
            max_change_rate: max_change_rate.into(),
        }
    }

    /// Joins an identity row with its info row.
    #[must_use]
    pub fn from_rows(validator: ValidatorRow, info: ValidatorInfoRow) -> Self {
        Self {
            consensus_address: validator.consensus_address,
            operator_address: info.operator_address,
            consensus_pubkey: validator.consensus_pubkey,
            self_delegate_address: info.self_delegate_address,
            max_rate: info.max_rate,
            max_change_rate: info.max_change_rate,
        }
    }

    /// Decodes the consensus address.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the stored value is not a valid
    /// consensus address for `prefixes`. Treat as fatal.
    pub fn decode_cons_address(
        &self,
        prefixes: &Bech32Prefixes,
    ) -> Result<ConsAddress, DecodeError> {
        integrity(
            "consensus_address",
            &self.consensus_address,
            ConsAddress::from_bech32(&self.consensus_address, prefixes),
        )
    }

    /// Decodes the consensus public key.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the stored value is not a valid
    /// consensus public key of a recognized algorithm. Treat as fatal.
    pub fn decode_cons_pub_key(
        &self,
        prefixes: &Bech32Prefixes,
    ) -> Result<ConsPubKey, DecodeError> {
        integrity(
            "consensus_pubkey",
            &self.consensus_pubkey,
            ConsPubKey::from_bech32(&self.consensus_pubkey, prefixes),
        )
    }

    /// Decodes the operator address.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the stored value is not a valid
    /// operator address for `prefixes`. Treat as fatal.
    pub fn decode_operator(&self, prefixes: &Bech32Prefixes) -> Result<ValAddress, DecodeError> {
        integrity(
            "operator_address",
            &self.operator_address,
            ValAddress::from_bech32(&self.operator_address, prefixes),
        )
    }

    /// Decodes the self-delegation account address.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the stored value is not a valid
    /// account address for `prefixes`. Treat as fatal.
    pub fn decode_self_delegate_address(
        &self,
        prefixes: &Bech32Prefixes,
    ) -> Result<AccAddress, DecodeError> {
        integrity(
            "self_delegate_address",
            &self.self_delegate_address,
            AccAddress::from_bech32(&self.self_delegate_address, prefixes),
        )
    }

    /// Decodes the maximum commission rate from its raw scaled integer.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidDecimal`] if the stored value is not an
    /// integer literal. Treat as fatal.
    pub fn decode_max_rate(&self) -> Result<Dec, DecodeError> {
        integrity("max_rate", &self.max_rate, Dec::parse_raw(&self.max_rate))
    }

    /// Decodes the maximum commission change rate from its raw scaled
    /// integer.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidDecimal`] if the stored value is not an
    /// integer literal. Treat as fatal.
    pub fn decode_max_change_rate(&self) -> Result<Dec, DecodeError> {
        integrity(
            "max_change_rate",
            &self.max_change_rate,
            Dec::parse_raw(&self.max_change_rate),
        )
    }

    /// Runs every decode accessor, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`DecodeError`] encountered.
    pub fn verify(&self, prefixes: &Bech32Prefixes) -> Result<(), DecodeError> {
        self.decode_cons_address(prefixes)?;
        self.decode_cons_pub_key(prefixes)?;
        self.decode_operator(prefixes)?;
        self.decode_self_delegate_address(prefixes)?;
        self.decode_max_rate()?;
        self.decode_max_change_rate()?;
        Ok(())
    }
}

/// Logs a decode failure of a stored field before handing it back.
fn integrity<T>(
    field: &'static str,
    value: &str,
    result: Result<T, DecodeError>,
) -> Result<T, DecodeError> {
    result.inspect_err(|err| {
        tracing::error!(field, value, error = %err, "stored validator field failed to decode");
    })
}

/// A row of the `validator_uptime` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ValidatorUptimeRow {
    /// Bech32 consensus address.
    pub consensus_address: String,
    /// Block height of the snapshot.
    pub height: i64,
    /// Size of the sliding window of blocks checked for liveness.
    pub signed_blocks_window: i64,
    /// Blocks missed within the window.
    pub missed_blocks_counter: i64,
}

impl ValidatorUptimeRow {
    /// Creates a new uptime snapshot.
    #[must_use]
    pub fn new(
        consensus_address: impl Into<String>,
        signed_blocks_window: i64,
        missed_blocks_counter: i64,
        height: i64,
    ) -> Self {
        Self {
            consensus_address: consensus_address.into(),
            height,
            signed_blocks_window,
            missed_blocks_counter,
        }
    }
}

/// A row of the `validator_delegation` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ValidatorDelegationRow {
    /// Bech32 consensus address of the validator.
    pub consensus_address: String,
    /// Bech32 account address of the delegator.
    pub delegator_address: String,
    /// Delegated amount.
    pub amount: DbCoin,
    /// Block height of the snapshot.
    pub height: i64,
    /// Block time of the snapshot.
    #[sqlx(try_from = "UnixNanos")]
    pub timestamp: DateTime<Utc>,
}

impl ValidatorDelegationRow {
    /// Creates a new delegation snapshot.
    #[must_use]
    pub fn new(
        consensus_address: impl Into<String>,
        delegator_address: impl Into<String>,
        amount: DbCoin,
        height: i64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            consensus_address: consensus_address.into(),
            delegator_address: delegator_address.into(),
            amount,
            height,
            timestamp,
        }
    }
}

/// A row of the `validator_unbonding_delegation` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ValidatorUnbondingDelegationRow {
    /// Bech32 consensus address of the validator.
    pub consensus_address: String,
    /// Bech32 account address of the delegator.
    pub delegator_address: String,
    /// Amount being unbonded.
    pub amount: DbCoin,
    /// When the unbonding completes.
    #[sqlx(try_from = "UnixNanos")]
    pub completion_timestamp: DateTime<Utc>,
    /// Block height of the snapshot.
    pub height: i64,
    /// Block time of the snapshot.
    #[sqlx(try_from = "UnixNanos")]
    pub timestamp: DateTime<Utc>,
}

impl ValidatorUnbondingDelegationRow {
    /// Creates a new unbonding delegation snapshot.
    #[must_use]
    pub fn new(
        consensus_address: impl Into<String>,
        delegator_address: impl Into<String>,
        amount: DbCoin,
        completion_timestamp: DateTime<Utc>,
        height: i64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            consensus_address: consensus_address.into(),
            delegator_address: delegator_address.into(),
            amount,
            completion_timestamp,
            height,
            timestamp,
        }
    }
}

/// A row of the `validator_redelegation` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ValidatorRedelegationRow {
    /// Bech32 account address of the delegator.
    pub delegator_address: String,
    /// Validator the stake moves away from.
    pub src_validator_address: String,
    /// Validator the stake moves to.
    pub dst_validator_address: String,
    /// Amount being redelegated.
    pub amount: DbCoin,
    /// Block height of the snapshot.
    pub height: i64,
    /// When the redelegation completes.
    #[sqlx(try_from = "UnixNanos")]
    pub completion_time: DateTime<Utc>,
}

impl ValidatorRedelegationRow {
    /// Creates a new redelegation snapshot.
    #[must_use]
    pub fn new(
        delegator_address: impl Into<String>,
        src_validator_address: impl Into<String>,
        dst_validator_address: impl Into<String>,
        amount: DbCoin,
        height: i64,
        completion_time: DateTime<Utc>,
    ) -> Self {
        Self {
            delegator_address: delegator_address.into(),
            src_validator_address: src_validator_address.into(),
            dst_validator_address: dst_validator_address.into(),
            amount,
            height,
            completion_time,
        }
    }
}

/// A row of the `validator_commission` table.
///
/// `None` means the value was not reported at this height, which is not the
/// same as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ValidatorCommissionRow {
    /// Bech32 operator address.
    pub operator_address: String,
    /// Commission rate, if known.
    pub commission: Option<String>,
    /// Minimum self-delegation, if known.
    pub min_self_delegation: Option<String>,
    /// Block height of the snapshot.
    pub height: i64,
    /// Block time of the snapshot.
    #[sqlx(try_from = "UnixNanos")]
    pub timestamp: DateTime<Utc>,
}

impl ValidatorCommissionRow {
    /// Creates a new commission snapshot.
    #[must_use]
    pub fn new(
        operator_address: impl Into<String>,
        commission: Option<String>,
        min_self_delegation: Option<String>,
        height: i64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            operator_address: operator_address.into(),
            commission,
            min_self_delegation,
            height,
            timestamp,
        }
    }
}

/// A row of the `validator_delegation_shares` table.
///
/// Shares compare with [`f64::total_cmp`], so a `NaN` row still equals
/// itself and `0.0` differs from `-0.0`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ValidatorDelegationSharesRow {
    /// Bech32 operator address.
    pub operator_address: String,
    /// Bech32 account address of the delegator.
    pub delegator_address: String,
    /// Delegation shares.
    pub shares: f64,
    /// Block time of the snapshot.
    #[sqlx(try_from = "UnixNanos")]
    pub timestamp: DateTime<Utc>,
    /// Block height of the snapshot.
    pub height: i64,
}

impl ValidatorDelegationSharesRow {
    /// Creates a new delegation shares snapshot.
    #[must_use]
    pub fn new(
        operator_address: impl Into<String>,
        delegator_address: impl Into<String>,
        shares: f64,
        timestamp: DateTime<Utc>,
        height: i64,
    ) -> Self {
        Self {
            operator_address: operator_address.into(),
            delegator_address: delegator_address.into(),
            shares,
            timestamp,
            height,
        }
    }
}

impl PartialEq for ValidatorDelegationSharesRow {
    fn eq(&self, other: &Self) -> bool {
        self.operator_address == other.operator_address
            && self.delegator_address == other.delegator_address
            && self.shares.total_cmp(&other.shares) == Ordering::Equal
            && self.timestamp == other.timestamp
            && self.height == other.height
    }
}

impl Eq for ValidatorDelegationSharesRow {}

/// A row of the `validator_voting_power` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ValidatorVotingPowerRow {
    /// Bech32 consensus address.
    pub consensus_address: String,
    /// Voting power at this height.
    pub voting_power: i64,
    /// Block height of the snapshot.
    pub height: i64,
}

impl ValidatorVotingPowerRow {
    /// Creates a new voting power snapshot.
    #[must_use]
    pub fn new(consensus_address: impl Into<String>, voting_power: i64, height: i64) -> Self {
        Self {
            consensus_address: consensus_address.into(),
            voting_power,
            height,
        }
    }
}

/// A row of the `validator_description` table.
///
/// Each metadata field is `None` until the validator reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ValidatorDescriptionRow {
    /// Bech32 operator address.
    pub operator_address: String,
    /// Display name.
    pub moniker: Option<String>,
    /// Identity signature (e.g. Keybase).
    pub identity: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Security contact email.
    pub security_contact: Option<String>,
    /// Free-form details.
    pub details: Option<String>,
    /// Block height of the snapshot.
    pub height: i64,
    /// Block time of the snapshot.
    #[sqlx(try_from = "UnixNanos")]
    pub timestamp: DateTime<Utc>,
}

impl ValidatorDescriptionRow {
    /// Creates a new description snapshot.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        operator_address: impl Into<String>,
        moniker: Option<String>,
        identity: Option<String>,
        website: Option<String>,
        security_contact: Option<String>,
        details: Option<String>,
        height: i64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            operator_address: operator_address.into(),
            moniker,
            identity,
            website,
            security_contact,
            details,
            height,
            timestamp,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::fmt;

    use chrono::{Duration, FixedOffset, TimeZone};

    use super::*;

    const CONS: &str = "cosmosvalcons1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5w9thxw";
    const CONS2: &str = "cosmosvalcons1z5tpwxqergd3c8g7ruszzg3rysjjvfegeqlewc";
    const OPER: &str = "cosmosvaloper1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc56kct20";
    const ACC: &str = "cosmos1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu";
    const PUBKEY: &str = "cosmosvalconspub1zcjduepqqqqsyqcyq5rqwzqfpg9scrgwpugpzysnzs23v9ccrydpk8qarc0s68w5uc";
    const PUBKEY2: &str = "cosmosvalconspub1addwnpepqgqsyqcyq5rqwzqfpg9scrgwpugpzysnzs23v9ccrydpk8qarc0jq5cjrl5";

    fn ts(secs: i64) -> DateTime<Utc> {
        let Some(t) = Utc.timestamp_opt(secs, 0).single() else {
            panic!("valid timestamp");
        };
        t
    }

    fn ts_nanos(secs: i64, nanos: u32) -> DateTime<Utc> {
        let Some(t) = Utc.timestamp_opt(secs, nanos).single() else {
            panic!("valid timestamp");
        };
        t
    }

    /// Checks `==` is reflexive, symmetric and transitive on copies of `row`.
    fn assert_equivalence<T: PartialEq + Clone + fmt::Debug>(row: &T) {
        let (a, b, c) = (row.clone(), row.clone(), row.clone());
        assert!(PartialEq::eq(row, row), "reflexive: {row:?}");
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(b, c);
        assert_eq!(a, c);
    }

    /// Applies each edit to its own copy of `base` and checks the edited
    /// row is unequal to `base` in both directions.
    fn assert_each_field_matters<T>(base: &T, edits: &[(&str, fn(&mut T))])
    where
        T: PartialEq + Clone + fmt::Debug,
    {
        for (field, edit) in edits {
            let mut changed = base.clone();
            edit(&mut changed);
            assert_ne!(*base, changed, "changing {field} kept rows equal");
            assert_ne!(changed, *base, "changing {field} kept rows equal");
        }
    }

    fn validator_data() -> ValidatorData {
        ValidatorData::new(
            CONS,
            OPER,
            PUBKEY,
            ACC,
            "200000000000000000",
            "10000000000000000",
        )
    }

    fn description(moniker: Option<&str>) -> ValidatorDescriptionRow {
        ValidatorDescriptionRow::new(
            OPER,
            moniker.map(str::to_string),
            Some("ABCDEF".to_string()),
            Some("https://alice.example".to_string()),
            None,
            Some(String::new()),
            10,
            ts(1_600_000_000),
        )
    }

    #[test]
    fn staking_pool_equality_scenario() {
        let t = ts(1_600_000_000);
        let a = StakingPoolRow::new(1_000_000, 500_000, 100, t);
        let b = StakingPoolRow::new(1_000_000, 500_000, 100, t);
        assert_eq!(a, b);
        assert_eq!(a, a.clone());

        let later = StakingPoolRow::new(1_000_000, 500_000, 101, t);
        assert_ne!(a, later);
        assert_ne!(a, StakingPoolRow::new(1_000_001, 500_000, 100, t));
        assert_ne!(a, StakingPoolRow::new(1_000_000, 500_001, 100, t));
        assert_ne!(a, StakingPoolRow::new(1_000_000, 500_000, 100, ts(1_600_000_001)));
    }

    #[test]
    fn constructor_keeps_inputs_verbatim() {
        let row = ValidatorInfoRow::new(CONS, OPER, ACC, "  1 ", "");
        assert_eq!(row.consensus_address, CONS);
        assert_eq!(row.operator_address, OPER);
        assert_eq!(row.self_delegate_address, ACC);
        assert_eq!(row.max_change_rate, "  1 ");
        assert_eq!(row.max_rate, "");

        let uptime = ValidatorUptimeRow::new(CONS, 10_000, 3, 42);
        assert_eq!(uptime.signed_blocks_window, 10_000);
        assert_eq!(uptime.missed_blocks_counter, 3);
        assert_eq!(uptime.height, 42);
    }

    #[test]
    fn timestamps_compare_by_instant_not_offset() {
        let Some(offset) = FixedOffset::east_opt(2 * 3600) else {
            panic!("valid offset");
        };
        let Some(local) = offset.timestamp_opt(1_600_000_000, 0).single() else {
            panic!("valid timestamp");
        };
        let a = ValidatorVotingPowerRow::new(CONS, 10, 1);
        assert_eq!(a, ValidatorVotingPowerRow::new(CONS, 10, 1));

        let utc = StakingPoolRow::new(1, 2, 3, ts(1_600_000_000));
        let shifted = StakingPoolRow::new(1, 2, 3, local.with_timezone(&Utc));
        assert_eq!(utc, shifted);
    }

    #[test]
    fn timestamps_compare_at_full_precision() {
        let Some(base) = Utc.timestamp_opt(1_600_000_000, 1_000).single() else {
            panic!("valid timestamp");
        };
        let Some(next) = Utc.timestamp_opt(1_600_000_000, 1_001).single() else {
            panic!("valid timestamp");
        };
        let coin = DbCoin::new("uatom", "5");
        let a = ValidatorDelegationRow::new(CONS, ACC, coin.clone(), 5, base);
        let b = ValidatorDelegationRow::new(CONS, ACC, coin, 5, next);
        assert_ne!(a, b);
    }

    #[test]
    fn coin_equality_requires_denom_and_amount() {
        let coin = DbCoin::new("uatom", "100");
        assert_eq!(coin, DbCoin::new("uatom", "100"));
        assert_ne!(coin, DbCoin::new("stake", "100"));
        assert_ne!(coin, DbCoin::new("uatom", "101"));

        let t = ts(1_600_000_000);
        let a = ValidatorDelegationRow::new(CONS, ACC, coin.clone(), 5, t);
        let b = ValidatorDelegationRow::new(CONS, ACC, DbCoin::new("stake", "100"), 5, t);
        assert_ne!(a, b);
    }

    #[test]
    fn coin_amount_decodes_as_integer() {
        let coin = DbCoin::new("uatom", "340282366920938463463374607431768211456");
        let Ok(value) = coin.amount_value() else {
            panic!("valid amount");
        };
        assert_eq!(value.to_string(), coin.amount);

        for bad in ["", "-1", "+1", "1.5", "1_000", " 1"] {
            assert_eq!(
                DbCoin::new("uatom", bad).amount_value().err(),
                Some(DecodeError::InvalidCoinAmount(bad.to_string()))
            );
        }
    }

    #[test]
    fn unbonding_and_redelegation_are_field_sensitive() {
        let coin = DbCoin::new("uatom", "7");
        let t = ts(1_600_000_000);
        let done = ts(1_601_814_400);

        let unbonding = ValidatorUnbondingDelegationRow::new(CONS, ACC, coin.clone(), done, 9, t);
        assert_eq!(
            unbonding,
            ValidatorUnbondingDelegationRow::new(CONS, ACC, coin.clone(), done, 9, t)
        );
        assert_ne!(
            unbonding,
            ValidatorUnbondingDelegationRow::new(CONS, ACC, coin.clone(), t, 9, t)
        );

        let redelegation = ValidatorRedelegationRow::new(ACC, CONS, CONS2, coin.clone(), 9, done);
        assert_eq!(
            redelegation,
            ValidatorRedelegationRow::new(ACC, CONS, CONS2, coin.clone(), 9, done)
        );
        assert_ne!(
            redelegation,
            ValidatorRedelegationRow::new(ACC, CONS2, CONS, coin, 9, done)
        );
    }

    #[test]
    fn commission_absent_differs_from_empty() {
        let t = ts(1_600_000_000);
        let absent = ValidatorCommissionRow::new(OPER, None, Some("1".to_string()), 1, t);
        let empty =
            ValidatorCommissionRow::new(OPER, Some(String::new()), Some("1".to_string()), 1, t);
        assert_ne!(absent, empty);
        assert_eq!(absent, absent.clone());
        assert_eq!(empty, empty.clone());
    }

    #[test]
    fn description_moniker_present_vs_absent() {
        let alice = description(Some("Alice"));
        let anonymous = description(None);
        assert_ne!(alice, anonymous);
        assert_ne!(anonymous, description(Some("")));
        assert_eq!(alice, description(Some("Alice")));
    }

    #[test]
    fn description_absent_fields_survive_serde() {
        let row = description(None);
        let Ok(json) = serde_json::to_string(&row) else {
            panic!("serialization failed");
        };
        let Ok(back) = serde_json::from_str::<ValidatorDescriptionRow>(&json) else {
            panic!("deserialization failed");
        };
        assert_eq!(back, row);
        assert_eq!(back.moniker, None);
        assert_eq!(back.security_contact, None);
        assert_eq!(back.details, Some(String::new()));
    }

    #[test]
    fn validator_data_decodes_every_field() {
        let prefixes = Bech32Prefixes::default();
        let data = validator_data();

        let Ok(cons) = data.decode_cons_address(&prefixes) else {
            panic!("valid consensus address");
        };
        assert_eq!(cons.to_bech32(&prefixes).ok().as_deref(), Some(CONS));

        let Ok(key) = data.decode_cons_pub_key(&prefixes) else {
            panic!("valid consensus key");
        };
        assert_eq!(key.to_bech32(&prefixes).ok().as_deref(), Some(PUBKEY));

        let Ok(operator) = data.decode_operator(&prefixes) else {
            panic!("valid operator address");
        };
        assert_eq!(operator.as_bytes(), cons.as_bytes());

        let Ok(account) = data.decode_self_delegate_address(&prefixes) else {
            panic!("valid account address");
        };
        assert_eq!(account.to_bech32(&prefixes).ok().as_deref(), Some(ACC));

        assert_eq!(data.decode_max_rate().ok(), Some(Dec::from_raw(200_000_000_000_000_000)));
        assert_eq!(
            data.decode_max_change_rate().ok(),
            Some(Dec::from_raw(10_000_000_000_000_000))
        );
        assert!(data.verify(&prefixes).is_ok());
    }

    #[test]
    fn validator_data_rejects_swapped_fields() {
        let prefixes = Bech32Prefixes::default();
        // consensus field holding an account address
        let data = ValidatorData::new(ACC, OPER, PUBKEY, ACC, "1", "1");
        assert!(matches!(
            data.decode_cons_address(&prefixes),
            Err(DecodeError::PrefixMismatch { .. })
        ));
        assert!(data.verify(&prefixes).is_err());

        let data = ValidatorData::new(CONS, CONS, CONS, OPER, "1", "1");
        assert!(data.decode_operator(&prefixes).is_err());
        assert!(data.decode_cons_pub_key(&prefixes).is_err());
        assert!(data.decode_self_delegate_address(&prefixes).is_err());
    }

    #[test]
    fn validator_data_rejects_non_integer_rates() {
        let data = ValidatorData::new(CONS, OPER, PUBKEY, ACC, "0.20", "");
        assert!(matches!(
            data.decode_max_rate(),
            Err(DecodeError::InvalidDecimal { .. })
        ));
        assert!(matches!(
            data.decode_max_change_rate(),
            Err(DecodeError::InvalidDecimal { .. })
        ));
    }

    #[test]
    fn validator_data_joins_identity_and_info() {
        let joined = ValidatorData::from_rows(
            ValidatorRow::new(CONS, PUBKEY),
            ValidatorInfoRow::new(CONS, OPER, ACC, "10000000000000000", "200000000000000000"),
        );
        assert_eq!(joined, validator_data());
    }

    #[test]
    fn nanosecond_block_time_round_trips_through_storage() {
        let fresh = StakingPoolRow::new(1, 2, 3, ts_nanos(1_600_000_000, 123_456_789));
        // what bind_values writes and FromRow reads back
        let Some(stored) = UnixNanos::from_datetime(&fresh.timestamp) else {
            panic!("block time in range");
        };
        let refetched = StakingPoolRow::new(1, 2, 3, DateTime::from(stored));
        assert_eq!(refetched, fresh);

        let microseconds = StakingPoolRow::new(1, 2, 3, ts_nanos(1_600_000_000, 123_456_000));
        assert_ne!(microseconds, fresh);
    }

    #[test]
    fn every_time_field_round_trips_at_nanosecond_precision() {
        let block = ts_nanos(1_600_000_000, 123_456_789);
        let done = ts_nanos(1_601_814_400, 987_654_321);
        let reload = |t: &DateTime<Utc>| {
            let Some(stored) = UnixNanos::from_datetime(t) else {
                panic!("time in range");
            };
            DateTime::<Utc>::from(stored)
        };

        let coin = DbCoin::new("uatom", "7");
        let unbonding =
            ValidatorUnbondingDelegationRow::new(CONS, ACC, coin.clone(), done, 9, block);
        let reloaded = ValidatorUnbondingDelegationRow {
            completion_timestamp: reload(&unbonding.completion_timestamp),
            timestamp: reload(&unbonding.timestamp),
            ..unbonding.clone()
        };
        assert_eq!(reloaded, unbonding);

        let redelegation = ValidatorRedelegationRow::new(ACC, CONS, CONS2, coin, 9, done);
        let reloaded = ValidatorRedelegationRow {
            completion_time: reload(&redelegation.completion_time),
            ..redelegation.clone()
        };
        assert_eq!(reloaded, redelegation);
    }

    #[test]
    fn coin_equality_covers_every_field() {
        let base = DbCoin::new("uatom", "100");
        assert_equivalence(&base);
        assert_each_field_matters(
            &base,
            &[
                ("denom", |c| c.denom = "stake".into()),
                ("amount", |c| c.amount = "0100".into()),
            ],
        );
    }

    #[test]
    fn staking_pool_equality_covers_every_field() {
        let base = StakingPoolRow::new(1_000_000, 500_000, 100, ts(1_600_000_000));
        assert_equivalence(&base);
        assert_each_field_matters(
            &base,
            &[
                ("bonded_tokens", |r| r.bonded_tokens += 1),
                ("not_bonded_tokens", |r| r.not_bonded_tokens = 0),
                ("height", |r| r.height += 1),
                ("timestamp", |r| r.timestamp += Duration::nanoseconds(1)),
            ],
        );
    }

    #[test]
    fn validator_equality_covers_every_field() {
        let base = ValidatorRow::new(CONS, PUBKEY);
        assert_equivalence(&base);
        assert_each_field_matters(
            &base,
            &[
                ("consensus_address", |r| r.consensus_address = CONS2.into()),
                ("consensus_pubkey", |r| r.consensus_pubkey = PUBKEY2.into()),
            ],
        );
    }

    #[test]
    fn validator_info_equality_covers_every_field() {
        let base =
            ValidatorInfoRow::new(CONS, OPER, ACC, "10000000000000000", "200000000000000000");
        assert_equivalence(&base);
        assert_each_field_matters(
            &base,
            &[
                ("consensus_address", |r| r.consensus_address = CONS2.into()),
                ("operator_address", |r| r.operator_address = ACC.into()),
                ("self_delegate_address", |r| r.self_delegate_address = OPER.into()),
                ("max_change_rate", |r| r.max_change_rate = "1".into()),
                ("max_rate", |r| r.max_rate = "1".into()),
            ],
        );
    }

    #[test]
    fn validator_data_equality_covers_every_field() {
        let base = validator_data();
        assert_equivalence(&base);
        assert_each_field_matters(
            &base,
            &[
                ("consensus_address", |d| d.consensus_address = CONS2.into()),
                ("operator_address", |d| d.operator_address = ACC.into()),
                ("consensus_pubkey", |d| d.consensus_pubkey = PUBKEY2.into()),
                ("self_delegate_address", |d| d.self_delegate_address = OPER.into()),
                ("max_rate", |d| d.max_rate = "1".into()),
                ("max_change_rate", |d| d.max_change_rate = "1".into()),
            ],
        );
    }

    #[test]
    fn uptime_equality_covers_every_field() {
        let base = ValidatorUptimeRow::new(CONS, 10_000, 3, 42);
        assert_equivalence(&base);
        assert_each_field_matters(
            &base,
            &[
                ("consensus_address", |r| r.consensus_address = CONS2.into()),
                ("signed_blocks_window", |r| r.signed_blocks_window += 1),
                ("missed_blocks_counter", |r| r.missed_blocks_counter += 1),
                ("height", |r| r.height += 1),
            ],
        );
    }

    #[test]
    fn delegation_equality_covers_every_field() {
        let t = ts(1_600_000_000);
        let base = ValidatorDelegationRow::new(CONS, ACC, DbCoin::new("uatom", "5"), 5, t);
        assert_equivalence(&base);
        assert_each_field_matters(
            &base,
            &[
                ("consensus_address", |r| r.consensus_address = CONS2.into()),
                ("delegator_address", |r| r.delegator_address = OPER.into()),
                ("amount.denom", |r| r.amount.denom = "stake".into()),
                ("amount.amount", |r| r.amount.amount = "6".into()),
                ("height", |r| r.height += 1),
                ("timestamp", |r| r.timestamp += Duration::seconds(1)),
            ],
        );
    }

    #[test]
    fn unbonding_equality_covers_every_field() {
        let t = ts(1_600_000_000);
        let done = ts(1_601_814_400);
        let base =
            ValidatorUnbondingDelegationRow::new(CONS, ACC, DbCoin::new("uatom", "7"), done, 9, t);
        assert_equivalence(&base);
        assert_each_field_matters(
            &base,
            &[
                ("consensus_address", |r| r.consensus_address = CONS2.into()),
                ("delegator_address", |r| r.delegator_address = OPER.into()),
                ("amount", |r| r.amount.amount = "8".into()),
                ("completion_timestamp", |r| r.completion_timestamp = r.timestamp),
                ("height", |r| r.height += 1),
                ("timestamp", |r| r.timestamp = r.completion_timestamp),
            ],
        );
    }

    #[test]
    fn redelegation_equality_covers_every_field() {
        let done = ts(1_601_814_400);
        let coin = DbCoin::new("uatom", "7");
        let base = ValidatorRedelegationRow::new(ACC, CONS, CONS2, coin, 9, done);
        assert_equivalence(&base);
        assert_each_field_matters(
            &base,
            &[
                ("delegator_address", |r| r.delegator_address = OPER.into()),
                ("src_validator_address", |r| r.src_validator_address = OPER.into()),
                ("dst_validator_address", |r| r.dst_validator_address = OPER.into()),
                ("amount", |r| r.amount.denom = "stake".into()),
                ("height", |r| r.height += 1),
                ("completion_time", |r| r.completion_time -= Duration::days(1)),
            ],
        );
    }

    #[test]
    fn commission_equality_covers_every_field() {
        let base = ValidatorCommissionRow::new(
            OPER,
            Some("100000000000000000".to_string()),
            Some("1".to_string()),
            1,
            ts(1_600_000_000),
        );
        assert_equivalence(&base);
        assert_each_field_matters(
            &base,
            &[
                ("operator_address", |r| r.operator_address = ACC.into()),
                ("commission", |r| r.commission = None),
                ("commission", |r| r.commission = Some(String::new())),
                ("min_self_delegation", |r| r.min_self_delegation = None),
                ("min_self_delegation", |r| r.min_self_delegation = Some(String::new())),
                ("min_self_delegation", |r| r.min_self_delegation = Some("2".into())),
                ("height", |r| r.height += 1),
                ("timestamp", |r| r.timestamp += Duration::seconds(1)),
            ],
        );
    }

    #[test]
    fn shares_equality_covers_every_field() {
        let base = ValidatorDelegationSharesRow::new(OPER, ACC, 12.5, ts(1_600_000_000), 3);
        assert_equivalence(&base);
        let nan = ValidatorDelegationSharesRow::new(OPER, ACC, f64::NAN, base.timestamp, 3);
        assert_equivalence(&nan);
        assert_each_field_matters(
            &base,
            &[
                ("operator_address", |r| r.operator_address = CONS.into()),
                ("delegator_address", |r| r.delegator_address = OPER.into()),
                ("shares", |r| r.shares = 12.25),
                ("shares", |r| r.shares = f64::NAN),
                ("timestamp", |r| r.timestamp += Duration::seconds(1)),
                ("height", |r| r.height += 1),
            ],
        );

        let zero = ValidatorDelegationSharesRow::new(OPER, ACC, 0.0, base.timestamp, 3);
        assert_each_field_matters(&zero, &[("shares", |r| r.shares = -0.0)]);
    }

    #[test]
    fn voting_power_equality_covers_every_field() {
        let base = ValidatorVotingPowerRow::new(CONS, 10, 1);
        assert_equivalence(&base);
        assert_each_field_matters(
            &base,
            &[
                ("consensus_address", |r| r.consensus_address = CONS2.into()),
                ("voting_power", |r| r.voting_power += 1),
                ("height", |r| r.height += 1),
            ],
        );
    }

    #[test]
    fn description_equality_covers_every_field() {
        // security_contact starts absent, details starts empty
        let base = description(Some("Alice"));
        assert_equivalence(&base);
        assert_equivalence(&description(None));
        assert_each_field_matters(
            &base,
            &[
                ("operator_address", |r| r.operator_address = ACC.into()),
                ("moniker", |r| r.moniker = None),
                ("moniker", |r| r.moniker = Some("Bob".into())),
                ("identity", |r| r.identity = None),
                ("identity", |r| r.identity = Some("FEDCBA".into())),
                ("website", |r| r.website = None),
                ("website", |r| r.website = Some("https://bob.example".into())),
                ("security_contact", |r| r.security_contact = Some(String::new())),
                ("security_contact", |r| r.security_contact = Some("sec@alice.example".into())),
                ("details", |r| r.details = None),
                ("details", |r| r.details = Some("validator".into())),
                ("height", |r| r.height += 1),
                ("timestamp", |r| r.timestamp += Duration::seconds(1)),
            ],
        );
    }
}
