//! Error types for decoding, timelines and persistence.
//!
//! [`DecodeError`] is raised when a stored chain encoding (bech32 address,
//! bech32 public key, raw decimal integer, coin amount) cannot be turned
//! back into its typed form. Stored rows are written from values the chain
//! already validated, so a `DecodeError` always means corrupted storage or an
//! encoding mismatch. Callers must treat it as an unrecoverable
//! data-integrity violation and abort the current operation, never as a
//! user-input validation failure to branch on.

use std::num::ParseIntError;

/// Failure to decode a stored chain-native encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The string is not valid classic bech32 (bad charset, mixed case,
    /// missing separator, wrong checksum or bech32m checksum).
    #[error("invalid bech32 string {value:?}: {reason}")]
    InvalidBech32 {
        /// Offending stored value.
        value: String,
        /// Underlying bech32 error message.
        reason: String,
    },

    /// The human-readable prefix differs from the one expected for the field.
    #[error("unexpected bech32 prefix: expected {expected:?}, found {found:?}")]
    PrefixMismatch {
        /// Prefix required for the address or key kind.
        expected: String,
        /// Prefix carried by the stored string.
        found: String,
    },

    /// Decoded address payload is empty or longer than 255 bytes.
    #[error("invalid address length: {0} bytes")]
    InvalidAddressLength(usize),

    /// Public key payload does not carry a recognized type tag and length.
    #[error("unrecognized public key encoding ({len} bytes)")]
    UnknownPubKeyType {
        /// Length of the decoded payload.
        len: usize,
    },

    /// Decimal field is not a base-10 64-bit integer literal.
    #[error("invalid decimal integer {value:?}: {source}")]
    InvalidDecimal {
        /// Offending stored value.
        value: String,
        /// Integer parse failure.
        #[source]
        source: ParseIntError,
    },

    /// Coin amount is not a non-negative integer.
    #[error("invalid coin amount {0:?}")]
    InvalidCoinAmount(String),

    /// A prefix could not be used to encode (empty, too long, bad chars).
    #[error("invalid bech32 prefix {prefix:?}: {reason}")]
    InvalidPrefix {
        /// Rejected prefix.
        prefix: String,
        /// Underlying bech32 error message.
        reason: String,
    },
}

/// Violation of the append-only, height-ordered snapshot history.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    /// The snapshot is older than the latest one already recorded.
    #[error("height regression: latest snapshot is at {latest}, got {height}")]
    HeightRegression {
        /// Height of the latest recorded snapshot.
        latest: i64,
        /// Height of the rejected snapshot.
        height: i64,
    },

    /// The snapshot belongs to a different entity than the timeline.
    #[error("snapshot belongs to a different entity: expected {expected}, got {found}")]
    EntityMismatch {
        /// Debug rendering of the timeline's entity key.
        expected: String,
        /// Debug rendering of the rejected snapshot's key.
        found: String,
    },

    /// A different snapshot of the same entity already exists at this height.
    #[error("conflicting snapshot at height {height}")]
    ConflictingSnapshot {
        /// Height at which both snapshots were recorded.
        height: i64,
    },
}

/// Persistence layer failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Query or connection failure reported by the driver.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
