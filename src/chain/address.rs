//! Bech32 addresses and the chain's human-readable prefixes.

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Longest address payload accepted, in bytes.
pub const MAX_ADDRESS_LEN: usize = 255;

/// Human-readable bech32 prefixes used by a chain.
///
/// Cosmos SDK chains derive every prefix from the account prefix:
/// `cosmos`, `cosmosvaloper`, `cosmosvalcons`, `cosmosvalconspub`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bech32Prefixes {
    /// Account addresses (delegators, self-delegate accounts).
    pub account: String,
    /// Validator operator addresses.
    pub validator_operator: String,
    /// Validator consensus addresses.
    pub consensus_node: String,
    /// Validator consensus public keys.
    pub consensus_pub: String,
}

impl Bech32Prefixes {
    /// Derives the full prefix set from an account prefix.
    #[must_use]
    pub fn from_account_prefix(account: &str) -> Self {
        Self {
            account: account.to_string(),
            validator_operator: format!("{account}valoper"),
            consensus_node: format!("{account}valcons"),
            consensus_pub: format!("{account}valconspub"),
        }
    }
}

impl Default for Bech32Prefixes {
    fn default() -> Self {
        Self::from_account_prefix("cosmos")
    }
}

/// Decodes a classic bech32 string and checks its prefix.
///
/// The prefix comparison is case-insensitive; mixed-case input is rejected
/// while parsing.
pub(crate) fn decode_bech32(value: &str, prefix: &str) -> Result<Vec<u8>, DecodeError> {
    let checked =
        CheckedHrpstring::new::<Bech32>(value).map_err(|e| DecodeError::InvalidBech32 {
            value: value.to_string(),
            reason: e.to_string(),
        })?;

    let found = checked.hrp();
    if !found.as_str().eq_ignore_ascii_case(prefix) {
        return Err(DecodeError::PrefixMismatch {
            expected: prefix.to_string(),
            found: found.as_str().to_ascii_lowercase(),
        });
    }

    Ok(checked.byte_iter().collect())
}

/// Encodes `bytes` as lowercase classic bech32 under `prefix`.
pub(crate) fn encode_bech32(prefix: &str, bytes: &[u8]) -> Result<String, DecodeError> {
    let invalid = |reason: String| DecodeError::InvalidPrefix {
        prefix: prefix.to_string(),
        reason,
    };
    let hrp = Hrp::parse(prefix).map_err(|e| invalid(e.to_string()))?;
    bech32::encode::<Bech32>(hrp, bytes).map_err(|e| invalid(e.to_string()))
}

fn verify_address_length(bytes: &[u8]) -> Result<(), DecodeError> {
    if bytes.is_empty() || bytes.len() > MAX_ADDRESS_LEN {
        return Err(DecodeError::InvalidAddressLength(bytes.len()));
    }
    Ok(())
}

macro_rules! bech32_address {
    ($(#[$meta:meta])* $name:ident, $field:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Vec<u8>);

        impl $name {
            /// Decodes a bech32 string carrying the prefix found in the
            #[doc = concat!("`", stringify!($field), "` field of [`Bech32Prefixes`].")]
            ///
            /// # Errors
            ///
            /// Returns a [`DecodeError`] when the string is not valid bech32,
            /// carries another prefix, or holds an empty or oversized payload.
            pub fn from_bech32(
                value: &str,
                prefixes: &Bech32Prefixes,
            ) -> Result<Self, DecodeError> {
                let bytes = decode_bech32(value, &prefixes.$field)?;
                verify_address_length(&bytes)?;
                Ok(Self(bytes))
            }

            /// Encodes the address back into its bech32 string form.
            ///
            /// # Errors
            ///
            /// Returns [`DecodeError::InvalidPrefix`] if the configured
            /// prefix cannot be used as a bech32 human-readable part.
            pub fn to_bech32(&self, prefixes: &Bech32Prefixes) -> Result<String, DecodeError> {
                encode_bech32(&prefixes.$field, &self.0)
            }

            /// Wraps raw address bytes.
            #[must_use]
            pub const fn from_bytes(bytes: Vec<u8>) -> Self {
                Self(bytes)
            }

            /// Returns the raw address bytes.
            #[must_use]
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

bech32_address!(
    /// Validator consensus address (`<prefix>valcons1...`).
    ConsAddress,
    consensus_node
);

bech32_address!(
    /// Validator operator address (`<prefix>valoper1...`).
    ValAddress,
    validator_operator
);

bech32_address!(
    /// Account address (`<prefix>1...`).
    AccAddress,
    account
);
