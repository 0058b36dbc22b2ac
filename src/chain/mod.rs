//! Chain-native primitives decoded from stored row fields.
//!
//! Rows keep addresses, public keys and rates in their persisted string
//! form. The types here are the typed view obtained on demand: bech32
//! addresses ([`ConsAddress`], [`ValAddress`], [`AccAddress`]), consensus
//! public keys ([`ConsPubKey`]) and fixed-point decimals ([`Dec`]).

pub mod address;
pub mod dec;
pub mod pubkey;

pub use address::{AccAddress, Bech32Prefixes, ConsAddress, ValAddress};
pub use dec::Dec;
pub use pubkey::{ConsPubKey, KeyAlgorithm};
