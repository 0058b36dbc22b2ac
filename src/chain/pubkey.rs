//! Consensus public keys in their bech32 (amino-prefixed) form.
//!
//! A `<prefix>valconspub1...` string wraps the legacy amino encoding of the
//! key: a 4-byte type tag, a length byte, then the key itself.

use std::fmt;

use super::address::{Bech32Prefixes, decode_bech32, encode_bech32};
use crate::error::DecodeError;

static ED25519_AMINO_PREFIX: [u8; 5] = [0x16, 0x24, 0xDE, 0x64, 0x20];
static SECP256K1_AMINO_PREFIX: [u8; 5] = [0xEB, 0x5A, 0xE9, 0x87, 0x21];
static SR25519_AMINO_PREFIX: [u8; 5] = [0x0D, 0xFB, 0x10, 0x05, 0x20];

/// Signature scheme of a consensus key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    /// Ed25519, the default Tendermint/CometBFT validator key.
    Ed25519,
    /// Compressed secp256k1.
    Secp256k1,
    /// Schnorrkel sr25519.
    Sr25519,
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ed25519 => "ed25519",
            Self::Secp256k1 => "secp256k1",
            Self::Sr25519 => "sr25519",
        };
        f.write_str(name)
    }
}

/// Validator consensus public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConsPubKey {
    /// 32-byte Ed25519 key.
    Ed25519([u8; 32]),
    /// 33-byte compressed secp256k1 key.
    Secp256k1([u8; 33]),
    /// 32-byte sr25519 key.
    Sr25519([u8; 32]),
}

impl ConsPubKey {
    /// Decodes a `consensus_pub`-prefixed bech32 public key.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the string is not valid bech32, carries
    /// another prefix, or its payload is not a recognized amino key.
    pub fn from_bech32(value: &str, prefixes: &Bech32Prefixes) -> Result<Self, DecodeError> {
        let bytes = decode_bech32(value, &prefixes.consensus_pub)?;
        Self::from_amino_bytes(&bytes)
    }

    /// Encodes the key back into its bech32 string form.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidPrefix`] if the configured prefix is
    /// not a valid bech32 human-readable part.
    pub fn to_bech32(&self, prefixes: &Bech32Prefixes) -> Result<String, DecodeError> {
        encode_bech32(&prefixes.consensus_pub, &self.to_amino_bytes())
    }

    /// Parses an amino-prefixed key, checking both type tag and length.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnknownPubKeyType`] when the tag is unknown or
    /// the key length does not match the tagged algorithm.
    pub fn from_amino_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let unknown = || DecodeError::UnknownPubKeyType { len: bytes.len() };

        if let Some(key) = bytes.strip_prefix(ED25519_AMINO_PREFIX.as_slice()) {
            return <[u8; 32]>::try_from(key)
                .map(Self::Ed25519)
                .map_err(|_| unknown());
        }
        if let Some(key) = bytes.strip_prefix(SECP256K1_AMINO_PREFIX.as_slice()) {
            return <[u8; 33]>::try_from(key)
                .map(Self::Secp256k1)
                .map_err(|_| unknown());
        }
        if let Some(key) = bytes.strip_prefix(SR25519_AMINO_PREFIX.as_slice()) {
            return <[u8; 32]>::try_from(key)
                .map(Self::Sr25519)
                .map_err(|_| unknown());
        }
        Err(unknown())
    }

    /// Returns the amino encoding (type tag, length, key).
    #[must_use]
    pub fn to_amino_bytes(&self) -> Vec<u8> {
        let (prefix, key) = match self {
            Self::Ed25519(key) => (ED25519_AMINO_PREFIX.as_slice(), key.as_slice()),
            Self::Secp256k1(key) => (SECP256K1_AMINO_PREFIX.as_slice(), key.as_slice()),
            Self::Sr25519(key) => (SR25519_AMINO_PREFIX.as_slice(), key.as_slice()),
        };
        let mut out = Vec::with_capacity(prefix.len() + key.len());
        out.extend_from_slice(prefix);
        out.extend_from_slice(key);
        out
    }

    /// Returns the signature scheme of the key.
    #[must_use]
    pub const fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Ed25519(_) => KeyAlgorithm::Ed25519,
            Self::Secp256k1(_) => KeyAlgorithm::Secp256k1,
            Self::Sr25519(_) => KeyAlgorithm::Sr25519,
        }
    }

    /// Returns the bare key bytes without the amino prefix.
    #[must_use]
    pub fn key_bytes(&self) -> &[u8] {
        match self {
            Self::Ed25519(key) | Self::Sr25519(key) => key.as_slice(),
            Self::Secp256k1(key) => key.as_slice(),
        }
    }
}
