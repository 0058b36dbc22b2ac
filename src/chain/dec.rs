//! Fixed-point decimal with the chain's 18-digit precision.
//!
//! Rates are persisted as the decimal's raw scaled integer in text form:
//! the stored `"50000000000000000"` is the decimal `0.05`, not 5%. Use
//! [`Dec::parse_raw`] to read such a field back.

use bigdecimal::BigDecimal;
use bigdecimal::num_bigint::BigInt;

use crate::error::DecodeError;

/// Fixed-point decimal with [`Dec::PRECISION`] fractional digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dec(BigDecimal);

impl Dec {
    /// Number of fractional digits carried by the raw integer.
    pub const PRECISION: i64 = 18;

    /// Builds the decimal whose raw scaled integer is `raw`.
    #[must_use]
    pub fn from_raw(raw: i64) -> Self {
        Self(BigDecimal::new(BigInt::from(raw), Self::PRECISION))
    }

    /// Parses a stored raw-integer string as a 64-bit base-10 integer.
    ///
    /// Leading `+`/`-` signs are accepted, whitespace and fractional
    /// notation are not.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidDecimal`] if `value` is not an integer
    /// literal or overflows `i64`.
    pub fn parse_raw(value: &str) -> Result<Self, DecodeError> {
        value
            .parse::<i64>()
            .map(Self::from_raw)
            .map_err(|source| DecodeError::InvalidDecimal {
                value: value.to_string(),
                source,
            })
    }

    /// Returns the raw scaled integer (value times 10^18).
    #[must_use]
    pub fn raw(&self) -> BigInt {
        let (digits, _) = self
            .0
            .with_scale(Self::PRECISION)
            .into_bigint_and_exponent();
        digits
    }

    /// Returns the raw scaled integer in the stored text form.
    #[must_use]
    pub fn to_raw_string(&self) -> String {
        self.raw().to_string()
    }

    /// Returns the decimal value.
    #[must_use]
    pub const fn as_big_decimal(&self) -> &BigDecimal {
        &self.0
    }
}

impl From<Dec> for BigDecimal {
    fn from(dec: Dec) -> Self {
        dec.0
    }
}
