//! Block times stored as signed nanoseconds since the Unix epoch.
//!
//! Chain block times carry nanoseconds while `TIMESTAMPTZ` keeps only
//! microseconds, so every time column is a `BIGINT` of unix nanoseconds.
//! Rows keep `DateTime<Utc>` fields and convert at the database boundary.

use chrono::{DateTime, Utc};

/// A `BIGINT` column of nanoseconds since 1970-01-01T00:00:00Z.
///
/// Covers 1677-09-21 through 2262-04-11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct UnixNanos(pub i64);

impl UnixNanos {
    /// Converts a block time, or `None` when it falls outside the `i64`
    /// nanosecond range.
    #[must_use]
    pub fn from_datetime(time: &DateTime<Utc>) -> Option<Self> {
        time.timestamp_nanos_opt().map(Self)
    }
}

impl From<UnixNanos> for DateTime<Utc> {
    fn from(nanos: UnixNanos) -> Self {
        Self::from_timestamp_nanos(nanos.0)
    }
}
