//! # validator-history
//!
//! Normalized, height-versioned rows for validator and staking-pool history
//! of a Cosmos SDK style proof-of-stake chain.
//!
//! Rows keep chain identifiers in their stored encoding (bech32 strings, raw
//! decimal integers) so they round-trip through the database unchanged.
//! Typed chain values are decoded on demand from [`persistence::ValidatorData`].
//!
//! ## Architecture
//!
//! ```text
//! Ingestion pipeline (external)
//!     │
//!     ├── Row model (persistence/models)
//!     │       └── decode accessors ──► chain/ (bech32, pubkeys, Dec)
//!     │
//!     ├── SnapshotTimeline (domain/)
//!     │
//!     └── PostgreSQL persistence (persistence/postgres)
//! ```

pub mod chain;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
