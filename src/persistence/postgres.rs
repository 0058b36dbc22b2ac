//! PostgreSQL implementation of the persistence layer.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::ValidatorData;
use super::table::{StakingTable, insert_sql, select_range_sql};
use crate::config::IndexerConfig;
use crate::domain::Snapshot;
use crate::error::StoreError;

const SELECT_VALIDATOR_DATA: &str = "SELECT v.consensus_address, i.operator_address, \
     v.consensus_pubkey, i.self_delegate_address, i.max_rate, i.max_change_rate \
     FROM validator v JOIN validator_info i ON i.consensus_address = v.consensus_address";

/// PostgreSQL-backed row store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStakingStore {
    pool: PgPool,
}

impl PostgresStakingStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the database is unreachable.
    pub async fn connect(config: &IndexerConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the bundled schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Migration`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("schema migrations applied");
        Ok(())
    }

    /// Inserts `rows` in a single transaction.
    ///
    /// Rows whose natural key is already stored are skipped, never updated.
    /// Returns the number of rows actually inserted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on failure; nothing is inserted then.
    pub async fn save<R: StakingTable>(&self, rows: &[R]) -> Result<u64, StoreError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let sql = insert_sql::<R>();
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for row in rows {
            let result = row.bind_values(sqlx::query(&sql)).execute(&mut *tx).await?;
            inserted += result.rows_affected();
        }
        tx.commit().await?;

        tracing::debug!(
            table = R::TABLE,
            rows = rows.len(),
            inserted,
            "saved snapshot rows"
        );
        Ok(inserted)
    }

    /// Loads rows with `from <= height <= to`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on failure.
    pub async fn load_range<R: StakingTable + Snapshot>(
        &self,
        from: i64,
        to: i64,
    ) -> Result<Vec<R>, StoreError> {
        let sql = select_range_sql::<R>();
        let rows = sqlx::query_as::<_, R>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Loads the joined identity and info of every validator.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on failure.
    pub async fn load_validators_data(&self) -> Result<Vec<ValidatorData>, StoreError> {
        let sql = format!("{SELECT_VALIDATOR_DATA} ORDER BY v.consensus_address");
        let rows = sqlx::query_as::<_, ValidatorData>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Loads the joined identity and info of one validator.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on failure.
    pub async fn load_validator_data(
        &self,
        consensus_address: &str,
    ) -> Result<Option<ValidatorData>, StoreError> {
        let sql = format!("{SELECT_VALIDATOR_DATA} WHERE v.consensus_address = $1");
        let row = sqlx::query_as::<_, ValidatorData>(&sql)
            .bind(consensus_address)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
