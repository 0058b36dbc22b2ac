//! validator-history entry point.
//!
//! Connects to the indexer database, applies migrations, and audits every
//! stored validator by decoding its addresses, consensus key and rates.
//! Exits with an error if any stored row fails to decode.

use tracing_subscriber::EnvFilter;

use validator_history::config::IndexerConfig;
use validator_history::persistence::PostgresStakingStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = IndexerConfig::from_env();
    let prefixes = config.bech32_prefixes();
    tracing::info!(prefix = %config.bech32_account_prefix, "starting validator-history");

    let store = PostgresStakingStore::connect(&config).await?;
    if config.run_migrations {
        store.migrate().await?;
    }

    let validators = store.load_validators_data().await?;
    let mut corrupted = 0_usize;
    for validator in &validators {
        if let Err(err) = validator.verify(&prefixes) {
            corrupted += 1;
            tracing::error!(
                consensus_address = %validator.consensus_address,
                error = %err,
                "validator row violates stored encoding"
            );
        }
    }

    tracing::info!(
        validators = validators.len(),
        corrupted,
        "validator audit finished"
    );

    if corrupted > 0 {
        anyhow::bail!("{corrupted} stored validator rows failed to decode");
    }
    Ok(())
}
