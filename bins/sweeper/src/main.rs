//! Tenor maintenance sweeper.
//!
//! Deletes expired vouchers on a fixed interval until interrupted.

use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tenor_db::{VoucherRepository, connect};
use tenor_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tenor=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect(&config.database).await?;
    info!("Connected to database");

    let vouchers = VoucherRepository::new(db);
    let mut ticker = tokio::time::interval(Duration::from_secs(config.sweeper.interval_secs.max(1)));
    info!(interval_secs = config.sweeper.interval_secs, "Sweeper started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match vouchers.purge_expired(Utc::now()).await {
                    Ok(0) => {}
                    Ok(purged) => info!(purged, "Purged expired vouchers"),
                    // next tick retries
                    Err(e) => error!(error = %e, "Voucher purge failed"),
                }
            }
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for shutdown signal")?;
                info!("Shutting down sweeper");
                break;
            }
        }
    }

    Ok(())
}
