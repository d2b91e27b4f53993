use jager_claimer::config::AppConfig;
use jager_claimer::domain::checksum;
use jager_claimer::error::Result;
use jager_claimer::signing::Wallet;
use jager_claimer::strategy::{ensure_can_claim, AutoClaimer, ClaimerConfig};
use std::time::Duration;
use tracing::{info, warn};

use crate::main_runtime::{connect_pool, shutdown_signal};

pub async fn run_watch(config: &AppConfig, check_only: bool, interval: Option<u64>) -> Result<()> {
    let auto_claim = config.claimer.auto_claim && !check_only;

    let wallet = Wallet::from_env()?;
    ensure_can_claim(auto_claim, wallet.is_some())?;
    match &wallet {
        Some(wallet) => info!("Signer: {}", checksum(&wallet.address())),
        None => warn!("No private key configured - running in check-only mode"),
    }

    let account = config.account()?;
    let threshold = config.threshold()?;
    let scale = config.token_scale()?;
    let poll_interval = interval
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or_else(|| config.poll_interval());

    let pool = connect_pool(config, wallet).await?;

    let mut claimer = AutoClaimer::new(
        pool,
        ClaimerConfig {
            account,
            threshold,
            poll_interval,
            auto_claim,
            scale,
        },
    );

    tokio::select! {
        result = claimer.run() => result,
        _ = shutdown_signal() => {
            info!("Shutdown signal received, stopping claimer");
            Ok(())
        }
    }
}
