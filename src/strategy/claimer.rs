//! Auto-claimer for Jager pool rewards
//!
//! Polls the pending reward of one account and calls `claim()` on the pool
//! once it reaches the configured threshold.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::adapters::{JagerPool, NodeRpc};
use crate::domain::{checksum, ClaimerState, TokenScale, TxReceipt};
use crate::error::{JagerError, Result};

/// What the claimer needs from the pool
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardSource: Send + Sync {
    async fn pending_reward(&self, account: Address) -> Result<U256>;

    async fn claim(&self) -> Result<TxReceipt>;

    /// Pool's LP token, logged once at startup
    async fn lp_token_address(&self) -> Result<Address>;
}

#[async_trait]
impl<N: NodeRpc> RewardSource for JagerPool<N> {
    async fn pending_reward(&self, account: Address) -> Result<U256> {
        JagerPool::pending_reward(self, account).await
    }

    async fn claim(&self) -> Result<TxReceipt> {
        JagerPool::claim(self).await
    }

    async fn lp_token_address(&self) -> Result<Address> {
        JagerPool::lp_token_address(self).await
    }
}

/// Auto-claimer configuration
#[derive(Debug, Clone)]
pub struct ClaimerConfig {
    /// Account whose pending reward is watched
    pub account: Address,
    /// Claim once pending reward is at or above this many raw units
    pub threshold: U256,
    /// Delay between ticks
    pub poll_interval: Duration,
    /// Whether to claim automatically or just report
    pub auto_claim: bool,
    /// Display scaling for log lines
    pub scale: TokenScale,
}

/// Result of one tick
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// Pending reward below threshold, nothing to do
    BelowThreshold { pending: U256 },
    /// Threshold reached in check-only mode
    WouldClaim { pending: U256 },
    /// Claim transaction mined (it may still have reverted)
    Claimed { pending: U256, receipt: TxReceipt },
}

/// Auto-claimer for one account
pub struct AutoClaimer<C: RewardSource> {
    client: C,
    config: ClaimerConfig,
    state: ClaimerState,
}

impl<C: RewardSource> AutoClaimer<C> {
    /// Create a new auto-claimer
    pub fn new(client: C, config: ClaimerConfig) -> Self {
        Self {
            client,
            config,
            state: ClaimerState::Idle,
        }
    }

    pub fn config(&self) -> &ClaimerConfig {
        &self.config
    }

    pub fn state(&self) -> ClaimerState {
        self.state
    }

    /// Full-precision threshold test
    pub fn should_claim(&self, pending: U256) -> bool {
        pending >= self.config.threshold
    }

    /// Run until a fatal error; the caller handles shutdown signals
    pub async fn run(&mut self) -> Result<()> {
        info!(
            "Starting AutoClaimer for {} (threshold: {}, interval: {}s, auto_claim: {})",
            checksum(&self.config.account),
            self.config.scale.display(self.config.threshold),
            self.config.poll_interval.as_secs(),
            self.config.auto_claim
        );

        match self.client.lp_token_address().await {
            Ok(lp) => debug!("Pool LP token: {}", checksum(&lp)),
            Err(e) => warn!("Could not read LP token address: {}", e),
        }

        loop {
            let result = self.tick().await;
            self.report(result)?;

            debug!(
                "Waiting {}s before next check",
                self.config.poll_interval.as_secs()
            );
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// One read-compare-act cycle
    pub async fn tick(&mut self) -> Result<TickOutcome> {
        let pending = self.client.pending_reward(self.config.account).await?;
        let scale = self.config.scale;

        info!("Pending reward: {}", scale.display(pending));

        if !self.should_claim(pending) {
            return Ok(TickOutcome::BelowThreshold { pending });
        }

        if !self.config.auto_claim {
            info!(
                "[CHECK ONLY] Would claim {} (threshold {})",
                scale.display(pending),
                scale.display(self.config.threshold)
            );
            return Ok(TickOutcome::WouldClaim { pending });
        }

        info!(
            "Pending reward {} reached threshold {}, claiming",
            scale.display(pending),
            scale.display(self.config.threshold)
        );

        self.transition(ClaimerState::Claiming);
        let result = self.client.claim().await;
        self.transition(ClaimerState::Idle);

        let receipt = result?;
        Ok(TickOutcome::Claimed { pending, receipt })
    }

    /// Log a tick result; only fatal errors propagate
    fn report(&self, result: Result<TickOutcome>) -> Result<()> {
        match result {
            Ok(TickOutcome::Claimed { receipt, .. }) if receipt.success => {
                info!("{}", claimed_message(&receipt));
            }
            Ok(TickOutcome::Claimed { receipt, .. }) => {
                warn!("{}", claimed_message(&receipt));
            }
            Ok(TickOutcome::BelowThreshold { .. }) | Ok(TickOutcome::WouldClaim { .. }) => {}
            Err(e) if e.is_fatal() => {
                error!("AutoClaimer stopping: {}", e);
                return Err(e);
            }
            Err(e) => {
                error!("Claim cycle failed: {}", e);
            }
        }
        Ok(())
    }

    fn transition(&mut self, to: ClaimerState) {
        debug_assert!(self.state.can_transition_to(to));
        debug!("Claimer state {} -> {}", self.state, to);
        self.state = to;
    }
}

/// Log line for a mined claim, carrying its transaction hash
fn claimed_message(receipt: &TxReceipt) -> String {
    if receipt.success {
        format!("Claim successful! Tx: {}", receipt.hash_hex())
    } else {
        format!(
            "Claim tx {} was mined but reverted; will re-check next tick",
            receipt.hash_hex()
        )
    }
}

/// Startup check: auto-claim without a key can only ever fail
pub fn ensure_can_claim(auto_claim: bool, has_signer: bool) -> Result<()> {
    if auto_claim && !has_signer {
        return Err(JagerError::NoCredential { op: "claim" });
    }
    Ok(())
}
