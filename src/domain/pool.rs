use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pool-wide accounting, as returned by `poolInfo()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo {
    pub acc_lp_per_share: U256,
    pub total_amount: U256,
    pub last_reward_block: U256,
    pub total_reward: U256,
    pub release_reward: U256,
}

impl PoolInfo {
    /// Reward still held back by the pool (total minus released).
    pub fn unreleased_reward(&self) -> U256 {
        self.total_reward.saturating_sub(self.release_reward)
    }
}

/// Per-account staking state, as returned by `userInfo(address)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// LP tokens staked
    pub amount: U256,
    pub reward_debt: U256,
    /// Reward already settled into the account but not yet claimed
    pub pending: U256,
    /// Unix timestamp (seconds) until which the stake is locked
    pub lock_ended_timestamp: U256,
}

impl UserInfo {
    /// Lock end as a calendar time, if it fits in a timestamp.
    pub fn lock_ends_at(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(u64::try_from(self.lock_ended_timestamp).ok()?).ok()?;
        DateTime::from_timestamp(secs, 0)
    }

    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        match self.lock_ends_at() {
            Some(ends) => ends > now,
            // a timestamp past chrono's range is locked for all practical purposes
            None => !self.lock_ended_timestamp.is_zero(),
        }
    }
}

/// Static parameters of the pool plus current pool info, for `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSnapshot {
    pub contract: Address,
    pub lp_token: Address,
    pub jager_token: Address,
    pub airdrop: Address,
    pub end_block: U256,
    pub lock_time: U256,
    pub release_block_number: U256,
    pub reward_per_block: U256,
    pub pool: PoolInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user(lock_end: U256) -> UserInfo {
        UserInfo {
            amount: U256::from(1_000u64),
            reward_debt: U256::ZERO,
            pending: U256::ZERO,
            lock_ended_timestamp: lock_end,
        }
    }

    #[test]
    fn test_lock_end_conversion() {
        let info = user(U256::from(1_700_000_000u64));
        let ends = info.lock_ends_at().unwrap();
        assert_eq!(ends, Utc.timestamp_opt(1_700_000_000, 0).unwrap());

        assert!(info.is_locked_at(Utc.timestamp_opt(1_699_999_999, 0).unwrap()));
        assert!(!info.is_locked_at(Utc.timestamp_opt(1_700_000_000, 0).unwrap()));
    }

    #[test]
    fn test_unlocked_when_timestamp_is_zero() {
        let info = user(U256::ZERO);
        assert!(!info.is_locked_at(Utc::now()));
    }

    #[test]
    fn test_huge_lock_end_counts_as_locked() {
        let info = user(U256::MAX);
        assert!(info.lock_ends_at().is_none());
        assert!(info.is_locked_at(Utc::now()));
    }

    #[test]
    fn test_unreleased_reward_saturates() {
        let pool = PoolInfo {
            acc_lp_per_share: U256::ZERO,
            total_amount: U256::ZERO,
            last_reward_block: U256::ZERO,
            total_reward: U256::from(10u64),
            release_reward: U256::from(25u64),
        };
        assert_eq!(pool.unreleased_reward(), U256::ZERO);
    }
}
