pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod signing;
pub mod strategy;

pub use adapters::{HttpNode, JagerPool, NodeRpc, TxSettings};
pub use config::AppConfig;
pub use domain::{ClaimerState, PoolInfo, TokenScale, TxReceipt, UserInfo};
pub use error::{JagerError, Result};
pub use signing::Wallet;
pub use strategy::{AutoClaimer, ClaimerConfig, RewardSource, TickOutcome};
