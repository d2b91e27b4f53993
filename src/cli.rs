use alloy::primitives::U256;
use clap::{Parser, Subcommand};
use std::str::FromStr;

use crate::error::{JagerError, Result};

pub mod output;

#[derive(Parser, Debug)]
#[command(name = "jager-claimer")]
#[command(version = "0.1.0")]
#[command(about = "Jager LP pool reward watcher and auto-claimer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (default: config/default.toml, config/$JAGER_ENV, then JAGER_* env)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll pending reward and claim when it reaches the threshold
    Watch {
        /// Only report when the threshold is reached, never submit
        #[arg(long)]
        check_only: bool,
        /// Seconds between checks (overrides claimer.poll_interval_secs)
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Show pool parameters and pool info
    Status,
    /// Show staking info for an account (default: claimer.account)
    User { account: Option<String> },
    /// Show pending reward for an account (default: claimer.account)
    Pending { account: Option<String> },
    /// Claim pending reward now
    Claim {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Call updatePool()
    UpdatePool {
        #[arg(short, long)]
        yes: bool,
    },
    /// Deposit LP tokens (raw units)
    Deposit {
        amount: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// Withdraw LP tokens (raw units)
    Withdraw {
        amount: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// Add reward tokens to the pool (raw units)
    AddReward {
        amount: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// Add liquidity: token amount (raw units) plus native value in wei
    AddLiquidity {
        token_amount: String,
        /// Native coin to send, in wei
        #[arg(long)]
        value: String,
        #[arg(short, long)]
        yes: bool,
    },
}

/// A state-changing pool call requested from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Claim,
    UpdatePool,
    Deposit(U256),
    Withdraw(U256),
    AddReward(U256),
    AddLiquidity { token_amount: U256, value: U256 },
}

impl WriteOp {
    /// Extract the write operation and its `--yes` flag, if the command is one
    pub fn from_command(command: &Commands) -> Result<Option<(Self, bool)>> {
        let op = match command {
            Commands::Claim { yes } => (Self::Claim, *yes),
            Commands::UpdatePool { yes } => (Self::UpdatePool, *yes),
            Commands::Deposit { amount, yes } => (Self::Deposit(parse_amount(amount)?), *yes),
            Commands::Withdraw { amount, yes } => (Self::Withdraw(parse_amount(amount)?), *yes),
            Commands::AddReward { amount, yes } => (Self::AddReward(parse_amount(amount)?), *yes),
            Commands::AddLiquidity {
                token_amount,
                value,
                yes,
            } => (
                Self::AddLiquidity {
                    token_amount: parse_amount(token_amount)?,
                    value: parse_amount(value)?,
                },
                *yes,
            ),
            _ => return Ok(None),
        };
        Ok(Some(op))
    }

    /// Contract function name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::UpdatePool => "updatePool",
            Self::Deposit(_) => "deposit",
            Self::Withdraw(_) => "withdraw",
            Self::AddReward(_) => "addReward",
            Self::AddLiquidity { .. } => "addLiquidity",
        }
    }

    /// One-line description for the confirmation prompt
    pub fn describe(&self) -> String {
        match self {
            Self::Claim | Self::UpdatePool => format!("{}()", self.name()),
            Self::Deposit(amount) | Self::Withdraw(amount) | Self::AddReward(amount) => {
                format!("{}({})", self.name(), amount)
            }
            Self::AddLiquidity {
                token_amount,
                value,
            } => format!("addLiquidity({}) with value {} wei", token_amount, value),
        }
    }
}

/// Parse a raw integer amount; `_` separators are allowed
pub fn parse_amount(raw: &str) -> Result<U256> {
    let cleaned = raw.trim().replace('_', "");
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(JagerError::Validation(format!(
            "'{}' is not a non-negative integer amount",
            raw
        )));
    }
    U256::from_str(&cleaned)
        .map_err(|e| JagerError::Validation(format!("Invalid amount '{}': {}", raw, e)))
}
