//! Output formatting for one-shot commands.
//!
//! Supports two modes: human-readable tables (default) and JSON (--json).

use serde::Serialize;
use tabled::{Table, Tabled};

use crate::domain::{checksum, ContractSnapshot, TokenScale, TxReceipt, UserInfo};

/// Output mode for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Table
        }
    }
}

/// One `field | value` table row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct FieldRow {
    pub field: String,
    pub value: String,
}

impl FieldRow {
    pub fn new(field: &str, value: impl ToString) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

pub fn snapshot_rows(snapshot: &ContractSnapshot, scale: TokenScale) -> Vec<FieldRow> {
    let pool = &snapshot.pool;
    vec![
        FieldRow::new("contract", checksum(&snapshot.contract)),
        FieldRow::new("lp_token", checksum(&snapshot.lp_token)),
        FieldRow::new("jager_token", checksum(&snapshot.jager_token)),
        FieldRow::new("airdrop", checksum(&snapshot.airdrop)),
        FieldRow::new("end_block", snapshot.end_block),
        FieldRow::new("lock_time_secs", snapshot.lock_time),
        FieldRow::new("release_block_number", snapshot.release_block_number),
        FieldRow::new("reward_per_block", scale.display(snapshot.reward_per_block)),
        FieldRow::new("acc_lp_per_share", pool.acc_lp_per_share),
        FieldRow::new("total_amount", pool.total_amount),
        FieldRow::new("last_reward_block", pool.last_reward_block),
        FieldRow::new("total_reward", scale.display(pool.total_reward)),
        FieldRow::new("release_reward", scale.display(pool.release_reward)),
        FieldRow::new("unreleased_reward", scale.display(pool.unreleased_reward())),
    ]
}

pub fn user_rows(account: &str, info: &UserInfo, scale: TokenScale) -> Vec<FieldRow> {
    let lock_end = match info.lock_ends_at() {
        Some(ts) => ts.to_rfc3339(),
        None => info.lock_ended_timestamp.to_string(),
    };
    vec![
        FieldRow::new("account", account),
        FieldRow::new("amount", info.amount),
        FieldRow::new("reward_debt", info.reward_debt),
        FieldRow::new("pending", scale.display(info.pending)),
        FieldRow::new("lock_ended", lock_end),
        FieldRow::new("locked", info.is_locked_at(chrono::Utc::now())),
    ]
}

pub fn receipt_rows(op: &str, receipt: &TxReceipt) -> Vec<FieldRow> {
    vec![
        FieldRow::new("operation", op),
        FieldRow::new("tx_hash", receipt.hash_hex()),
        FieldRow::new("status", if receipt.success { "success" } else { "reverted" }),
        FieldRow::new(
            "block",
            receipt
                .block_number
                .map(|b| b.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
        FieldRow::new("gas_used", receipt.gas_used),
        FieldRow::new("logs", receipt.logs.len()),
    ]
}

/// Print rows as a table, or `item` as JSON.
pub fn print_rows<T: Serialize>(rows: &[FieldRow], item: &T, mode: OutputMode) -> anyhow::Result<()> {
    match mode {
        OutputMode::Table => {
            if rows.is_empty() {
                println!("(no results)");
            } else {
                println!("{}", Table::new(rows));
            }
        }
        OutputMode::Json => {
            let json = serde_json::to_string_pretty(item)?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Print a simple key-value pair.
pub fn print_kv(key: &str, value: &str) {
    println!("{key}: {value}");
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("\x1b[32m{msg}\x1b[0m");
}

/// Print a warning message.
pub fn print_warn(msg: &str) {
    println!("\x1b[33m{msg}\x1b[0m");
}

/// Prompt user for confirmation. Returns true if confirmed.
pub fn confirm(prompt: &str) -> bool {
    use std::io::{self, Write};
    print!("{prompt} [y/N] ");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input).ok();
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
