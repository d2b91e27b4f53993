use alloy::primitives::Address;
use jager_claimer::cli::output::{
    confirm, print_kv, print_rows, print_success, print_warn, receipt_rows, snapshot_rows,
    user_rows, FieldRow, OutputMode,
};
use jager_claimer::cli::WriteOp;
use jager_claimer::config::AppConfig;
use jager_claimer::domain::{checksum, normalize_address};
use jager_claimer::error::{JagerError, Result};
use jager_claimer::signing::Wallet;
use tracing::info;

use crate::main_runtime::connect_pool;

fn resolve_account(config: &AppConfig, account: Option<&str>) -> Result<Address> {
    match account {
        Some(account) => normalize_address(account),
        None => config.account(),
    }
}

pub async fn run_status(config: &AppConfig, mode: OutputMode) -> Result<()> {
    let pool = connect_pool(config, None).await?;
    let snapshot = pool.snapshot().await?;
    let rows = snapshot_rows(&snapshot, config.token_scale()?);
    print_rows(&rows, &snapshot, mode)?;
    Ok(())
}

pub async fn run_user(config: &AppConfig, account: Option<&str>, mode: OutputMode) -> Result<()> {
    let account = resolve_account(config, account)?;
    let pool = connect_pool(config, None).await?;
    let info = pool.user_info(account).await?;
    let rows = user_rows(&checksum(&account), &info, config.token_scale()?);
    print_rows(&rows, &info, mode)?;
    Ok(())
}

pub async fn run_pending(config: &AppConfig, account: Option<&str>, mode: OutputMode) -> Result<()> {
    let account = resolve_account(config, account)?;
    let scale = config.token_scale()?;
    let pool = connect_pool(config, None).await?;
    let pending = pool.pending_reward(account).await?;

    let rows = vec![
        FieldRow::new("account", checksum(&account)),
        FieldRow::new("pending_raw", pending),
        FieldRow::new("pending", scale.display(pending)),
    ];
    let item = serde_json::json!({
        "account": checksum(&account),
        "pending_raw": pending.to_string(),
        "pending": scale.display(pending).to_string(),
    });
    print_rows(&rows, &item, mode)?;
    Ok(())
}

pub async fn run_write(config: &AppConfig, op: WriteOp, yes: bool, mode: OutputMode) -> Result<()> {
    let wallet = Wallet::from_env()?.ok_or(JagerError::NoCredential { op: op.name() })?;
    let signer = checksum(&wallet.address());

    if !yes {
        print_kv("signer", &signer);
        print_kv("contract", &config.contract.address);
        if !confirm(&format!("Send {}?", op.describe())) {
            print_warn("Aborted");
            return Ok(());
        }
    }

    let pool = connect_pool(config, Some(wallet)).await?;
    info!("Sending {} from {}", op.describe(), signer);

    let receipt = match op {
        WriteOp::Claim => pool.claim().await?,
        WriteOp::UpdatePool => pool.update_pool().await?,
        WriteOp::Deposit(amount) => pool.deposit(amount).await?,
        WriteOp::Withdraw(amount) => pool.withdraw(amount).await?,
        WriteOp::AddReward(amount) => pool.add_reward(amount).await?,
        WriteOp::AddLiquidity {
            token_amount,
            value,
        } => pool.add_liquidity(token_amount, value).await?,
    };

    let rows = receipt_rows(op.name(), &receipt);
    print_rows(&rows, &receipt, mode)?;

    if mode == OutputMode::Table {
        if receipt.success {
            print_success(&format!("{} confirmed: {}", op.name(), receipt.hash_hex()));
        } else {
            print_warn(&format!("{} reverted: {}", op.name(), receipt.hash_hex()));
        }
    }
    Ok(())
}
