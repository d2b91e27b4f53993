use jager_claimer::cli::output::OutputMode;
use jager_claimer::cli::{Cli, Commands, WriteOp};
use jager_claimer::config::AppConfig;
use jager_claimer::error::Result;

pub(crate) async fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_file(path)?,
        None => AppConfig::load()?,
    };
    let mode = OutputMode::from_json_flag(cli.json);

    match &cli.command {
        Commands::Watch {
            check_only,
            interval,
        } => {
            crate::main_runtime::init_logging(&config.logging.level);
            crate::main_modes::run_watch(&config, *check_only, *interval).await?;
        }
        Commands::Status => {
            crate::main_runtime::init_logging_simple();
            crate::main_modes::run_status(&config, mode).await?;
        }
        Commands::User { account } => {
            crate::main_runtime::init_logging_simple();
            crate::main_modes::run_user(&config, account.as_deref(), mode).await?;
        }
        Commands::Pending { account } => {
            crate::main_runtime::init_logging_simple();
            crate::main_modes::run_pending(&config, account.as_deref(), mode).await?;
        }
        write => {
            // Amounts are validated before logging or any network access.
            if let Some((op, yes)) = WriteOp::from_command(write)? {
                crate::main_runtime::init_logging(&config.logging.level);
                crate::main_modes::run_write(&config, op, yes, mode).await?;
            }
        }
    }

    Ok(())
}
