use clap::Parser;
use jager_claimer::cli::Cli;
use jager_claimer::error::Result;

mod main_dispatch;
mod main_modes;
mod main_runtime;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    main_dispatch::run(&cli).await
}
