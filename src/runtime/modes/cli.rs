//! CLI mode
//!
//! Runs a single command and exits.

use crate::cli::Commands;
use crate::config::get_config;
use crate::errors::Result;

/// Run CLI mode
pub async fn run_cli(cmd: Commands) -> Result<()> {
    let config = get_config();
    crate::interfaces::cli::run_cli_command(cmd, &config).await
}
