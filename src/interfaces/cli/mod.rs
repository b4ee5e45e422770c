//! CLI interface module

pub mod commands;

use crate::cli::Commands;
use crate::config::StaticConfig;
use crate::errors::{IpGeoError, Result};
use crate::runtime::lifetime::startup::{StartupContext, prepare_startup};

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands, config: &StaticConfig) -> Result<()> {
    match cmd {
        Commands::ConfigGen { output_path, force } => {
            commands::config_generate(output_path, force).await
        }
        Commands::UpdateDb => commands::update_database(&config.geoip).await,
        Commands::Lookup { ip } => {
            let ctx = startup(config).await?;
            commands::lookup_ip(&ctx, &ip).await
        }
        Commands::Refresh => {
            let ctx = startup(config).await?;
            commands::refresh_ips(&ctx).await
        }
        Commands::Serve => Err(IpGeoError::config("serve is not a CLI command")),
    }
}

async fn startup(config: &StaticConfig) -> Result<StartupContext> {
    prepare_startup(config)
        .await
        .map_err(|e| IpGeoError::config(format!("{:#}", e)))
}
