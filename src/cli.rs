//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// ipgeo - IP geolocation lookup service
#[derive(Parser)]
#[command(name = "ipgeo")]
#[command(version)]
#[command(about = "IP geolocation lookup service backed by GeoLite2-Country", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Download the GeoIP database, replacing any existing copy
    UpdateDb,

    /// Run one batch refresh of the IP list into the store
    Refresh,

    /// Resolve a single IP address
    Lookup {
        /// IP address to resolve
        ip: String,
    },

    /// Generate example configuration file
    ConfigGen {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["ipgeo"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_lookup_with_global_config() {
        let cli = Cli::try_parse_from(["ipgeo", "lookup", "8.8.8.8", "-c", "/etc/ipgeo.toml"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Lookup {
                ip: "8.8.8.8".to_string()
            })
        );
        assert_eq!(cli.config.as_deref(), Some("/etc/ipgeo.toml"));
    }

    #[test]
    fn test_parse_config_gen() {
        let cli = Cli::try_parse_from(["ipgeo", "config-gen", "out.toml", "--force"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::ConfigGen {
                output_path: Some("out.toml".to_string()),
                force: true
            })
        );
    }

    #[test]
    fn test_update_db_and_refresh() {
        let cli = Cli::try_parse_from(["ipgeo", "update-db"]).unwrap();
        assert_eq!(cli.command, Some(Commands::UpdateDb));
        let cli = Cli::try_parse_from(["ipgeo", "refresh"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Refresh));
    }
}
