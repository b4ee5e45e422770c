use clap::Parser;

use ipgeo::cli::{Cli, Commands};
use ipgeo::config::{get_config, init_config};
use ipgeo::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config(cli.config.as_deref());
    let config = get_config();

    // 日志 guard 需要存活到进程结束
    let _log_guard = init_logging(&config.logging);

    match cli.command.unwrap_or(Commands::Serve) {
        #[cfg(feature = "server")]
        Commands::Serve => ipgeo::runtime::modes::run_server().await,
        #[cfg(not(feature = "server"))]
        Commands::Serve => anyhow::bail!("ipgeo was built without the 'server' feature"),
        #[cfg(feature = "cli")]
        cmd => {
            if let Err(e) = ipgeo::runtime::modes::run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
        #[cfg(not(feature = "cli"))]
        _ => anyhow::bail!("ipgeo was built without the 'cli' feature"),
    }
}
