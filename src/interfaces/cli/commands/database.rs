//! Database download command

use std::path::Path;

use colored::Colorize;

use crate::config::GeoIpConfig;
use crate::errors::{IpGeoError, Result};
use crate::services::geoip::DatabaseProvider;

/// 强制重新下载 GeoIP 数据库
pub async fn update_database(config: &GeoIpConfig) -> Result<()> {
    let provider = DatabaseProvider::new(config);
    let path = config.database_path.clone();

    println!(
        "{} {}",
        "Downloading GeoLite2-Country database from".yellow(),
        provider.url().blue()
    );

    let bytes = tokio::task::spawn_blocking(move || provider.refresh(Path::new(&path)))
        .await
        .map_err(|e| IpGeoError::download(format!("Download task failed: {}", e)))??;

    println!(
        "  {} {} ({} bytes)",
        "Database saved to".green(),
        config.database_path.blue(),
        bytes
    );
    Ok(())
}
