//! One-shot lookup and refresh commands

use colored::Colorize;

use crate::errors::{IpGeoError, Result};
use crate::runtime::lifetime::startup::StartupContext;

/// 查询单个 IP 并输出 JSON
pub async fn lookup_ip(ctx: &StartupContext, ip: &str) -> Result<()> {
    let result = ctx.lookup_service.lookup(Some(ip), None).await?;
    println!("{}", to_pretty_json(&result)?);
    if result.geo_info.is_none() {
        eprintln!("{} {}", "No geo information for".yellow(), ip.blue());
    }
    Ok(())
}

/// 执行一次批量刷新并输出汇总
pub async fn refresh_ips(ctx: &StartupContext) -> Result<()> {
    let result = ctx.refresh_service.refresh().await?;
    println!("{}", to_pretty_json(&result)?);
    eprintln!(
        "{} {} processed, {} errors",
        "Refresh finished:".green(),
        result.processed.to_string().green(),
        result.errors.to_string().red()
    );
    Ok(())
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(IpGeoError::from)
}
