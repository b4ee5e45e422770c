//! 配置值验证模块
//!
//! 启动时一次性校验静态配置，错误信息直接面向运维人员。

use url::Url;

use super::{Locale, StaticConfig};
use crate::errors::{IpGeoError, Result};

/// 校验整个静态配置
///
/// 检查项目：
/// 1. locale / fallback_locale 必须是数据库支持的语言
/// 2. 所有外部地址必须是 http(s) URL
/// 3. 重试次数至少为 1，单次超时不为 0
pub fn validate_config(config: &StaticConfig) -> Result<()> {
    validate_locale("geoip.locale", &config.geoip.locale)?;
    validate_locale("geoip.fallback_locale", &config.geoip.fallback_locale)?;

    validate_http_url("geoip.database_url", &config.geoip.database_url)?;
    validate_http_url("upstream.public_ip_url", &config.upstream.public_ip_url)?;
    validate_http_url("upstream.ip_list_url", &config.upstream.ip_list_url)?;

    if config.upstream.max_attempts == 0 {
        return Err(IpGeoError::config(
            "upstream.max_attempts must be at least 1",
        ));
    }
    if config.upstream.attempt_timeout_ms == 0 {
        return Err(IpGeoError::config(
            "upstream.attempt_timeout_ms must be greater than 0",
        ));
    }
    if config.geoip.database_path.trim().is_empty() {
        return Err(IpGeoError::config("geoip.database_path cannot be empty"));
    }

    Ok(())
}

fn validate_locale(key: &str, value: &str) -> Result<()> {
    value
        .parse::<Locale>()
        .map(|_| ())
        .map_err(|e| IpGeoError::config(format!("{}: {}", key, e)))
}

fn validate_http_url(key: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| IpGeoError::config(format!("{}: invalid URL '{}': {}", key, value, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(IpGeoError::config(format!(
            "{}: unsupported scheme '{}', only http and https are allowed",
            key, other
        ))),
    }
}
