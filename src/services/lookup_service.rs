//! 单个 IP 查询服务
//!
//! 目标 IP 的确定顺序：
//! 1. 查询参数 `ip`（必须通过校验，否则 400）
//! 2. 从请求推导的来源 IP（无法通过校验时视为不可用）
//! 3. 以上为空或为回环地址时，查询公网 IP（失败不影响响应）

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::geoip::GeoResolver;
use super::upstream::PublicIpSource;
use crate::errors::{IpGeoError, Result};
use crate::storage::GeoRecord;
use crate::utils::{IpVersion, classify_version, is_loopback, is_valid_ip};

/// 对外的地理信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoInfo {
    pub status: &'static str,
    pub country: String,
    pub continent: String,
    #[serde(rename = "isEU")]
    pub is_eu: bool,
    #[serde(rename = "countryCode")]
    pub country_code: String,
}

impl From<GeoRecord> for GeoInfo {
    fn from(record: GeoRecord) -> Self {
        Self {
            status: "success",
            country: record.country,
            continent: record.continent,
            is_eu: record.is_eu,
            country_code: record.iso_code,
        }
    }
}

/// 查询结果
#[derive(Debug, Clone, Serialize)]
pub struct LookupResult {
    pub ip: String,
    #[serde(rename = "ipVersion")]
    pub ip_version: IpVersion,
    /// RFC 3339
    pub timestamp: String,
    #[serde(rename = "geoInfo")]
    pub geo_info: Option<GeoInfo>,
}

pub struct LookupService {
    resolver: Arc<GeoResolver>,
    public_ip: Arc<dyn PublicIpSource>,
}

impl LookupService {
    pub fn new(resolver: Arc<GeoResolver>, public_ip: Arc<dyn PublicIpSource>) -> Self {
        Self {
            resolver,
            public_ip,
        }
    }

    /// 解析一次查询
    ///
    /// - `query_ip`: 调用方显式指定的 IP，空字符串视为未指定
    /// - `request_ip`: 从请求头/连接推导的 IP，未校验
    ///
    /// 数据库不可用时返回错误；无地理信息时 `geo_info` 为 `None`。
    pub async fn lookup(
        &self,
        query_ip: Option<&str>,
        request_ip: Option<&str>,
    ) -> Result<LookupResult> {
        let mut target = self.select_target(query_ip, request_ip)?;

        if target.as_deref().is_none_or(is_loopback) {
            match self.public_ip.fetch_public_ip().await {
                Ok(ip) => {
                    debug!("Using public IP {} as lookup target", ip);
                    target = Some(ip);
                }
                Err(e) => warn!("Error fetching IP: {}", e),
            }
        }

        let geo_info = match target.as_deref() {
            Some(ip) if !is_loopback(ip) => self.resolver.resolve(ip).await?.map(GeoInfo::from),
            _ => None,
        };

        let ip = target.unwrap_or_else(|| GeoRecord::UNKNOWN.to_string());
        Ok(LookupResult {
            ip_version: classify_version(&ip),
            ip,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            geo_info,
        })
    }

    fn select_target(
        &self,
        query_ip: Option<&str>,
        request_ip: Option<&str>,
    ) -> Result<Option<String>> {
        if let Some(ip) = query_ip.map(str::trim).filter(|s| !s.is_empty()) {
            if !is_valid_ip(ip) {
                return Err(IpGeoError::validation("Invalid IP address format"));
            }
            return Ok(Some(ip.to_string()));
        }

        Ok(request_ip.map(str::trim).and_then(|ip| {
            if is_valid_ip(ip) {
                Some(ip.to_string())
            } else {
                debug!("Ignoring unusable request IP: {:?}", ip);
                None
            }
        }))
    }
}
