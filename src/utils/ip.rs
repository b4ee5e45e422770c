//! 请求来源 IP 提取
//!
//! 按固定优先级从请求头和连接信息推导客户端 IP：
//! `x-forwarded-for`（取第一个） > `x-real-ip` > `cf-connecting-ip` > 连接对端地址
//!
//! 这里不做任何校验，结果必须经过 `ip_validator` 才能信任。

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;
use tracing::trace;

/// 请求头取值规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRule {
    /// 逗号分隔的列表，取第一个（即原始客户端）
    FirstListEntry,
    /// 整个头部值
    WholeValue,
}

/// 转发头优先级表，按顺序取第一个有值的
pub const FORWARDED_HEADERS: &[(&str, HeaderRule)] = &[
    ("x-forwarded-for", HeaderRule::FirstListEntry),
    ("x-real-ip", HeaderRule::WholeValue),
    ("cf-connecting-ip", HeaderRule::WholeValue),
];

fn apply_rule(raw: &str, rule: HeaderRule) -> Option<String> {
    let value = match rule {
        HeaderRule::FirstListEntry => raw.split(',').next().unwrap_or_default(),
        HeaderRule::WholeValue => raw,
    }
    .trim();

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// 从请求头提取转发的 IP
pub fn extract_forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    FORWARDED_HEADERS.iter().find_map(|(name, rule)| {
        headers
            .get(*name)
            .and_then(|h| h.to_str().ok())
            .and_then(|raw| apply_rule(raw, *rule))
            .inspect(|ip| trace!("Request IP taken from {}: {}", name, ip))
    })
}

/// 从请求头和连接对端地址提取来源 IP
pub fn extract_request_ip(headers: &HeaderMap, remote_addr: Option<&str>) -> Option<String> {
    extract_forwarded_ip_from_headers(headers).or_else(|| {
        remote_addr
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    })
}

/// 从 HttpRequest 提取来源 IP
pub fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    let peer = req.peer_addr().map(|addr| addr.ip().to_string());
    extract_request_ip(req.headers(), peer.as_deref())
}

/// 是否为回环地址（127.0.0.1 / ::1）
///
/// 按解析后的地址比较，因此 `0:0:0:0:0:0:0:1` 同样算作回环。
pub fn is_loopback(ip: &str) -> bool {
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4 == Ipv4Addr::LOCALHOST,
        Ok(IpAddr::V6(v6)) => v6 == Ipv6Addr::LOCALHOST,
        Err(_) => false,
    }
}
