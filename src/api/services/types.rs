//! HTTP 请求/响应类型

use std::collections::BTreeMap;

use actix_web::HttpRequest;
use actix_web::http::header;
use serde::{Deserialize, Serialize};

use crate::services::LookupResult;
use crate::storage::RefreshResult;

/// `/api/ip` 查询参数
#[derive(Debug, Default, Deserialize)]
pub struct IpQuery {
    pub ip: Option<String>,
    /// 存在且非空时视为 API 调用，不附带请求信息
    pub api: Option<String>,
}

impl IpQuery {
    pub fn is_api_call(&self) -> bool {
        self.api.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// 非 API 调用时附带的请求信息
#[derive(Debug, Serialize)]
pub struct ClientInfo {
    #[serde(rename = "userAgent", skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(rename = "acceptLanguage", skip_serializing_if = "Option::is_none")]
    pub accept_language: Option<String>,
    pub headers: BTreeMap<String, String>,
}

impl ClientInfo {
    pub fn from_request(req: &HttpRequest) -> Self {
        let header_value = |name: header::HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };

        // 同名头部用 ", " 合并
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in req.headers().iter() {
            let Ok(value) = value.to_str() else {
                continue;
            };
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }

        Self {
            user_agent: header_value(header::USER_AGENT),
            accept_language: header_value(header::ACCEPT_LANGUAGE),
            headers,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IpLookupData {
    #[serde(flatten)]
    pub lookup: LookupResult,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientInfo>,
}

/// `/api/ip` 成功响应
#[derive(Debug, Serialize)]
pub struct IpLookupResponse {
    pub success: bool,
    pub data: IpLookupData,
}

/// `/api/update-ips` 成功响应
#[derive(Debug, Serialize)]
pub struct UpdateIpsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: RefreshResult,
}

/// 统一错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `/health` 响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub resolver_ready: bool,
    pub store: &'static str,
    pub timestamp: String,
}
