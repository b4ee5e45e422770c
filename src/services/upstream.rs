//! 外部 HTTP 数据源
//!
//! - 公网 IP 查询（请求本身推导不出可用 IP 时的兜底）
//! - 批量刷新使用的 IP 列表
//!
//! 两者都走 `with_retry_timeout`。ureq 是同步客户端，放在 `spawn_blocking`
//! 中执行；Agent 的全局超时与单次尝试超时相同，因此被取消的尝试
//! 最迟在超时后释放底层连接。

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, trace};
use ureq::Agent;

use super::retry::{RetryPolicy, with_retry_timeout};
use crate::config::UpstreamConfig;
use crate::errors::{IpGeoError, Result};

/// 公网 IP 来源
#[async_trait]
pub trait PublicIpSource: Send + Sync {
    async fn fetch_public_ip(&self) -> Result<String>;
}

/// IP 列表来源
#[async_trait]
pub trait IpListSource: Send + Sync {
    /// 返回去掉空行、已 trim 的列表，保持原顺序
    async fn fetch_ip_list(&self) -> Result<Vec<String>>;
}

/// 解析换行分隔的 IP 列表，丢弃空白行
pub fn parse_ip_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Deserialize)]
struct PublicIpResponse {
    #[serde(default)]
    ip: Option<String>,
}

/// 基于 ureq 的外部数据源
#[derive(Clone)]
pub struct HttpUpstream {
    agent: Agent,
    public_ip_url: String,
    ip_list_url: String,
    policy: RetryPolicy,
}

impl HttpUpstream {
    pub fn new(config: &UpstreamConfig) -> Self {
        let policy = RetryPolicy::from_config(config);
        Self {
            agent: build_agent(policy.attempt_timeout),
            public_ip_url: config.public_ip_url.clone(),
            ip_list_url: config.ip_list_url.clone(),
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    fn fetch_public_ip_sync(agent: &Agent, url: &str) -> Result<String> {
        let resp = agent.get(url).call()?;
        if !resp.status().is_success() {
            return Err(IpGeoError::upstream_fetch(format!(
                "HTTP error! status: {}",
                resp.status()
            )));
        }

        let body: PublicIpResponse = resp.into_body().read_json()?;
        match body.ip.map(|ip| ip.trim().to_string()) {
            Some(ip) if !ip.is_empty() => {
                trace!("Public IP service \"{}\" returned {}", url, ip);
                Ok(ip)
            }
            _ => Err(IpGeoError::upstream_fetch(format!(
                "Public IP service \"{}\" returned no ip field",
                url
            ))),
        }
    }

    fn fetch_text_sync(agent: &Agent, url: &str) -> Result<String> {
        let resp = agent.get(url).call()?;
        if !resp.status().is_success() {
            return Err(IpGeoError::upstream_fetch(format!(
                "HTTP error! status: {}",
                resp.status()
            )));
        }
        Ok(resp.into_body().read_to_string()?)
    }

    /// 在线程池中执行同步请求
    async fn run_blocking<T, F>(f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        tokio::task::spawn_blocking(f)
            .await
            .map_err(|e| IpGeoError::upstream_fetch(format!("spawn_blocking failed: {}", e)))?
    }
}

fn build_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

#[async_trait]
impl PublicIpSource for HttpUpstream {
    async fn fetch_public_ip(&self) -> Result<String> {
        with_retry_timeout("fetch_public_ip", self.policy, || {
            let agent = self.agent.clone();
            let url = self.public_ip_url.clone();
            Self::run_blocking(move || Self::fetch_public_ip_sync(&agent, &url))
        })
        .await
    }
}

#[async_trait]
impl IpListSource for HttpUpstream {
    async fn fetch_ip_list(&self) -> Result<Vec<String>> {
        let text = with_retry_timeout("fetch_ip_list", self.policy, || {
            let agent = self.agent.clone();
            let url = self.ip_list_url.clone();
            Self::run_blocking(move || Self::fetch_text_sync(&agent, &url))
        })
        .await?;

        let list = parse_ip_list(&text);
        debug!(
            "Fetched IP list from \"{}\": {} entries",
            self.ip_list_url,
            list.len()
        );
        Ok(list)
    }
}
