//! 批量刷新服务
//!
//! 拉取 IP 列表 → 逐个解析 → 写入 KV → 记录刷新时间。
//! 单个 IP 失败只计入错误列表，不会中断整批；顺序处理，不并发。

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::geoip::GeoResolver;
use super::upstream::IpListSource;
use crate::errors::Result;
use crate::storage::{GeoRecord, KvStore, RefreshResult};
use crate::utils::{is_valid_ip, now_millis};

/// 单个 IP 失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// 不是合法的 IP 字面量
    InvalidAddress,
    /// 数据库中没有记录
    NotFound,
    /// 写入 KV 失败
    StoreWrite(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::InvalidAddress => f.write_str("invalid address"),
            FailureReason::NotFound => f.write_str("not found"),
            FailureReason::StoreWrite(e) => write!(f, "store write failed: {}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshFailure {
    /// 列表中的原始条目
    pub ip: String,
    pub reason: FailureReason,
}

/// 一批处理的累加器
#[derive(Debug, Default)]
pub struct RefreshOutcome {
    pub processed: Vec<GeoRecord>,
    pub failures: Vec<RefreshFailure>,
}

impl RefreshOutcome {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failures.len()
    }

    fn fail(&mut self, ip: &str, reason: FailureReason) {
        debug!("Refresh entry {:?} failed: {}", ip, reason);
        self.failures.push(RefreshFailure {
            ip: ip.to_string(),
            reason,
        });
    }

    pub fn into_result(self, last_update: i64) -> RefreshResult {
        RefreshResult {
            total: self.total(),
            processed: self.processed.len(),
            errors: self.failures.len(),
            last_update,
        }
    }
}

pub struct RefreshService {
    resolver: Arc<GeoResolver>,
    list_source: Arc<dyn IpListSource>,
    store: Arc<dyn KvStore>,
}

impl RefreshService {
    pub fn new(
        resolver: Arc<GeoResolver>,
        list_source: Arc<dyn IpListSource>,
        store: Arc<dyn KvStore>,
    ) -> Self {
        Self {
            resolver,
            list_source,
            store,
        }
    }

    /// 执行一次完整刷新
    ///
    /// 数据库不可用、列表拉取失败、刷新时间写入失败时返回错误；
    /// 其余失败都体现在 `errors` 计数中。
    pub async fn refresh(&self) -> Result<RefreshResult> {
        self.resolver.get().await?;
        let list = self.list_source.fetch_ip_list().await?;
        info!("Refreshing {} IP entries", list.len());

        let outcome = self.process(&list).await?;
        if !outcome.failures.is_empty() {
            warn!(
                "{} of {} IP entries could not be refreshed",
                outcome.failures.len(),
                list.len()
            );
        }

        let last_update = now_millis();
        self.store.put_last_update(last_update).await?;

        let result = outcome.into_result(last_update);
        info!(
            "IP refresh finished: total={}, processed={}, errors={}",
            result.total, result.processed, result.errors
        );
        Ok(result)
    }

    /// 逐个处理列表条目
    ///
    /// 只有数据库不可用时返回错误；回环地址计为 `NotFound`。
    pub async fn process(&self, list: &[String]) -> Result<RefreshOutcome> {
        let mut outcome = RefreshOutcome::default();

        for entry in list {
            let ip = entry.trim();
            if !is_valid_ip(ip) {
                outcome.fail(entry, FailureReason::InvalidAddress);
                continue;
            }

            let Some(record) = self.resolver.resolve(ip).await? else {
                outcome.fail(entry, FailureReason::NotFound);
                continue;
            };

            let record = record.with_timestamp(now_millis());
            match self.store.put_record(&record).await {
                Ok(()) => outcome.processed.push(record),
                Err(e) => outcome.fail(entry, FailureReason::StoreWrite(e.to_string())),
            }
        }

        Ok(outcome)
    }
}
