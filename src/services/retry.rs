//! 外部请求重试模块
//!
//! 每次尝试独立超时（超时即取消该次调用），失败后线性退避：
//! 第 n 次失败后等待 `backoff_base * n`。次数耗尽后返回最后一次的错误。

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::config::UpstreamConfig;
use crate::errors::{IpGeoError, Result};

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 总尝试次数（含第一次）
    pub max_attempts: u32,
    /// 单次尝试超时
    pub attempt_timeout: Duration,
    /// 退避基数
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(10),
            backoff_base: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            attempt_timeout: Duration::from_millis(config.attempt_timeout_ms),
            backoff_base: Duration::from_millis(config.backoff_base_ms),
        }
    }

    /// 第 `attempt` 次（从 1 开始）失败后的等待时间
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt)
    }
}

/// 带超时的重试执行器
///
/// `operation` 每次调用都应产生一个全新的 future；超时的 future 会被直接 drop。
pub async fn with_retry_timeout<T, F, Fut>(
    operation_name: &str,
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        let error = match timeout(policy.attempt_timeout, operation()).await {
            Ok(Ok(value)) => {
                if attempt > 1 {
                    debug!(
                        "Operation '{}' succeeded on attempt {}/{}",
                        operation_name, attempt, max_attempts
                    );
                }
                return Ok(value);
            }
            Ok(Err(e)) => e,
            Err(_elapsed) => IpGeoError::upstream_fetch(format!(
                "Operation '{}' timed out after {}ms",
                operation_name,
                policy.attempt_timeout.as_millis()
            )),
        };

        if attempt >= max_attempts {
            warn!(
                "Operation '{}' failed after {} attempts: {}",
                operation_name, attempt, error
            );
            return Err(error);
        }

        let delay = policy.backoff(attempt);
        warn!(
            "Operation '{}' failed (attempt {}/{}): {}; retrying in {} ms",
            operation_name,
            attempt,
            max_attempts,
            error,
            delay.as_millis()
        );
        sleep(delay).await;
    }
}
