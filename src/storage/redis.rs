use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tokio::sync::RwLock;
use tracing::{debug, error, trace};

use super::traits::KvStore;
use crate::config::RedisConfig;
use crate::errors::{IpGeoError, Result};

pub struct RedisStore {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    key_prefix: String,
}

impl RedisStore {
    /// 创建客户端并立即建立一次连接，连不上直接失败
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.clone()).map_err(|e| {
            IpGeoError::store(format!("Invalid Redis URL '{}': {}", config.url, e))
        })?;

        let store = Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            key_prefix: config.key_prefix.clone(),
        };

        let mut conn = store.get_connection().await.map_err(|e| {
            error!(
                "Failed to connect to Redis server: {}. Check Redis server status and URL: {}",
                e, config.url
            );
            IpGeoError::store(format!("Redis connection failed: {e}"))
        })?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        debug!(
            "RedisStore connected with prefix '{}': {}",
            store.key_prefix, pong
        );

        Ok(store)
    }

    /// 获取或建立持久连接
    async fn get_connection(&self) -> std::result::Result<MultiplexedConnection, redis::RedisError> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = self.client.get_multiplexed_async_connection().await?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    /// 重置连接（在连接错误时调用）
    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }

    async fn connection_or_reset(&self) -> Result<MultiplexedConnection> {
        match self.get_connection().await {
            Ok(conn) => Ok(conn),
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

/// 每次 SCAN 的建议批量
const SCAN_BATCH_SIZE: usize = 500;

/// 转义 glob 特殊字符，用于 SCAN MATCH 匹配
fn escape_glob(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 去掉存储前缀，排序去重（SCAN 可能重复返回同一个键）
fn strip_prefix_sorted(raw: Vec<String>, key_prefix: &str) -> Vec<String> {
    let mut keys: Vec<String> = raw
        .into_iter()
        .filter_map(|k| k.strip_prefix(key_prefix).map(String::from))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection_or_reset().await?;
        let result: redis::RedisResult<Option<String>> = conn.get(self.make_key(key)).await;
        match result {
            Ok(value) => {
                trace!("Redis GET {} -> {}", key, value.is_some());
                Ok(value)
            }
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut conn = self.connection_or_reset().await?;
        match conn.set::<String, String, ()>(self.make_key(key), value).await {
            Ok(()) => {
                trace!("Redis SET {}", key);
                Ok(())
            }
            Err(e) => {
                error!("Failed to set key '{}': {}", key, e);
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut conn = self.connection_or_reset().await?;
        let pattern = format!("{}*", escape_glob(&self.make_key(prefix)));

        // SCAN 分批遍历，游标回到 0 时结束
        let mut raw: Vec<String> = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let result: redis::RedisResult<(u64, Vec<String>)> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH_SIZE)
                .query_async(&mut conn)
                .await;
            match result {
                Ok((next, batch)) => {
                    raw.extend(batch);
                    cursor = next;
                }
                Err(e) => {
                    error!("Failed to scan keys with prefix '{}': {}", prefix, e);
                    self.reset_connection().await;
                    return Err(e.into());
                }
            }
            if cursor == 0 {
                break;
            }
        }

        Ok(strip_prefix_sorted(raw, &self.key_prefix))
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
