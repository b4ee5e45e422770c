use async_trait::async_trait;

use super::models::GeoRecord;
use crate::errors::Result;

/// IP 记录键前缀
pub const RECORD_KEY_PREFIX: &str = "ip:";
/// 最近一次刷新时间的键
pub const LAST_UPDATE_KEY: &str = "last_update";

/// `ip:<address>`
pub fn record_key(ip: &str) -> String {
    format!("{}{}", RECORD_KEY_PREFIX, ip)
}

/// 抽象 KV 存储
///
/// 只要求单键原子读写，不要求跨键事务。值统一为 JSON 文本。
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// 整值替换写入
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// 列出带指定前缀的全部键
    async fn keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// 后端名称（用于日志和健康检查）
    fn backend_name(&self) -> &'static str;

    async fn put_record(&self, record: &GeoRecord) -> Result<()> {
        let value = serde_json::to_string(record)?;
        self.set(&record_key(&record.ip), value).await
    }

    async fn get_record(&self, ip: &str) -> Result<Option<GeoRecord>> {
        match self.get(&record_key(ip)).await? {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn put_last_update(&self, timestamp: i64) -> Result<()> {
        self.set(LAST_UPDATE_KEY, timestamp.to_string()).await
    }

    async fn get_last_update(&self) -> Result<Option<i64>> {
        match self.get(LAST_UPDATE_KEY).await? {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }
}
