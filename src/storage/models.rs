use serde::{Deserialize, Serialize};

/// 单个 IP 的地理信息记录
///
/// 所有字段总是有值：名称缺失时使用 `UNKNOWN` 占位。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoRecord {
    pub ip: String,
    pub country: String,
    pub continent: String,
    #[serde(rename = "isoCode")]
    pub iso_code: String,
    #[serde(rename = "isEU")]
    pub is_eu: bool,
    /// Unix 毫秒
    pub timestamp: i64,
}

impl GeoRecord {
    /// 名称/代码缺失时的占位值
    pub const UNKNOWN: &'static str = "Unknown";

    /// 以新的时间戳生成副本
    pub fn with_timestamp(self, timestamp: i64) -> Self {
        Self { timestamp, ..self }
    }
}

/// 一次批量刷新的汇总
///
/// 不变式：`processed + errors == total`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResult {
    pub total: usize,
    pub processed: usize,
    pub errors: usize,
    /// Unix 毫秒
    pub last_update: i64,
}
