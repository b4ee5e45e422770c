//! GeoIP 解析器句柄
//!
//! 解码器在第一次使用时构造（下载 + 读取 + 打开），之后整个进程共享。
//! 句柄由启动流程创建并注入各处理器，而不是模块级全局变量。
//! 并发首次访问只会执行一次构造；构造失败不缓存，下次调用重新尝试。

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{error, info, trace};

use super::maxmind::MaxMindLookup;
use super::provider::DatabaseProvider;
use crate::config::GeoIpConfig;
use crate::errors::{IpGeoError, Result};
use crate::storage::GeoRecord;
use crate::utils::is_loopback;

/// GeoIP 查询接口
///
/// 返回 `None` 表示没有可用的地理信息（无记录、回环地址、地址被解码器拒绝）。
#[async_trait]
pub trait GeoIpLookup: Send + Sync {
    async fn lookup(&self, ip: &str) -> Option<GeoRecord>;

    fn name(&self) -> &'static str;
}

type LookupFuture = Pin<Box<dyn Future<Output = Result<Arc<dyn GeoIpLookup>>> + Send>>;

/// 解码器构造函数
pub type LookupConstructor = Arc<dyn Fn() -> LookupFuture + Send + Sync>;

pub struct GeoResolver {
    cell: OnceCell<Arc<dyn GeoIpLookup>>,
    constructor: Option<LookupConstructor>,
}

impl GeoResolver {
    /// 以本地 MaxMind 数据库为后端
    ///
    /// 这里只做配置解析，不访问网络也不读文件。
    pub fn from_config(config: &GeoIpConfig) -> Result<Self> {
        let provider = Arc::new(DatabaseProvider::new(config));
        let path = PathBuf::from(&config.database_path);
        let preference = config.locale_preference().map_err(IpGeoError::config)?;

        Ok(Self::with_constructor(Arc::new(move || {
            let provider = provider.clone();
            let path = path.clone();
            let preference = preference.clone();
            Box::pin(async move {
                let lookup = tokio::task::spawn_blocking(move || {
                    provider.ensure(&path)?;
                    let blob = provider.load(&path)?;
                    info!(
                        "GeoIP database loaded from {} ({} bytes)",
                        path.display(),
                        blob.len()
                    );
                    MaxMindLookup::from_blob(blob, preference)
                })
                .await
                .map_err(|e| IpGeoError::database(format!("GeoIP loader task failed: {}", e)))??;

                Ok(Arc::new(lookup) as Arc<dyn GeoIpLookup>)
            })
        })))
    }

    /// 自定义构造函数（首次 `get` 时调用）
    pub fn with_constructor(constructor: LookupConstructor) -> Self {
        Self {
            cell: OnceCell::new(),
            constructor: Some(constructor),
        }
    }

    /// 使用已构造好的解码器
    pub fn with_lookup(lookup: Arc<dyn GeoIpLookup>) -> Self {
        Self {
            cell: OnceCell::new_with(Some(lookup)),
            constructor: None,
        }
    }

    /// 获取解码器，必要时构造
    pub async fn get(&self) -> Result<Arc<dyn GeoIpLookup>> {
        let lookup = self
            .cell
            .get_or_try_init(|| async {
                let constructor = self.constructor.as_ref().ok_or_else(|| {
                    IpGeoError::database("GeoIP resolver has no constructor")
                })?;
                constructor().await.inspect_err(|e| {
                    error!("Failed to initialize GeoIP resolver: {}", e);
                })
            })
            .await?;
        Ok(lookup.clone())
    }

    /// 解析单个 IP
    ///
    /// 外层 `Err` 表示数据库不可用，`Ok(None)` 表示没有地理信息。
    /// 回环地址不交给解码器，直接返回 `Ok(None)`。
    pub async fn resolve(&self, ip: &str) -> Result<Option<GeoRecord>> {
        let lookup = self.get().await?;
        if is_loopback(ip) {
            trace!("Skipping loopback address {}", ip);
            return Ok(None);
        }
        Ok(lookup.lookup(ip).await)
    }

    pub fn is_ready(&self) -> bool {
        self.cell.initialized()
    }
}
