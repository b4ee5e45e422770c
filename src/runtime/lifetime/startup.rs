use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::{StaticConfig, validate_config};
use crate::services::{
    GeoResolver, HttpUpstream, IpListSource, LookupService, PublicIpSource, RefreshService,
};
use crate::storage::{KvStore, StoreFactory};

/// 启动上下文
///
/// 所有共享资源在这里构造一次，之后注入各处理器和命令。
#[derive(Clone)]
pub struct StartupContext {
    pub store: Arc<dyn KvStore>,
    pub resolver: Arc<GeoResolver>,
    pub lookup_service: Arc<LookupService>,
    pub refresh_service: Arc<RefreshService>,
}

impl StartupContext {
    /// 由已构造的组件组装上下文
    pub fn new(
        resolver: Arc<GeoResolver>,
        public_ip: Arc<dyn PublicIpSource>,
        ip_list: Arc<dyn IpListSource>,
        store: Arc<dyn KvStore>,
    ) -> Self {
        Self {
            lookup_service: Arc::new(LookupService::new(resolver.clone(), public_ip)),
            refresh_service: Arc::new(RefreshService::new(
                resolver.clone(),
                ip_list,
                store.clone(),
            )),
            resolver,
            store,
        }
    }
}

/// 按配置准备启动上下文
///
/// GeoIP 数据库不在这里加载，第一次查询时才下载/读取。
pub async fn prepare_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    validate_config(config).context("Invalid configuration")?;

    let store = StoreFactory::create(&config.store)
        .await
        .context("Failed to create key-value store")?;

    let resolver = Arc::new(
        GeoResolver::from_config(&config.geoip).context("Failed to create GeoIP resolver")?,
    );
    let upstream = Arc::new(HttpUpstream::new(&config.upstream));
    debug!("Upstream retry policy: {:?}", upstream.policy());

    let ctx = StartupContext::new(resolver, upstream.clone(), upstream, store);

    info!(
        "Pre-startup completed in {} ms (store: {}, database: {})",
        start_time.elapsed().as_millis(),
        ctx.store.backend_name(),
        config.geoip.database_path
    );
    Ok(ctx)
}
