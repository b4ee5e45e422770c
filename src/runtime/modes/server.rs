//! Server mode
//!
//! Builds the shared services once and starts the actix-web server.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::{error, warn};

use crate::api::middleware::build_cors;
use crate::api::services::{api_routes, health_routes};
use crate::config::get_config;
use crate::runtime::lifetime;
use crate::runtime::lifetime::startup::StartupContext;

/// 注册共享数据和全部路由
///
/// 服务器和集成测试共用。
pub fn configure_app(ctx: &StartupContext) -> impl FnOnce(&mut web::ServiceConfig) + '_ {
    move |cfg| {
        cfg.app_data(web::Data::new(ctx.lookup_service.clone()))
            .app_data(web::Data::new(ctx.refresh_service.clone()))
            .app_data(web::Data::new(ctx.resolver.clone()))
            .app_data(web::Data::new(ctx.store.clone()))
            .service(health_routes())
            .service(api_routes());
    }
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let config = get_config();

    let startup = lifetime::startup::prepare_startup(&config)
        .await
        .inspect_err(|e| error!("Server startup failed: {:#}", e))?;

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(build_cors())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .configure(configure_app(&startup))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .workers(cpu_count)
    .disable_signals();

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(&bind_address)?.run();
    let handle = server.handle();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            handle.stop(true).await;
            warn!("Graceful shutdown completed");
        }
    }

    Ok(())
}
