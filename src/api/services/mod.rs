pub mod health;
pub mod helpers;
pub mod ip;
pub mod types;
pub mod update_ips;

use actix_web::web;

use crate::api::middleware::ip_cors_headers;

pub use health::HealthService;
pub use ip::IpService;
pub use types::*;
pub use update_ips::UpdateIpsService;

/// `/api` 路由
pub fn api_routes() -> actix_web::Scope {
    web::scope("/api")
        .service(
            web::resource("/ip")
                .route(web::get().to(IpService::lookup))
                .route(web::post().to(IpService::lookup))
                .route(web::method(actix_web::http::Method::OPTIONS).to(IpService::options))
                .wrap(ip_cors_headers()),
        )
        .service(
            web::resource("/update-ips")
                .route(web::post().to(UpdateIpsService::update))
                .default_service(web::to(UpdateIpsService::reject_method)),
        )
}

/// `/health` 路由
pub fn health_routes() -> actix_web::Resource {
    web::resource("/health").route(web::get().to(HealthService::health_check))
}
