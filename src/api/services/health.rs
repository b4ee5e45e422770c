use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{Responder, web};
use tracing::trace;

use super::helpers::json_response;
use super::types::HealthResponse;
use crate::services::GeoResolver;
use crate::storage::KvStore;

/// Health Service
///
/// 只报告状态，不触发数据库下载，也不访问存储。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        resolver: web::Data<Arc<GeoResolver>>,
        store: web::Data<Arc<dyn KvStore>>,
    ) -> impl Responder {
        trace!("Received health check request");
        json_response(
            StatusCode::OK,
            &HealthResponse {
                status: "ok",
                resolver_ready: resolver.is_ready(),
                store: store.backend_name(),
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
        )
    }
}
