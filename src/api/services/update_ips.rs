use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{Responder, web};
use tracing::info;

use super::helpers::{error_from_ipgeo, json_response, method_not_allowed};
use super::types::UpdateIpsResponse;
use crate::services::RefreshService;

/// `/api/update-ips` 处理器
pub struct UpdateIpsService;

impl UpdateIpsService {
    /// 同步执行一次批量刷新，请求体被忽略
    pub async fn update(service: web::Data<Arc<RefreshService>>) -> impl Responder {
        info!("Batch IP refresh requested");
        match service.refresh().await {
            Ok(result) => json_response(
                StatusCode::OK,
                &UpdateIpsResponse {
                    success: true,
                    result,
                },
            ),
            Err(e) => error_from_ipgeo(&e),
        }
    }

    pub async fn reject_method() -> impl Responder {
        method_not_allowed()
    }
}
