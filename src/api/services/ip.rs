use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Responder, web};
use tracing::trace;

use super::helpers::{error_from_ipgeo, json_response};
use super::types::{ClientInfo, IpLookupData, IpLookupResponse, IpQuery};
use crate::services::LookupService;
use crate::utils::extract_client_ip;

/// `/api/ip` 处理器
pub struct IpService;

impl IpService {
    pub async fn lookup(
        req: HttpRequest,
        query: web::Query<IpQuery>,
        service: web::Data<Arc<LookupService>>,
    ) -> impl Responder {
        let request_ip = extract_client_ip(&req);
        trace!(
            "IP lookup: query={:?}, request_ip={:?}",
            query.ip, request_ip
        );

        match service
            .lookup(query.ip.as_deref(), request_ip.as_deref())
            .await
        {
            Ok(lookup) => {
                let client = if query.is_api_call() {
                    None
                } else {
                    Some(ClientInfo::from_request(&req))
                };
                json_response(
                    actix_web::http::StatusCode::OK,
                    &IpLookupResponse {
                        success: true,
                        data: IpLookupData { lookup, client },
                    },
                )
            }
            Err(e) => error_from_ipgeo(&e),
        }
    }

    /// 不带 CORS 预检头的 OPTIONS 请求：200，无响应体
    pub async fn options() -> impl Responder {
        HttpResponse::Ok().finish()
    }
}
