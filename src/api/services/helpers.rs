//! HTTP 响应帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use tracing::error;

use super::types::ErrorResponse;
use crate::errors::IpGeoError;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

/// 从 IpGeoError 构建错误响应（自动映射 HTTP 状态码）
///
/// 5xx 只返回错误类型和消息，不暴露内部细节。
pub fn error_from_ipgeo(err: &IpGeoError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("Error processing request: {}", err);
    }
    json_response(
        status,
        &ErrorResponse {
            success: false,
            error: err.error_type().to_string(),
            code: Some(err.code()),
            message: Some(err.message().to_string()),
        },
    )
}

/// 405 响应
pub fn method_not_allowed() -> HttpResponse {
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &ErrorResponse {
            success: false,
            error: "Method not allowed".to_string(),
            code: None,
            message: None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn test_validation_error_is_400() {
        let resp = error_from_ipgeo(&IpGeoError::validation("Invalid IP address format"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "E001");
        assert_eq!(json["message"], "Invalid IP address format");
    }

    #[actix_rt::test]
    async fn test_download_error_is_500() {
        let resp = error_from_ipgeo(&IpGeoError::download("Failed to download database: 404"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_rt::test]
    async fn test_method_not_allowed_body() {
        let resp = method_not_allowed();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Method not allowed"})
        );
    }
}
