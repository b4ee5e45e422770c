//! CORS 中间件
//!
//! 允许任意来源，方法限定为 GET/POST/OPTIONS，请求头只放行 Content-Type。
//! 预检请求由中间件直接应答。

use actix_cors::Cors;
use actix_web::http::{Method, header};
use actix_web::middleware::DefaultHeaders;

pub fn build_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}

/// `/api/ip` 的固定 CORS 头
///
/// 不带 `Origin` 的请求 `Cors` 不会加头，这里保证每个响应都有；
/// 已存在的同名头不会被覆盖。
pub fn ip_cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .add((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
}
