pub mod ip;
pub mod ip_validator;

pub use ip::{extract_client_ip, extract_request_ip, is_loopback};
pub use ip_validator::{IpVersion, classify_version, is_valid_ip, is_valid_ipv4, is_valid_ipv6};

/// 当前时间（Unix 毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
