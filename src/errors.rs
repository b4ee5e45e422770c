use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpGeoError {
    Validation(String),
    NotFound(String),
    Download(String),
    FileOperation(String),
    Database(String),
    UpstreamFetch(String),
    Store(String),
    Serialization(String),
    Config(String),
}

impl IpGeoError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            IpGeoError::Validation(_) => "E001",
            IpGeoError::NotFound(_) => "E002",
            IpGeoError::Download(_) => "E003",
            IpGeoError::FileOperation(_) => "E004",
            IpGeoError::Database(_) => "E005",
            IpGeoError::UpstreamFetch(_) => "E006",
            IpGeoError::Store(_) => "E007",
            IpGeoError::Serialization(_) => "E008",
            IpGeoError::Config(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            IpGeoError::Validation(_) => "Validation Error",
            IpGeoError::NotFound(_) => "Resource Not Found",
            IpGeoError::Download(_) => "Download Error",
            IpGeoError::FileOperation(_) => "File Operation Error",
            IpGeoError::Database(_) => "GeoIP Database Error",
            IpGeoError::UpstreamFetch(_) => "Upstream Fetch Error",
            IpGeoError::Store(_) => "Store Error",
            IpGeoError::Serialization(_) => "Serialization Error",
            IpGeoError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            IpGeoError::Validation(msg)
            | IpGeoError::NotFound(msg)
            | IpGeoError::Download(msg)
            | IpGeoError::FileOperation(msg)
            | IpGeoError::Database(msg)
            | IpGeoError::UpstreamFetch(msg)
            | IpGeoError::Store(msg)
            | IpGeoError::Serialization(msg)
            | IpGeoError::Config(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    ///
    /// 只有校验错误是用户可修正的（400），NotFound 在查询路径上会被转换为
    /// `geoInfo: null`，其余均为服务端故障。
    pub fn http_status(&self) -> StatusCode {
        match self {
            IpGeoError::Validation(_) => StatusCode::BAD_REQUEST,
            IpGeoError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for IpGeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for IpGeoError {}

// 便捷的构造函数
impl IpGeoError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        IpGeoError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        IpGeoError::NotFound(msg.into())
    }

    pub fn download<T: Into<String>>(msg: T) -> Self {
        IpGeoError::Download(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        IpGeoError::FileOperation(msg.into())
    }

    pub fn database<T: Into<String>>(msg: T) -> Self {
        IpGeoError::Database(msg.into())
    }

    pub fn upstream_fetch<T: Into<String>>(msg: T) -> Self {
        IpGeoError::UpstreamFetch(msg.into())
    }

    pub fn store<T: Into<String>>(msg: T) -> Self {
        IpGeoError::Store(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        IpGeoError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        IpGeoError::Config(msg.into())
    }
}

impl From<std::io::Error> for IpGeoError {
    fn from(err: std::io::Error) -> Self {
        IpGeoError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for IpGeoError {
    fn from(err: serde_json::Error) -> Self {
        IpGeoError::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for IpGeoError {
    fn from(err: redis::RedisError) -> Self {
        IpGeoError::Store(err.to_string())
    }
}

impl From<maxminddb::MaxMindDbError> for IpGeoError {
    fn from(err: maxminddb::MaxMindDbError) -> Self {
        IpGeoError::Database(err.to_string())
    }
}

impl From<ureq::Error> for IpGeoError {
    fn from(err: ureq::Error) -> Self {
        IpGeoError::UpstreamFetch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IpGeoError>;
