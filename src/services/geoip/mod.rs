//! GeoIP 服务模块
//!
//! - `provider`: 数据库文件的下载与读取
//! - `maxmind`: GeoLite2-Country 解码与字段映射
//! - `resolver`: 延迟构造、进程内共享的解析器句柄

mod maxmind;
mod provider;
mod resolver;
#[cfg(test)]
pub(crate) mod test_db;

pub use maxmind::{MaxMindLookup, localized_name, pick_name, record_from_country};
pub use provider::{DatabaseBlob, DatabaseProvider, Downloader, HttpDownloader};
pub use resolver::{GeoIpLookup, GeoResolver, LookupConstructor};
