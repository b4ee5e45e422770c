//! GeoIP 数据库文件提供者
//!
//! 负责保证本地存在 mmdb 文件（不存在时下载），并把文件整体读入内存。
//! - `ensure`: 幂等，文件已存在时不访问网络（不校验内容）
//! - `refresh`: 强制重新下载，写临时文件后 rename 替换
//! - `load`: 读取整个文件

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};
use ureq::Agent;

use crate::config::GeoIpConfig;
use crate::errors::{IpGeoError, Result};

/// 数据库原始字节，加载后只读
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseBlob(Vec<u8>);

impl DatabaseBlob {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for DatabaseBlob {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// 下载器抽象，把远端内容流式写入 `dest`
pub trait Downloader: Send + Sync {
    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64>;
}

/// 基于 ureq 的下载器
pub struct HttpDownloader {
    agent: Agent,
}

impl HttpDownloader {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: Agent::config_builder()
                .timeout_global(Some(timeout))
                .build()
                .into(),
        }
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        let resp = self
            .agent
            .get(url)
            .call()
            .map_err(|e| IpGeoError::download(format!("Failed to download database: {}", e)))?;

        if !resp.status().is_success() {
            return Err(IpGeoError::download(format!(
                "Failed to download database: {}",
                resp.status()
            )));
        }

        let mut reader = resp.into_body().into_reader();
        std::io::copy(&mut reader, dest)
            .map_err(|e| IpGeoError::download(format!("Database download interrupted: {}", e)))
    }
}

pub struct DatabaseProvider {
    url: String,
    downloader: Arc<dyn Downloader>,
}

impl DatabaseProvider {
    pub fn new(config: &GeoIpConfig) -> Self {
        Self::with_downloader(
            &config.database_url,
            Arc::new(HttpDownloader::new(Duration::from_secs(
                config.download_timeout_secs,
            ))),
        )
    }

    pub fn with_downloader(url: &str, downloader: Arc<dyn Downloader>) -> Self {
        Self {
            url: url.to_string(),
            downloader,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// 确保数据库文件存在
    ///
    /// 文件已存在时直接返回；下载中途失败会删除不完整文件，下次从头开始。
    pub fn ensure(&self, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;

        if path.exists() {
            debug!("GeoIP database already present at {}", path.display());
            return Ok(());
        }

        info!("Downloading GeoLite2-Country database...");
        let mut file = File::create(path).map_err(|e| {
            IpGeoError::file_operation(format!("Failed to create {}: {}", path.display(), e))
        })?;

        match self.download_into(&mut file) {
            Ok(bytes) => {
                info!(
                    "Database downloaded successfully! {} bytes written to {}",
                    bytes,
                    path.display()
                );
                Ok(())
            }
            Err(e) => {
                drop(file);
                remove_partial(path);
                error!("Error downloading database: {}", e);
                Err(e)
            }
        }
    }

    /// 强制重新下载数据库
    ///
    /// 先写入同目录下的临时文件，成功后 rename 覆盖目标；失败时原文件不受影响。
    pub fn refresh(&self, path: &Path) -> Result<u64> {
        ensure_parent_dir(path)?;

        let temp_path = temp_path_for(path);
        let mut file = File::create(&temp_path).map_err(|e| {
            IpGeoError::file_operation(format!(
                "Failed to create {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        info!("Downloading GeoLite2-Country database from {}", self.url);
        let bytes = match self.download_into(&mut file) {
            Ok(bytes) => bytes,
            Err(e) => {
                drop(file);
                remove_partial(&temp_path);
                return Err(e);
            }
        };
        drop(file);

        fs::rename(&temp_path, path).map_err(|e| {
            remove_partial(&temp_path);
            IpGeoError::file_operation(format!(
                "Failed to move {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            ))
        })?;

        info!("GeoIP database saved to {} ({} bytes)", path.display(), bytes);
        Ok(bytes)
    }

    /// 读取整个数据库文件
    pub fn load(&self, path: &Path) -> Result<DatabaseBlob> {
        let bytes = fs::read(path).map_err(|e| {
            IpGeoError::file_operation(format!("Failed to read {}: {}", path.display(), e))
        })?;
        debug!("Loaded {} bytes from {}", bytes.len(), path.display());
        Ok(DatabaseBlob(bytes))
    }

    fn download_into(&self, file: &mut File) -> Result<u64> {
        let bytes = self.downloader.download(&self.url, file)?;
        file.sync_all().map_err(|e| {
            IpGeoError::file_operation(format!("Failed to flush database file: {}", e))
        })?;
        Ok(bytes)
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            IpGeoError::file_operation(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "geoip.mmdb".into());
    name.push(".tmp");
    path.with_file_name(name)
}

fn remove_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!("Failed to remove partial file {}: {}", path.display(), e);
    }
}
