use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

/// 数据库内置的本地化名称语言
///
/// 与 GeoLite2 `names` 字段的键一一对应。
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, AsRefStr)]
pub enum Locale {
    #[strum(serialize = "de")]
    German,
    #[strum(serialize = "en")]
    English,
    #[strum(serialize = "es")]
    Spanish,
    #[strum(serialize = "fr")]
    French,
    #[strum(serialize = "ja")]
    Japanese,
    #[strum(serialize = "pt-BR")]
    BrazilianPortuguese,
    #[strum(serialize = "ru")]
    Russian,
    #[strum(serialize = "zh-CN")]
    SimplifiedChinese,
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl std::str::FromStr for Locale {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::iter()
            .find(|l| l.as_ref().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let valid: Vec<String> = Locale::iter().map(|l| l.to_string()).collect();
                format!("Invalid locale: '{}'. Valid: {}", s, valid.join(", "))
            })
    }
}

/// KV 存储后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoreType {
    #[default]
    Memory,
    Redis,
}

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 监听地址、端口、worker 数量
/// - geoip: 数据库文件位置与下载源、名称语言
/// - upstream: 外部服务（公网 IP、IP 列表）与重试策略
/// - store: KV 存储后端
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub geoip: GeoIpConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：IPGEO，分隔符：__
    /// 示例：IPGEO__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or("config.toml");

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("IPGEO")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// GeoIP 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoIpConfig {
    /// 本地 mmdb 文件路径（不存在时按需下载）
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// 数据库下载地址
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// 首选名称语言
    #[serde(default = "default_locale")]
    pub locale: String,
    /// 首选语言缺失时的回退语言
    #[serde(default = "default_fallback_locale")]
    pub fallback_locale: String,
    /// 数据库下载整体超时
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl GeoIpConfig {
    /// 名称语言优先级：[首选, 回退]，相同时只保留一个
    pub fn locale_preference(&self) -> Result<Vec<Locale>, String> {
        let primary: Locale = self.locale.parse()?;
        let fallback: Locale = self.fallback_locale.parse()?;
        if primary == fallback {
            Ok(vec![primary])
        } else {
            Ok(vec![primary, fallback])
        }
    }
}

/// 外部服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// 公网 IP 查询接口，返回 `{"ip": "..."}`
    #[serde(default = "default_public_ip_url")]
    pub public_ip_url: String,
    /// 换行分隔的 IP 列表地址
    #[serde(default = "default_ip_list_url")]
    pub ip_list_url: String,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

/// KV 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(rename = "type")]
    #[serde(default)]
    pub store_type: StoreType,
    #[serde(default)]
    pub redis: RedisConfig,
}

/// Redis 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_redis_key_prefix")]
    pub key_prefix: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_cpu_count() -> usize {
    num_cpus::get().min(32)
}

fn default_database_path() -> String {
    "public/GeoLite2-Country.mmdb".to_string()
}

fn default_database_url() -> String {
    "https://raw.githubusercontent.com/Loyalsoldier/geoip/release/GeoLite2-Country.mmdb"
        .to_string()
}

fn default_locale() -> String {
    "zh-CN".to_string()
}

fn default_fallback_locale() -> String {
    "en".to_string()
}

fn default_download_timeout_secs() -> u64 {
    300
}

fn default_public_ip_url() -> String {
    "https://api64.ipify.org?format=json".to_string()
}

fn default_ip_list_url() -> String {
    "https://raw.githubusercontent.com/rdone4425/cfipcaiji/refs/heads/main/ip.txt".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_attempt_timeout_ms() -> u64 {
    10_000
}

fn default_backoff_base_ms() -> u64 {
    1_000
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379/".to_string()
}

fn default_redis_key_prefix() -> String {
    "ipgeo:".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for GeoIpConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            database_url: default_database_url(),
            locale: default_locale(),
            fallback_locale: default_fallback_locale(),
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            public_ip_url: default_public_ip_url(),
            ip_list_url: default_ip_list_url(),
            max_attempts: default_max_attempts(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::default(),
            redis: RedisConfig::default(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_redis_key_prefix(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_upstream_policy() {
        let config = StaticConfig::default();
        assert_eq!(config.upstream.max_attempts, 3);
        assert_eq!(config.upstream.attempt_timeout_ms, 10_000);
        assert_eq!(config.upstream.backoff_base_ms, 1_000);
        assert_eq!(config.geoip.locale, "zh-CN");
        assert_eq!(config.geoip.fallback_locale, "en");
        assert_eq!(config.store.store_type, StoreType::Memory);
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!("zh-CN".parse::<Locale>(), Ok(Locale::SimplifiedChinese));
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::English));
        assert_eq!("pt-br".parse::<Locale>(), Ok(Locale::BrazilianPortuguese));
        assert!("xx".parse::<Locale>().is_err());
    }

    #[test]
    fn test_locale_error_lists_valid_values() {
        let err = "klingon".parse::<Locale>().unwrap_err();
        assert!(err.contains("'klingon'"));
        assert!(err.contains("de, en, es, fr, ja, pt-BR, ru, zh-CN"));
    }

    #[test]
    fn test_locale_preference() {
        let mut geoip = GeoIpConfig::default();
        assert_eq!(
            geoip.locale_preference(),
            Ok(vec![Locale::SimplifiedChinese, Locale::English])
        );
        geoip.locale = "en".to_string();
        assert_eq!(geoip.locale_preference(), Ok(vec![Locale::English]));
        geoip.fallback_locale = "klingon".to_string();
        assert!(geoip.locale_preference().is_err());
    }

    #[test]
    fn test_sample_config_roundtrips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[geoip]"));
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.server.port, 3000);
        assert_eq!(parsed.store.store_type, StoreType::Memory);
    }
}
