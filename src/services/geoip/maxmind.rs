//! MaxMind GeoLite2-Country 解码
//!
//! 数据库字节在构造时整体交给 `Reader`，之后只读共享。
//! 解码器字段到 `GeoRecord` 的映射是纯函数，便于逐个分支测试。

use std::net::IpAddr;

use async_trait::async_trait;
use maxminddb::Reader;
use maxminddb::geoip2::{self, Names};
use tracing::{trace, warn};

use super::provider::DatabaseBlob;
use super::resolver::GeoIpLookup;
use crate::config::Locale;
use crate::errors::{IpGeoError, Result};
use crate::storage::GeoRecord;
use crate::utils::{is_loopback, now_millis};

/// 取指定语言的名称
pub fn localized_name<'a>(names: &Names<'a>, locale: Locale) -> Option<&'a str> {
    match locale {
        Locale::German => names.german,
        Locale::English => names.english,
        Locale::Spanish => names.spanish,
        Locale::French => names.french,
        Locale::Japanese => names.japanese,
        Locale::BrazilianPortuguese => names.brazilian_portuguese,
        Locale::Russian => names.russian,
        Locale::SimplifiedChinese => names.simplified_chinese,
    }
}

/// 按语言优先级取第一个非空名称，都没有时返回 "Unknown"
pub fn pick_name(names: &Names<'_>, preference: &[Locale]) -> String {
    preference
        .iter()
        .find_map(|locale| localized_name(names, *locale).filter(|s| !s.is_empty()))
        .unwrap_or(GeoRecord::UNKNOWN)
        .to_string()
}

/// 解码结果 → GeoRecord
pub fn record_from_country(
    ip: &str,
    country: &geoip2::Country<'_>,
    preference: &[Locale],
    timestamp: i64,
) -> GeoRecord {
    GeoRecord {
        ip: ip.to_string(),
        country: pick_name(&country.country.names, preference),
        continent: pick_name(&country.continent.names, preference),
        iso_code: country
            .country
            .iso_code
            .filter(|s| !s.is_empty())
            .unwrap_or(GeoRecord::UNKNOWN)
            .to_string(),
        is_eu: country.country.is_in_european_union.unwrap_or(false),
        timestamp,
    }
}

/// MaxMind 解码器
pub struct MaxMindLookup {
    reader: Reader<Vec<u8>>,
    preference: Vec<Locale>,
}

impl MaxMindLookup {
    /// 在数据库字节上构造解码器
    pub fn from_blob(blob: DatabaseBlob, preference: Vec<Locale>) -> Result<Self> {
        let reader = Reader::from_source(blob.into_bytes()).map_err(|e| {
            IpGeoError::database(format!("Failed to open GeoIP database: {}", e))
        })?;
        trace!(
            "GeoIP database opened: type={}, build_epoch={}",
            reader.metadata.database_type, reader.metadata.build_epoch
        );
        Ok(Self { reader, preference })
    }

    fn decode(&self, addr: IpAddr) -> Result<Option<geoip2::Country<'_>>> {
        let result = self.reader.lookup(addr)?;
        Ok(result.decode::<geoip2::Country>()?)
    }
}

#[async_trait]
impl GeoIpLookup for MaxMindLookup {
    async fn lookup(&self, ip: &str) -> Option<GeoRecord> {
        if is_loopback(ip) {
            trace!("Skipping loopback address {}", ip);
            return None;
        }

        let addr: IpAddr = match ip.parse() {
            Ok(addr) => addr,
            Err(_) => {
                trace!("Address {} rejected by decoder", ip);
                return None;
            }
        };

        match self.decode(addr) {
            Ok(Some(country)) => {
                let record = record_from_country(ip, &country, &self.preference, now_millis());
                trace!(
                    "MaxMind lookup for {}: country={}, iso={}",
                    ip, record.country, record.iso_code
                );
                Some(record)
            }
            Ok(None) => {
                trace!("No GeoIP entry for {}", ip);
                None
            }
            Err(e) => {
                warn!("Error looking up IP {}: {}", ip, e);
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maxminddb::geoip2::country;

    fn united_states() -> geoip2::Country<'static> {
        geoip2::Country {
            continent: country::Continent {
                code: Some("NA"),
                names: Names {
                    english: Some("North America"),
                    simplified_chinese: Some("北美洲"),
                    ..Default::default()
                },
                ..Default::default()
            },
            country: country::Country {
                iso_code: Some("US"),
                names: Names {
                    english: Some("United States"),
                    simplified_chinese: Some("美国"),
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_prefers_configured_locale() {
        let chain = [Locale::SimplifiedChinese, Locale::English];
        let record = record_from_country("8.8.8.8", &united_states(), &chain, 1);
        assert_eq!(record.country, "美国");
        assert_eq!(record.continent, "北美洲");
        assert_eq!(record.iso_code, "US");
        assert!(!record.is_eu);
        assert_eq!(record.timestamp, 1);
    }

    #[test]
    fn test_falls_back_to_second_locale() {
        let chain = [Locale::Japanese, Locale::English];
        let record = record_from_country("8.8.8.8", &united_states(), &chain, 1);
        assert_eq!(record.country, "United States");
        assert_eq!(record.continent, "North America");
    }

    #[test]
    fn test_missing_fields_become_unknown() {
        let empty = geoip2::Country::default();
        let chain = [Locale::SimplifiedChinese, Locale::English];
        let record = record_from_country("203.0.113.1", &empty, &chain, 1);
        assert_eq!(record.country, GeoRecord::UNKNOWN);
        assert_eq!(record.continent, GeoRecord::UNKNOWN);
        assert_eq!(record.iso_code, GeoRecord::UNKNOWN);
        assert!(!record.is_eu);
    }

    #[test]
    fn test_eu_flag() {
        let mut germany = united_states();
        germany.country.iso_code = Some("DE");
        germany.country.is_in_european_union = Some(true);
        let record = record_from_country("1.2.3.4", &germany, &[Locale::English], 1);
        assert!(record.is_eu);
        assert_eq!(record.iso_code, "DE");
    }

    #[test]
    fn test_every_locale_maps_to_its_field() {
        let names = Names {
            german: Some("de"),
            english: Some("en"),
            spanish: Some("es"),
            french: Some("fr"),
            japanese: Some("ja"),
            brazilian_portuguese: Some("pt-BR"),
            russian: Some("ru"),
            simplified_chinese: Some("zh-CN"),
        };
        use strum::IntoEnumIterator;
        for locale in Locale::iter() {
            assert_eq!(localized_name(&names, locale), Some(locale.as_ref()));
        }
    }

    fn test_lookup() -> MaxMindLookup {
        MaxMindLookup::from_blob(
            DatabaseBlob::from(super::super::test_db::build()),
            vec![Locale::SimplifiedChinese, Locale::English],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_lookup_maps_database_record() {
        let lookup = test_lookup();
        let record = lookup.lookup("81.2.69.160").await.unwrap();
        assert_eq!(record.ip, "81.2.69.160");
        assert_eq!(record.country, "德国");
        assert_eq!(record.continent, "欧洲");
        assert_eq!(record.iso_code, "DE");
        assert!(record.is_eu);
        assert!(record.timestamp > 0);
    }

    #[tokio::test]
    async fn test_lookup_without_entry_is_none() {
        assert!(test_lookup().lookup("203.0.113.1").await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_skips_loopback() {
        let lookup = test_lookup();
        // 127.0.0.1 落在有数据的网段内，仍然不查询
        assert!(lookup.lookup("127.0.0.1").await.is_none());
        assert!(lookup.lookup("::1").await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_rejected_literal_is_none() {
        assert!(test_lookup().lookup("fe80::1%eth0").await.is_none());
        assert!(test_lookup().lookup("not-an-ip").await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_decoder_error_is_absorbed() {
        // IPv4-only 数据库拒绝 IPv6 查询
        let lookup = test_lookup();
        assert!(lookup.decode("2001:db8::1".parse().unwrap()).is_err());
        assert!(lookup.lookup("2001:db8::1").await.is_none());
    }

    #[test]
    fn test_garbage_blob_is_database_error() {
        let err = MaxMindLookup::from_blob(
            DatabaseBlob::from(b"not a database".to_vec()),
            vec![Locale::English],
        )
        .err()
        .unwrap();
        assert!(matches!(err, IpGeoError::Database(_)));
    }
}
