//! IP 字面量校验
//!
//! 纯函数，只做语法校验：不做 DNS 解析，不接受 CIDR 前缀。
//! - IPv4: 严格的点分十进制，四段，每段 1-3 位数字且不大于 255
//! - IPv6: 标准/压缩形式（含 `::`）、内嵌 IPv4 尾部、链路本地地址的 zone 后缀

use std::net::Ipv6Addr;

use serde::Serialize;

/// IP 版本（粗略分类）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IpVersion {
    #[serde(rename = "IPv4")]
    V4,
    #[serde(rename = "IPv6")]
    V6,
}

impl IpVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            IpVersion::V4 => "IPv4",
            IpVersion::V6 => "IPv6",
        }
    }
}

impl std::fmt::Display for IpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 校验 IPv4 点分十进制
///
/// 接受前导零（`010.0.0.1`），与数字模式的接受集一致；
/// 拒绝空段、非数字、超过三位或大于 255 的段。
pub fn is_valid_ipv4(s: &str) -> bool {
    let mut count = 0;
    for part in s.split('.') {
        count += 1;
        if count > 4 {
            return false;
        }
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        // 最多三位数字，u16 不会溢出
        match part.parse::<u16>() {
            Ok(octet) if octet <= 255 => {}
            _ => return false,
        }
    }
    count == 4
}

/// 校验 IPv6 字面量
///
/// zone 后缀（`%eth0`）只允许出现在链路本地地址（fe80::/10）上，
/// 且只能由字母数字组成。
pub fn is_valid_ipv6(s: &str) -> bool {
    let (addr, zone) = match s.split_once('%') {
        Some((addr, zone)) => (addr, Some(zone)),
        None => (s, None),
    };

    let Ok(parsed) = addr.parse::<Ipv6Addr>() else {
        return false;
    };

    match zone {
        None => true,
        Some(zone) => {
            !zone.is_empty()
                && zone.bytes().all(|b| b.is_ascii_alphanumeric())
                && is_link_local(&parsed)
        }
    }
}

/// 校验任意 IP 字面量
pub fn is_valid_ip(s: &str) -> bool {
    is_valid_ipv4(s) || is_valid_ipv6(s)
}

/// 按是否包含冒号粗略判断版本
///
/// 不重新校验，结果只在输入已通过 `is_valid_ip` 时有意义。
pub fn classify_version(s: &str) -> IpVersion {
    if s.contains(':') {
        IpVersion::V6
    } else {
        IpVersion::V4
    }
}

fn is_link_local(addr: &Ipv6Addr) -> bool {
    (addr.segments()[0] & 0xffc0) == 0xfe80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ipv4() {
        assert!(is_valid_ipv4("0.0.0.0"));
        assert!(is_valid_ipv4("8.8.8.8"));
        assert!(is_valid_ipv4("255.255.255.255"));
        assert!(is_valid_ipv4("192.168.001.010"));
    }

    #[test]
    fn test_invalid_ipv4() {
        assert!(!is_valid_ipv4("256.1.1.1"));
        assert!(!is_valid_ipv4("1.1.1.999"));
        assert!(!is_valid_ipv4("1.1.1"));
        assert!(!is_valid_ipv4("1.1.1.1.1"));
        assert!(!is_valid_ipv4("1..1.1"));
        assert!(!is_valid_ipv4("1.1.1.1/24"));
        assert!(!is_valid_ipv4("a.b.c.d"));
        assert!(!is_valid_ipv4("1.1.1.0001"));
        assert!(!is_valid_ipv4(" 1.1.1.1"));
        assert!(!is_valid_ipv4("+1.1.1.1"));
        assert!(!is_valid_ipv4(""));
    }

    #[test]
    fn test_every_octet_boundary() {
        for octet in 0..=255u16 {
            let ip = format!("10.{}.0.1", octet);
            assert!(is_valid_ip(&ip), "{} should be valid", ip);
        }
        for octet in [256u16, 300, 999] {
            let ip = format!("10.0.{}.1", octet);
            assert!(!is_valid_ip(&ip), "{} should be invalid", ip);
        }
    }

    #[test]
    fn test_valid_ipv6() {
        assert!(is_valid_ipv6("::"));
        assert!(is_valid_ipv6("::1"));
        assert!(is_valid_ipv6("2001:db8::1"));
        assert!(is_valid_ipv6("2001:0db8:0000:0000:0000:ff00:0042:8329"));
        assert!(is_valid_ipv6("fe80::1%eth0"));
        assert!(is_valid_ipv6("::ffff:192.168.1.1"));
        assert!(is_valid_ipv6("64:ff9b::1.2.3.4"));
        assert!(is_valid_ipv6("2001:DB8::ABCD"));
    }

    #[test]
    fn test_invalid_ipv6() {
        assert!(!is_valid_ipv6("12345::1"));
        assert!(!is_valid_ipv6("1:2:3"));
        assert!(!is_valid_ipv6("2001:db8::1::1"));
        assert!(!is_valid_ipv6("2001:db8::/32"));
        assert!(!is_valid_ipv6("gggg::1"));
        assert!(!is_valid_ipv6("fe80::1%"));
        assert!(!is_valid_ipv6("fe80::1%eth-0"));
        assert!(!is_valid_ipv6("2001:db8::1%eth0"));
        assert!(!is_valid_ipv6("::ffff:999.1.1.1"));
    }

    #[test]
    fn test_is_valid_ip_rejects_non_literals() {
        assert!(!is_valid_ip("not-an-ip"));
        assert!(!is_valid_ip("localhost"));
        assert!(!is_valid_ip("example.com"));
        assert!(!is_valid_ip("bad-entry"));
    }

    #[test]
    fn test_classify_version() {
        assert_eq!(classify_version("::1"), IpVersion::V6);
        assert_eq!(classify_version("fe80::1%eth0"), IpVersion::V6);
        assert_eq!(classify_version("8.8.8.8"), IpVersion::V4);
        // 仅按冒号判断，不做校验
        assert_eq!(classify_version("garbage:"), IpVersion::V6);
        assert_eq!(classify_version("garbage"), IpVersion::V4);
    }

    #[test]
    fn test_ip_version_serializes_as_label() {
        assert_eq!(serde_json::to_string(&IpVersion::V6).unwrap(), "\"IPv6\"");
        assert_eq!(IpVersion::V4.to_string(), "IPv4");
    }
}
