//! 测试用的最小 GeoLite2-Country 数据库
//!
//! 仅 IPv4，一个搜索树节点：首位为 0 的地址（0.0.0.0/1）指向一条德国记录，
//! 首位为 1 的地址（128.0.0.0/1）没有数据。

const METADATA_MARKER: &[u8] = b"\xab\xcd\xefMaxMind.com";

fn string(out: &mut Vec<u8>, s: &str) {
    assert!(s.len() < 29);
    out.push(0x40 | s.len() as u8);
    out.extend_from_slice(s.as_bytes());
}

fn map(out: &mut Vec<u8>, entries: usize) {
    out.push(0xE0 | entries as u8);
}

fn array(out: &mut Vec<u8>, len: usize) {
    out.push(len as u8);
    out.push(0x04);
}

fn uint16(out: &mut Vec<u8>, v: u16) {
    out.push(0xA2);
    out.extend_from_slice(&v.to_be_bytes());
}

fn uint32(out: &mut Vec<u8>, v: u32) {
    out.push(0xC4);
    out.extend_from_slice(&v.to_be_bytes());
}

fn uint64(out: &mut Vec<u8>, v: u64) {
    out.push(0x08);
    out.push(0x02);
    out.extend_from_slice(&v.to_be_bytes());
}

fn boolean(out: &mut Vec<u8>, v: bool) {
    out.push(v as u8);
    out.push(0x07);
}

fn names(out: &mut Vec<u8>, en: &str, zh: &str) {
    map(out, 2);
    string(out, "en");
    string(out, en);
    string(out, "zh-CN");
    string(out, zh);
}

/// 构造数据库字节
pub fn build() -> Vec<u8> {
    let node_count: u32 = 1;
    let mut out = Vec::new();

    // 搜索树：左子 = 数据区偏移 0，右子 = node_count（空）
    let data_pointer = node_count + 16;
    out.extend_from_slice(&data_pointer.to_be_bytes()[1..]);
    out.extend_from_slice(&node_count.to_be_bytes()[1..]);
    out.extend_from_slice(&[0u8; 16]);

    map(&mut out, 2);
    string(&mut out, "continent");
    map(&mut out, 2);
    string(&mut out, "code");
    string(&mut out, "EU");
    string(&mut out, "names");
    names(&mut out, "Europe", "欧洲");
    string(&mut out, "country");
    map(&mut out, 3);
    string(&mut out, "is_in_european_union");
    boolean(&mut out, true);
    string(&mut out, "iso_code");
    string(&mut out, "DE");
    string(&mut out, "names");
    names(&mut out, "Germany", "德国");

    out.extend_from_slice(METADATA_MARKER);
    map(&mut out, 9);
    string(&mut out, "binary_format_major_version");
    uint16(&mut out, 2);
    string(&mut out, "binary_format_minor_version");
    uint16(&mut out, 0);
    string(&mut out, "build_epoch");
    uint64(&mut out, 1_700_000_000);
    string(&mut out, "database_type");
    string(&mut out, "GeoLite2-Country");
    string(&mut out, "description");
    map(&mut out, 0);
    string(&mut out, "ip_version");
    uint16(&mut out, 4);
    string(&mut out, "languages");
    array(&mut out, 2);
    string(&mut out, "en");
    string(&mut out, "zh-CN");
    string(&mut out, "node_count");
    uint32(&mut out, node_count);
    string(&mut out, "record_size");
    uint16(&mut out, 24);

    out
}
