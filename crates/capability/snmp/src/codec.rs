//! 请求描述符与三种解码策略。
//!
//! 每个调用点按需构造 `RequestDescriptor`；解码按声明的结果形状进行：
//! - `Raw`：原样返回（字节串按 UTF-8 宽松转文本）
//! - `HexOctets`：冒号分隔的大写十六进制字节对（物理地址/MAC）
//! - `DottedIndexArray`：整数序列以 `.` 重新连接（IP 形状的表列）

use crate::error::SnmpError;
use crate::oid::OidPath;
use std::collections::HashMap;

/// 读取方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// 单值 get
    SingleGet,
    /// 子树遍历（表形数据，每行一个索引）
    SubtreeWalk,
}

/// 结果解码方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeKind {
    Raw,
    HexOctets,
    DottedIndexArray,
}

/// 一条 SNMP 请求描述符（每个调用点即时构造，不可变）。
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// 点分十进制 OID
    pub path: String,
    /// 逻辑字段名（结果映射的 key）
    pub key: String,
    pub mode: FetchMode,
    pub decode: DecodeKind,
}

impl RequestDescriptor {
    /// 单值 get、原样解码。
    pub fn get(path: &str, key: &str) -> Self {
        Self {
            path: path.to_string(),
            key: key.to_string(),
            mode: FetchMode::SingleGet,
            decode: DecodeKind::Raw,
        }
    }

    /// 子树遍历、原样解码。
    pub fn walk(path: &str, key: &str) -> Self {
        Self {
            path: path.to_string(),
            key: key.to_string(),
            mode: FetchMode::SubtreeWalk,
            decode: DecodeKind::Raw,
        }
    }

    /// 子树遍历、十六进制字节对解码。
    pub fn walk_hex(path: &str, key: &str) -> Self {
        Self {
            path: path.to_string(),
            key: key.to_string(),
            mode: FetchMode::SubtreeWalk,
            decode: DecodeKind::HexOctets,
        }
    }

    /// 子树遍历、点分整数序列解码。
    pub fn walk_dotted(path: &str, key: &str) -> Self {
        Self {
            path: path.to_string(),
            key: key.to_string(),
            mode: FetchMode::SubtreeWalk,
            decode: DecodeKind::DottedIndexArray,
        }
    }
}

/// 传输层返回的标量值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnmpScalar {
    Integer(i64),
    Unsigned(u64),
    TimeTicks(u32),
    Text(String),
    Bytes(Vec<u8>),
    IpAddress([u8; 4]),
    ObjectId(String),
    Null,
}

impl SnmpScalar {
    /// 以文本形式呈现任意标量。
    pub fn as_text(&self) -> String {
        match self {
            SnmpScalar::Integer(value) => value.to_string(),
            SnmpScalar::Unsigned(value) => value.to_string(),
            SnmpScalar::TimeTicks(value) => value.to_string(),
            SnmpScalar::Text(value) => value.clone(),
            SnmpScalar::Bytes(bytes) => String::from_utf8_lossy(bytes).to_string(),
            SnmpScalar::IpAddress(octets) => {
                format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3])
            }
            SnmpScalar::ObjectId(oid) => oid.clone(),
            SnmpScalar::Null => String::new(),
        }
    }

    /// 整数视图（计数/枚举列）。
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SnmpScalar::Integer(value) => Some(*value),
            SnmpScalar::Unsigned(value) => i64::try_from(*value).ok(),
            SnmpScalar::TimeTicks(value) => Some(i64::from(*value)),
            SnmpScalar::Text(value) => value.parse().ok(),
            _ => None,
        }
    }

    /// 字节串归一化为文本，其余原样。
    fn normalized(self) -> SnmpScalar {
        match self {
            SnmpScalar::Bytes(bytes) => {
                SnmpScalar::Text(String::from_utf8_lossy(&bytes).to_string())
            }
            other => other,
        }
    }
}

/// 解码结果：单值或以相对索引为键的表。
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Scalar(SnmpScalar),
    Table(HashMap<String, SnmpScalar>),
}

impl DecodedValue {
    pub fn scalar(&self) -> Option<&SnmpScalar> {
        match self {
            DecodedValue::Scalar(value) => Some(value),
            DecodedValue::Table(_) => None,
        }
    }

    pub fn table(&self) -> Option<&HashMap<String, SnmpScalar>> {
        match self {
            DecodedValue::Table(rows) => Some(rows),
            DecodedValue::Scalar(_) => None,
        }
    }
}

/// 按描述符声明的形状解码一组 (OID, 标量)。
pub fn decode(
    descriptor: &RequestDescriptor,
    base: &OidPath,
    entries: Vec<(OidPath, SnmpScalar)>,
) -> Result<DecodedValue, SnmpError> {
    match descriptor.mode {
        FetchMode::SingleGet => {
            let (_, scalar) = entries
                .into_iter()
                .next()
                .ok_or_else(|| SnmpError::EmptyResponse(descriptor.path.clone()))?;
            Ok(DecodedValue::Scalar(apply_kind(descriptor.decode, scalar)))
        }
        FetchMode::SubtreeWalk => {
            let mut rows = HashMap::new();
            for (oid, scalar) in entries {
                // 索引 = 完整 OID 去掉基路径长度的后缀
                let Some(index) = oid.index_after(base) else {
                    continue;
                };
                rows.insert(index, apply_kind(descriptor.decode, scalar));
            }
            Ok(DecodedValue::Table(rows))
        }
    }
}

fn apply_kind(kind: DecodeKind, scalar: SnmpScalar) -> SnmpScalar {
    match kind {
        DecodeKind::Raw => scalar.normalized(),
        DecodeKind::HexOctets => SnmpScalar::Text(hex_octets(scalar)),
        DecodeKind::DottedIndexArray => SnmpScalar::Text(dotted_sequence(scalar)),
    }
}

/// 字节串渲染为 `AA:BB:CC` 形式。
fn hex_octets(scalar: SnmpScalar) -> String {
    match scalar {
        SnmpScalar::Bytes(bytes) => {
            let pairs: Vec<String> = bytes.iter().map(|byte| format!("{:02X}", byte)).collect();
            pairs.join(":")
        }
        SnmpScalar::Text(text) => colon_hex_pairs(&text),
        other => other.as_text(),
    }
}

/// 十六进制字符串按字节对冒号连接；无法整对拆分时原样返回。
fn colon_hex_pairs(text: &str) -> String {
    let clean = text.len() % 2 == 0
        && !text.is_empty()
        && text.chars().all(|ch| ch.is_ascii_hexdigit());
    if !clean {
        return text.to_string();
    }
    let upper = text.to_ascii_uppercase();
    let pairs: Vec<&str> = upper
        .as_bytes()
        .chunks(2)
        .map(|pair| std::str::from_utf8(pair).unwrap_or(""))
        .collect();
    pairs.join(":")
}

/// 整数序列以 `.` 重新连接（IP 地址形状的表列）。
fn dotted_sequence(scalar: SnmpScalar) -> String {
    match scalar {
        SnmpScalar::IpAddress(octets) => {
            format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3])
        }
        SnmpScalar::Bytes(bytes) => {
            let parts: Vec<String> = bytes.iter().map(|byte| byte.to_string()).collect();
            parts.join(".")
        }
        other => other.as_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> OidPath {
        "1.3.6.1.2.1.2.2.1.6".parse().unwrap()
    }

    fn entry(suffix: &str, scalar: SnmpScalar) -> (OidPath, SnmpScalar) {
        let oid: OidPath = format!("1.3.6.1.2.1.2.2.1.6.{}", suffix).parse().unwrap();
        (oid, scalar)
    }

    #[test]
    fn single_get_returns_scalar() {
        let descriptor = RequestDescriptor::get("1.3.6.1.2.1.1.5.0", "name");
        let base: OidPath = descriptor.path.parse().unwrap();
        let decoded = decode(
            &descriptor,
            &base,
            vec![(base.clone(), SnmpScalar::Bytes(b"core-sw1".to_vec()))],
        )
        .unwrap();
        assert_eq!(
            decoded.scalar(),
            Some(&SnmpScalar::Text("core-sw1".to_string()))
        );
    }

    #[test]
    fn single_get_empty_is_error() {
        let descriptor = RequestDescriptor::get("1.3.6.1.2.1.1.5.0", "name");
        let base: OidPath = descriptor.path.parse().unwrap();
        assert!(matches!(
            decode(&descriptor, &base, Vec::new()),
            Err(SnmpError::EmptyResponse(_))
        ));
    }

    #[test]
    fn walk_keys_by_relative_index() {
        let descriptor = RequestDescriptor::walk("1.3.6.1.2.1.2.2.1.6", "physicalAddress");
        // 子树索引不保证连续
        let decoded = decode(
            &descriptor,
            &base(),
            vec![
                entry("1", SnmpScalar::Integer(1)),
                entry("10101", SnmpScalar::Integer(2)),
            ],
        )
        .unwrap();
        let rows = decoded.table().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.get("1"), Some(&SnmpScalar::Integer(1)));
        assert_eq!(rows.get("10101"), Some(&SnmpScalar::Integer(2)));
    }

    #[test]
    fn hex_octets_renders_uppercase_pairs() {
        let descriptor = RequestDescriptor::walk_hex("1.3.6.1.2.1.2.2.1.6", "physicalAddress");
        let decoded = decode(
            &descriptor,
            &base(),
            vec![entry("1", SnmpScalar::Bytes(vec![0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e]))],
        )
        .unwrap();
        let rows = decoded.table().unwrap();
        assert_eq!(
            rows.get("1"),
            Some(&SnmpScalar::Text("00:1A:2B:3C:4D:5E".to_string()))
        );
    }

    #[test]
    fn hex_octets_length_property() {
        // 偶数长度的十六进制文本：输出长度恰为 2*字节数-1 加上分隔符
        let rendered = colon_hex_pairs("0a1b2c");
        assert_eq!(rendered, "0A:1B:2C");
        assert_eq!(rendered.len(), 2 * 3 + 2);

        // 奇数长度或非十六进制：原样返回
        assert_eq!(colon_hex_pairs("0a1b2"), "0a1b2");
        assert_eq!(colon_hex_pairs("not-hex"), "not-hex");
        assert_eq!(colon_hex_pairs(""), "");
    }

    #[test]
    fn dotted_sequence_joins_bytes() {
        let descriptor = RequestDescriptor::walk_dotted("1.3.6.1.2.1.4.21.1.1", "destination");
        let route_base: OidPath = descriptor.path.parse().unwrap();
        let oid: OidPath = "1.3.6.1.2.1.4.21.1.1.192.168.1.0".parse().unwrap();
        let decoded = decode(
            &descriptor,
            &route_base,
            vec![(oid, SnmpScalar::IpAddress([192, 168, 1, 0]))],
        )
        .unwrap();
        let rows = decoded.table().unwrap();
        assert_eq!(
            rows.get("192.168.1.0"),
            Some(&SnmpScalar::Text("192.168.1.0".to_string()))
        );
    }
}
