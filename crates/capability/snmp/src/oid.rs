//! OID 路径解析与格式化。
//!
//! 点分十进制字符串编译为数值路径；任一段不是非负整数即报错。

use crate::error::SnmpError;
use std::fmt;
use std::str::FromStr;

/// 数值 OID 路径。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OidPath(Vec<u64>);

impl OidPath {
    /// 从数值分量构造路径。
    pub fn new(components: Vec<u64>) -> Self {
        Self(components)
    }

    pub fn components(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 本路径是否以 base 为前缀。
    pub fn starts_with(&self, base: &OidPath) -> bool {
        self.0.len() >= base.0.len() && self.0[..base.0.len()] == base.0[..]
    }

    /// 去掉与请求基路径等长的前缀后的表行索引。
    ///
    /// 子树索引不保证连续，因此索引以字符串形式保留。
    pub fn index_after(&self, base: &OidPath) -> Option<String> {
        if self.0.len() <= base.0.len() {
            return None;
        }
        let suffix: Vec<String> = self.0[base.0.len()..]
            .iter()
            .map(|part| part.to_string())
            .collect();
        Some(suffix.join("."))
    }
}

impl FromStr for OidPath {
    type Err = SnmpError;

    /// 编译点分十进制 OID 字符串（允许前导点）。
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim().trim_start_matches('.');
        if trimmed.is_empty() {
            return Err(SnmpError::MalformedOid(input.to_string()));
        }
        let mut components = Vec::new();
        for segment in trimmed.split('.') {
            let part = segment
                .parse::<u64>()
                .map_err(|_| SnmpError::MalformedOid(input.to_string()))?;
            components.push(part);
        }
        Ok(Self(components))
    }
}

impl fmt::Display for OidPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|part| part.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_round_trips() {
        for input in ["1.3.6.1.2.1.1.5.0", "0.0", "1.3.6.1.2.1.47.1.1.1.1.13"] {
            let path: OidPath = input.parse().unwrap();
            assert_eq!(path.to_string(), input);
        }
    }

    #[test]
    fn compile_accepts_leading_dot() {
        let path: OidPath = ".1.3.6.1.2.1.1.3.0".parse().unwrap();
        assert_eq!(path.components(), &[1, 3, 6, 1, 2, 1, 1, 3, 0]);
    }

    #[test]
    fn compile_rejects_bad_segments() {
        for input in ["", "1.3.abc.4", "1..3", "1.3.-2", "oid"] {
            assert!(matches!(
                input.parse::<OidPath>(),
                Err(SnmpError::MalformedOid(_))
            ));
        }
    }

    #[test]
    fn index_after_strips_base() {
        let base: OidPath = "1.3.6.1.2.1.2.2.1.2".parse().unwrap();
        let full: OidPath = "1.3.6.1.2.1.2.2.1.2.10101".parse().unwrap();
        assert_eq!(full.index_after(&base).as_deref(), Some("10101"));

        let multi: OidPath = "1.3.6.1.2.1.4.21.1.1.192.168.1.0".parse().unwrap();
        let route_base: OidPath = "1.3.6.1.2.1.4.21.1.1".parse().unwrap();
        assert_eq!(
            multi.index_after(&route_base).as_deref(),
            Some("192.168.1.0")
        );

        // 长度不超过 base 时没有索引
        assert_eq!(base.index_after(&base), None);
    }
}
