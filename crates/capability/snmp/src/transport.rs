//! SNMP 传输层封装。
//!
//! `SnmpTransport` 负责按设备地址建立会话，`SnmpSession` 封装单会话的
//! get / walk / set 三种原语。生产实现基于 `snmp2` 的 v2c 异步会话；
//! 测试通过 mock 实现替换整个传输层。
//!
//! 会话内部以 `tokio::sync::Mutex` 串行化底层 PDU 交互：同一批量请求的
//! 多个子请求共享一个会话，彼此在 wire 层面排队。

use crate::codec::SnmpScalar;
use crate::error::SnmpError;
use crate::oid::OidPath;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// SNMP 采集参数（团体名、端口、单次操作超时）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnmpConfig {
    pub community: String,
    pub port: u16,
    pub timeout_ms: u64,
}

impl Default for SnmpConfig {
    fn default() -> Self {
        Self {
            community: "NetManageSys".to_string(),
            port: 161,
            timeout_ms: 3000,
        }
    }
}

/// set 操作的值（类型标签由调用方声明）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetValue {
    /// OctetString（类型 4）
    Text(String),
    /// Integer（类型 2）
    Integer(i64),
}

/// 单设备会话：三种原语。
#[async_trait]
pub trait SnmpSession: Send + Sync {
    /// 单值 get。
    async fn get(&self, oid: &OidPath) -> Result<Vec<(OidPath, SnmpScalar)>, SnmpError>;

    /// 子树遍历：从 base 反复 getnext，直到离开子树。
    async fn walk(&self, base: &OidPath) -> Result<Vec<(OidPath, SnmpScalar)>, SnmpError>;

    /// 单值 set。
    async fn set(&self, oid: &OidPath, value: SetValue) -> Result<(), SnmpError>;
}

/// 会话工厂：按目标地址建立会话。
#[async_trait]
pub trait SnmpTransport: Send + Sync {
    async fn open(&self, ip: &str) -> Result<Arc<dyn SnmpSession>, SnmpError>;
}

/// 基于 `snmp2` 的 v2c 生产传输。
pub struct Snmp2cTransport {
    config: SnmpConfig,
}

impl Snmp2cTransport {
    pub fn new(config: SnmpConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SnmpTransport for Snmp2cTransport {
    async fn open(&self, ip: &str) -> Result<Arc<dyn SnmpSession>, SnmpError> {
        let target = format!("{}:{}", ip, self.config.port);
        let session = snmp2::AsyncSession::new_v2c(&target, self.config.community.as_bytes(), 0)
            .await
            .map_err(|err| SnmpError::Transport(format!("open {}: {}", target, err)))?;
        Ok(Arc::new(Snmp2cSession {
            inner: Mutex::new(session),
            timeout: Duration::from_millis(self.config.timeout_ms),
            target,
        }))
    }
}

struct Snmp2cSession {
    inner: Mutex<snmp2::AsyncSession>,
    timeout: Duration,
    target: String,
}

/// 数值路径转为 snmp2 的 wire 形式。
fn to_snmp2_oid(path: &OidPath) -> Result<snmp2::Oid<'static>, SnmpError> {
    snmp2::Oid::from(path.components()).map_err(|_| SnmpError::MalformedOid(path.to_string()))
}

impl Snmp2cSession {
    fn transport_err(&self, op: &str, err: impl std::fmt::Display) -> SnmpError {
        SnmpError::Transport(format!("{} {}: {}", op, self.target, err))
    }

    fn timeout_err(&self, op: &str) -> SnmpError {
        SnmpError::Transport(format!("{} {}: operation timed out", op, self.target))
    }
}

#[async_trait]
impl SnmpSession for Snmp2cSession {
    async fn get(&self, oid: &OidPath) -> Result<Vec<(OidPath, SnmpScalar)>, SnmpError> {
        let request = to_snmp2_oid(oid)?;
        let mut session = self.inner.lock().await;
        let response = tokio::time::timeout(self.timeout, session.get(&request))
            .await
            .map_err(|_| self.timeout_err("get"))?
            .map_err(|err| self.transport_err("get", err))?;

        let mut entries = Vec::new();
        for (name, value) in response.varbinds {
            let path: OidPath = name.to_string().parse()?;
            if let Some(scalar) = scalar_from_value(&value) {
                entries.push((path, scalar));
            }
        }
        Ok(entries)
    }

    async fn walk(&self, base: &OidPath) -> Result<Vec<(OidPath, SnmpScalar)>, SnmpError> {
        let mut entries = Vec::new();
        let mut cursor = base.clone();
        let mut session = self.inner.lock().await;
        loop {
            let request = to_snmp2_oid(&cursor)?;
            let response = tokio::time::timeout(self.timeout, session.getnext(&request))
                .await
                .map_err(|_| self.timeout_err("walk"))?
                .map_err(|err| self.transport_err("walk", err))?;

            let mut advanced = false;
            for (name, value) in response.varbinds {
                let path: OidPath = name.to_string().parse()?;
                // 离开子树或视图结束即停止
                if !path.starts_with(base) || matches!(value, snmp2::Value::EndOfMibView) {
                    return Ok(entries);
                }
                // getnext 不再前进说明设备应答异常，避免死循环
                if path == cursor {
                    return Ok(entries);
                }
                cursor = path.clone();
                advanced = true;
                if let Some(scalar) = scalar_from_value(&value) {
                    entries.push((path, scalar));
                }
            }
            if !advanced {
                return Ok(entries);
            }
        }
    }

    async fn set(&self, oid: &OidPath, value: SetValue) -> Result<(), SnmpError> {
        let request = to_snmp2_oid(oid)?;
        let mut session = self.inner.lock().await;
        let result = match value {
            SetValue::Text(text) => {
                let bytes = text.into_bytes();
                tokio::time::timeout(
                    self.timeout,
                    session.set(&[(&request, snmp2::Value::OctetString(&bytes))]),
                )
                .await
            }
            SetValue::Integer(number) => {
                tokio::time::timeout(
                    self.timeout,
                    session.set(&[(&request, snmp2::Value::Integer(number))]),
                )
                .await
            }
        };
        result
            .map_err(|_| self.timeout_err("set"))?
            .map_err(|err| self.transport_err("set", err))?;
        Ok(())
    }
}

/// snmp2 值映射为标量；异常标记（NoSuchObject 等）视为无值。
fn scalar_from_value(value: &snmp2::Value<'_>) -> Option<SnmpScalar> {
    match value {
        snmp2::Value::Integer(number) => Some(SnmpScalar::Integer(*number)),
        snmp2::Value::OctetString(bytes) => Some(SnmpScalar::Bytes(bytes.to_vec())),
        snmp2::Value::IpAddress(octets) => Some(SnmpScalar::IpAddress(*octets)),
        snmp2::Value::Counter32(number) => Some(SnmpScalar::Unsigned(u64::from(*number))),
        snmp2::Value::Unsigned32(number) => Some(SnmpScalar::Unsigned(u64::from(*number))),
        snmp2::Value::Counter64(number) => Some(SnmpScalar::Unsigned(*number)),
        snmp2::Value::Timeticks(ticks) => Some(SnmpScalar::TimeTicks(*ticks)),
        snmp2::Value::ObjectIdentifier(oid) => Some(SnmpScalar::ObjectId(oid.to_string())),
        snmp2::Value::Null => Some(SnmpScalar::Null),
        snmp2::Value::NoSuchObject
        | snmp2::Value::NoSuchInstance
        | snmp2::Value::EndOfMibView => None,
        _ => None,
    }
}
