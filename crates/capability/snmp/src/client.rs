//! 批量请求执行器。
//!
//! 同一设备的一组描述符共享一个会话并发执行：
//! - 读批量 fail-fast：任一 key 失败立即取消其余子请求并整体报错
//! - 写批量逐键收集：个别 key 失败不影响其余写入，结果按 key 返回
//!
//! 在线探测复用 get 原语：能取回 sysUpTime 即在线。

use crate::codec::{decode, DecodedValue, RequestDescriptor};
use crate::error::SnmpError;
use crate::oid::OidPath;
use crate::transport::{SetValue, SnmpSession, SnmpTransport};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// 在线探测使用的 OID（sysUpTime）。
const PROBE_OID: &str = "1.3.6.1.2.1.1.3.0";

/// 一条写请求描述符。
#[derive(Debug, Clone)]
pub struct WriteDescriptor {
    pub path: String,
    pub key: String,
    pub value: SetValue,
}

impl WriteDescriptor {
    pub fn text(path: &str, key: &str, value: &str) -> Self {
        Self {
            path: path.to_string(),
            key: key.to_string(),
            value: SetValue::Text(value.to_string()),
        }
    }
}

/// 单个写请求的结果。
#[derive(Debug)]
pub enum WriteOutcome {
    Ok,
    Failed(String),
}

impl WriteOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, WriteOutcome::Ok)
    }
}

/// SNMP 客户端：面向描述符的批量读写与在线探测。
pub struct SnmpClient {
    transport: Arc<dyn SnmpTransport>,
}

impl SnmpClient {
    pub fn new(transport: Arc<dyn SnmpTransport>) -> Self {
        Self { transport }
    }

    /// 批量读：全部成功才返回，任一 key 失败即整体失败。
    pub async fn fetch(
        &self,
        ip: &str,
        descriptors: Vec<RequestDescriptor>,
    ) -> Result<HashMap<String, DecodedValue>, SnmpError> {
        let session = self.transport.open(ip).await?;
        let mut tasks = JoinSet::new();
        for descriptor in descriptors {
            let session = Arc::clone(&session);
            tasks.spawn(async move {
                let key = descriptor.key.clone();
                let oid = descriptor.path.clone();
                let result = fetch_one(session, &descriptor).await;
                (key, oid, result)
            });
        }

        let mut results = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (key, oid, result) = joined
                .map_err(|err| SnmpError::Transport(format!("request task failed: {}", err)))?;
            match result {
                Ok(value) => {
                    results.insert(key, value);
                }
                Err(err) => {
                    tasks.abort_all();
                    return Err(SnmpError::Key {
                        key,
                        oid,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(results)
    }

    /// 批量写：逐键收集结果，不因个别失败而放弃其余写入。
    pub async fn write_batch(
        &self,
        ip: &str,
        writes: Vec<WriteDescriptor>,
    ) -> Result<HashMap<String, WriteOutcome>, SnmpError> {
        let session = self.transport.open(ip).await?;
        let mut tasks = JoinSet::new();
        for write in writes {
            let session = Arc::clone(&session);
            tasks.spawn(async move {
                let key = write.key.clone();
                let result = write_one(session, &write).await;
                (key, result)
            });
        }

        let mut outcomes = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (key, result) = joined
                .map_err(|err| SnmpError::Transport(format!("write task failed: {}", err)))?;
            let outcome = match result {
                Ok(()) => WriteOutcome::Ok,
                Err(err) => {
                    warn!(key = %key, error = %err, "snmp write failed");
                    WriteOutcome::Failed(err.to_string())
                }
            };
            outcomes.insert(key, outcome);
        }
        Ok(outcomes)
    }

    /// 单键写。
    pub async fn write_single(&self, ip: &str, write: WriteDescriptor) -> Result<(), SnmpError> {
        let session = self.transport.open(ip).await?;
        write_one(session, &write).await
    }

    /// 在线探测：取回 sysUpTime 即在线，任何失败均视为离线。
    pub async fn probe(&self, ip: &str) -> bool {
        let descriptor = RequestDescriptor::get(PROBE_OID, "sysUpTime");
        let session = match self.transport.open(ip).await {
            Ok(session) => session,
            Err(err) => {
                debug!(ip = %ip, error = %err, "probe session open failed");
                return false;
            }
        };
        match fetch_one(session, &descriptor).await {
            Ok(_) => true,
            Err(err) => {
                debug!(ip = %ip, error = %err, "probe failed");
                false
            }
        }
    }
}

async fn fetch_one(
    session: Arc<dyn SnmpSession>,
    descriptor: &RequestDescriptor,
) -> Result<DecodedValue, SnmpError> {
    let base: OidPath = descriptor.path.parse()?;
    let entries = match descriptor.mode {
        crate::codec::FetchMode::SingleGet => session.get(&base).await?,
        crate::codec::FetchMode::SubtreeWalk => session.walk(&base).await?,
    };
    decode(descriptor, &base, entries)
}

async fn write_one(session: Arc<dyn SnmpSession>, write: &WriteDescriptor) -> Result<(), SnmpError> {
    let oid: OidPath = write.path.parse()?;
    session.set(&oid, write.value.clone()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::SnmpScalar;
    use async_trait::async_trait;
    use std::collections::HashMap as StdHashMap;
    use std::sync::Mutex;

    /// 以预置应答表驱动的 mock 会话。
    struct MockSession {
        replies: StdHashMap<String, Vec<(OidPath, SnmpScalar)>>,
        failing: Vec<String>,
        sets: Mutex<Vec<(String, SetValue)>>,
        failing_sets: Vec<String>,
    }

    #[async_trait]
    impl SnmpSession for MockSession {
        async fn get(&self, oid: &OidPath) -> Result<Vec<(OidPath, SnmpScalar)>, SnmpError> {
            let key = oid.to_string();
            if self.failing.contains(&key) {
                return Err(SnmpError::Transport("request timed out".to_string()));
            }
            Ok(self.replies.get(&key).cloned().unwrap_or_default())
        }

        async fn walk(&self, base: &OidPath) -> Result<Vec<(OidPath, SnmpScalar)>, SnmpError> {
            self.get(base).await
        }

        async fn set(&self, oid: &OidPath, value: SetValue) -> Result<(), SnmpError> {
            let key = oid.to_string();
            if self.failing_sets.contains(&key) {
                return Err(SnmpError::Transport("set rejected".to_string()));
            }
            self.sets.lock().unwrap().push((key, value));
            Ok(())
        }
    }

    struct MockTransport {
        session: Arc<MockSession>,
    }

    #[async_trait]
    impl SnmpTransport for MockTransport {
        async fn open(&self, _ip: &str) -> Result<Arc<dyn SnmpSession>, SnmpError> {
            Ok(Arc::clone(&self.session) as Arc<dyn SnmpSession>)
        }
    }

    fn client_with(session: MockSession) -> SnmpClient {
        SnmpClient::new(Arc::new(MockTransport {
            session: Arc::new(session),
        }))
    }

    fn scalar_reply(oid: &str, scalar: SnmpScalar) -> (String, Vec<(OidPath, SnmpScalar)>) {
        let path: OidPath = oid.parse().unwrap();
        (oid.to_string(), vec![(path, scalar)])
    }

    #[tokio::test]
    async fn fetch_collects_all_keys() {
        let client = client_with(MockSession {
            replies: StdHashMap::from([
                scalar_reply("1.3.6.1.2.1.1.5.0", SnmpScalar::Bytes(b"core-sw1".to_vec())),
                scalar_reply("1.3.6.1.2.1.1.6.0", SnmpScalar::Bytes(b"rack-3".to_vec())),
            ]),
            failing: Vec::new(),
            sets: Mutex::new(Vec::new()),
            failing_sets: Vec::new(),
        });
        let results = client
            .fetch(
                "10.0.0.1",
                vec![
                    RequestDescriptor::get("1.3.6.1.2.1.1.5.0", "name"),
                    RequestDescriptor::get("1.3.6.1.2.1.1.6.0", "location"),
                ],
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(
            results.get("name").and_then(|value| value.scalar()),
            Some(&SnmpScalar::Text("core-sw1".to_string()))
        );
    }

    #[tokio::test]
    async fn fetch_fails_fast_on_any_key() {
        let client = client_with(MockSession {
            replies: StdHashMap::from([scalar_reply(
                "1.3.6.1.2.1.1.5.0",
                SnmpScalar::Bytes(b"core-sw1".to_vec()),
            )]),
            failing: vec!["1.3.6.1.2.1.1.6.0".to_string()],
            sets: Mutex::new(Vec::new()),
            failing_sets: Vec::new(),
        });
        let err = client
            .fetch(
                "10.0.0.1",
                vec![
                    RequestDescriptor::get("1.3.6.1.2.1.1.5.0", "name"),
                    RequestDescriptor::get("1.3.6.1.2.1.1.6.0", "location"),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SnmpError::Key { ref key, .. } if key == "location"));
    }

    #[tokio::test]
    async fn write_batch_collects_per_key_outcomes() {
        let client = client_with(MockSession {
            replies: StdHashMap::new(),
            failing: Vec::new(),
            sets: Mutex::new(Vec::new()),
            failing_sets: vec!["1.3.6.1.2.1.1.4.0".to_string()],
        });
        let outcomes = client
            .write_batch(
                "10.0.0.1",
                vec![
                    WriteDescriptor::text("1.3.6.1.2.1.1.5.0", "name", "edge-sw2"),
                    WriteDescriptor::text("1.3.6.1.2.1.1.4.0", "contact", "noc"),
                ],
            )
            .await
            .unwrap();
        assert!(outcomes.get("name").unwrap().is_ok());
        assert!(!outcomes.get("contact").unwrap().is_ok());
    }

    #[tokio::test]
    async fn probe_reports_liveness() {
        let online = client_with(MockSession {
            replies: StdHashMap::from([scalar_reply(
                "1.3.6.1.2.1.1.3.0",
                SnmpScalar::TimeTicks(123456),
            )]),
            failing: Vec::new(),
            sets: Mutex::new(Vec::new()),
            failing_sets: Vec::new(),
        });
        assert!(online.probe("10.0.0.1").await);

        // 无应答（空结果）同样判离线
        let silent = client_with(MockSession {
            replies: StdHashMap::new(),
            failing: Vec::new(),
            sets: Mutex::new(Vec::new()),
            failing_sets: Vec::new(),
        });
        assert!(!silent.probe("10.0.0.2").await);

        let unreachable = client_with(MockSession {
            replies: StdHashMap::new(),
            failing: vec!["1.3.6.1.2.1.1.3.0".to_string()],
            sets: Mutex::new(Vec::new()),
            failing_sets: Vec::new(),
        });
        assert!(!unreachable.probe("10.0.0.3").await);
    }
}
