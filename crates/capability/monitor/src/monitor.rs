//! 设备监控器实现。

use crate::error::MonitorError;
use crate::status::DeviceStateStore;
use domain::{DeviceRecord, DeviceStatus, Liveness, NotificationLevel};
use nms_broadcast::Broadcaster;
use nms_snmp::{RequestDescriptor, SnmpClient};
use nms_storage::{DeviceField, DeviceRegistry, NewNotification, NotificationStore};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn};

const NAME_OID: &str = "1.3.6.1.2.1.1.5.0";
const LOCATION_OID: &str = "1.3.6.1.2.1.1.6.0";

/// 监控参数。
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// 心跳扫描间隔（毫秒）
    pub heartbeat_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { heartbeat_ms: 5000 }
    }
}

/// 设备监控器：状态缓存的唯一写入方。
pub struct DeviceMonitor {
    client: Arc<SnmpClient>,
    registry: Arc<dyn DeviceRegistry>,
    notifications: Arc<dyn NotificationStore>,
    broadcaster: Arc<Broadcaster>,
    store: Arc<DeviceStateStore>,
    heartbeat: Duration,
}

impl DeviceMonitor {
    pub fn new(
        client: Arc<SnmpClient>,
        registry: Arc<dyn DeviceRegistry>,
        notifications: Arc<dyn NotificationStore>,
        broadcaster: Arc<Broadcaster>,
        store: Arc<DeviceStateStore>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            client,
            registry,
            notifications,
            broadcaster,
            store,
            heartbeat: Duration::from_millis(config.heartbeat_ms),
        }
    }

    /// 状态缓存句柄（HTTP 侧协作方只读）。
    pub fn state(&self) -> Arc<DeviceStateStore> {
        Arc::clone(&self.store)
    }

    /// 全量初始化：装载注册表、并发探测、漂移校正、整体替换状态缓存。
    ///
    /// 注册表读取失败是致命的；单台设备的探测/采集/回写失败只记录日志。
    pub async fn initialize(&self) -> Result<(), MonitorError> {
        let records = self.registry.list_devices().await?;
        info!(count = records.len(), "initializing device monitor");

        let mut tasks = JoinSet::new();
        for record in records {
            let client = Arc::clone(&self.client);
            tasks.spawn(async move {
                nms_telemetry::record_probe();
                let online = client.probe(&record.ip).await;
                let identity = if online {
                    probe_identity(&client, &record.ip).await
                } else {
                    nms_telemetry::record_probe_failure();
                    None
                };
                (record, online, identity)
            });
        }

        let mut statuses = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            let Ok((record, online, identity)) = joined else {
                warn!("initialization probe task failed");
                continue;
            };
            let liveness = if online {
                Liveness::Online
            } else {
                Liveness::Offline
            };
            let mut status = DeviceStatus::from_record(&record, liveness);
            if let Some((name, location)) = identity {
                self.reconcile_drift(&record, DeviceField::Name, &record.name, &name)
                    .await;
                self.reconcile_drift(&record, DeviceField::Location, &record.location, &location)
                    .await;
                status.name = name;
                status.location = location;
            }
            statuses.insert(record.device_id.clone(), status);
        }
        self.store.replace_all(statuses);
        Ok(())
    }

    /// 单次心跳扫描：全量并发重探测，只有翻转才产生 I/O。
    pub async fn sweep(&self) {
        let snapshot = self.store.snapshot();
        let mut tasks = JoinSet::new();
        for (device_id, status) in snapshot {
            let client = Arc::clone(&self.client);
            tasks.spawn(async move {
                nms_telemetry::record_probe();
                let online = client.probe(&status.ip).await;
                if !online {
                    nms_telemetry::record_probe_failure();
                }
                (device_id, status, online)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let Ok((device_id, status, online)) = joined else {
                warn!("heartbeat probe task failed");
                continue;
            };
            let current = if online {
                Liveness::Online
            } else {
                Liveness::Offline
            };
            if current == status.liveness {
                continue;
            }
            self.store.set_liveness(&device_id, current);
            self.emit_transition(&device_id, &status, current).await;
        }
    }

    /// 初始化后按固定间隔持续扫描；只在初始化失败时返回。
    pub async fn run(&self) -> Result<(), MonitorError> {
        self.initialize().await?;
        let mut ticker = tokio::time::interval(self.heartbeat);
        // interval 的首个 tick 立即完成，初始化后无需再扫一遍
        ticker.tick().await;
        loop {
            ticker.tick().await;
            self.sweep().await;
        }
    }

    /// 手动编辑 name/location：先持久化，成功后才改内存。
    ///
    /// 不支持的字段是记录日志的空操作，返回 Ok(false)。
    pub async fn update_manually(
        &self,
        device_id: &str,
        field: &str,
        value: &str,
    ) -> Result<bool, MonitorError> {
        let Some(field) = DeviceField::parse(field) else {
            warn!(device_id = %device_id, field = %field, "unsupported manual edit field ignored");
            return Ok(false);
        };
        let updated = self.registry.update_field(device_id, field, value).await?;
        if updated {
            self.store.set_field(device_id, field, value);
        }
        Ok(updated)
    }

    /// 名称/位置漂移校正：广播新旧值并回写注册表。
    ///
    /// 回写失败只记录日志，内存保留设备实际上报的值。
    async fn reconcile_drift(
        &self,
        record: &DeviceRecord,
        field: DeviceField,
        registered: &str,
        reported: &str,
    ) {
        if registered == reported {
            return;
        }
        nms_telemetry::record_drift_reconciliation();
        info!(
            device_id = %record.device_id,
            field = field.column(),
            registered = %registered,
            reported = %reported,
            "device metadata drift detected"
        );
        let message = json!({
            "kind": "drift",
            "deviceId": record.device_id,
            "field": field.column(),
            "previous": registered,
            "current": reported,
        })
        .to_string();
        self.broadcaster.broadcast(&message).await;
        if let Err(err) = self
            .registry
            .update_field(&record.device_id, field, reported)
            .await
        {
            warn!(
                device_id = %record.device_id,
                field = field.column(),
                error = %err,
                "drift write-back failed, registry lags in-memory state"
            );
        }
    }

    /// 状态翻转：广播一条实时事件并落一条持久通知。
    async fn emit_transition(&self, device_id: &str, status: &DeviceStatus, current: Liveness) {
        info!(
            device_id = %device_id,
            name = %status.name,
            status = current.as_str(),
            "device liveness transition"
        );
        let message = json!({
            "kind": "liveness",
            "deviceId": device_id,
            "name": status.name,
            "status": current.as_str(),
        })
        .to_string();
        self.broadcaster.broadcast(&message).await;

        match current {
            Liveness::Online => nms_telemetry::record_transition_online(),
            Liveness::Offline => nms_telemetry::record_transition_offline(),
        }
        let (content, level) = match current {
            Liveness::Online => (
                format!("device {} is back online", status.name),
                NotificationLevel::Success,
            ),
            Liveness::Offline => (
                format!("device {} went offline", status.name),
                NotificationLevel::Error,
            ),
        };
        let event = NewNotification {
            content,
            level,
            device_id: Some(device_id.to_string()),
            location: Some(status.location.clone()),
        };
        match self.notifications.insert(event).await {
            Ok(_) => nms_telemetry::record_notification_written(),
            Err(err) => {
                warn!(device_id = %device_id, error = %err, "transition notification write failed");
            }
        }
    }
}

/// 采集设备自报的名称与位置；失败时返回 None，沿用注册表值。
async fn probe_identity(client: &SnmpClient, ip: &str) -> Option<(String, String)> {
    let descriptors = vec![
        RequestDescriptor::get(NAME_OID, "name"),
        RequestDescriptor::get(LOCATION_OID, "location"),
    ];
    match client.fetch(ip, descriptors).await {
        Ok(bundle) => {
            let name = bundle.get("name")?.scalar()?.as_text();
            let location = bundle.get("location")?.scalar()?.as_text();
            Some((name, location))
        }
        Err(err) => {
            warn!(ip = %ip, error = %err, "identity fetch failed, keeping registry values");
            None
        }
    }
}
