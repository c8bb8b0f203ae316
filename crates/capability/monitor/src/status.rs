//! 设备状态缓存。

use domain::{DeviceStatus, Liveness};
use nms_storage::DeviceField;
use std::collections::HashMap;
use std::sync::RwLock;

/// 设备状态缓存
///
/// 写入方约定：只有 `DeviceMonitor` 调用变更方法（初始化整体替换、
/// 心跳翻转、手动编辑），HTTP 侧协作方只通过 `snapshot` / `get` 读取。
/// 读取返回克隆，调用方拿到的是一致快照，不持有锁。
pub struct DeviceStateStore {
    statuses: RwLock<HashMap<String, DeviceStatus>>,
}

impl DeviceStateStore {
    pub fn new() -> Self {
        Self {
            statuses: RwLock::new(HashMap::new()),
        }
    }

    /// 当前全量快照（按设备 id 索引）。
    pub fn snapshot(&self) -> HashMap<String, DeviceStatus> {
        self.statuses
            .read()
            .map(|map| map.clone())
            .unwrap_or_default()
    }

    /// 单台设备状态；不存在即未纳管。
    pub fn get(&self, device_id: &str) -> Option<DeviceStatus> {
        self.statuses
            .read()
            .ok()
            .and_then(|map| map.get(device_id).cloned())
    }

    /// 初始化/重初始化时整体替换。
    pub fn replace_all(&self, statuses: HashMap<String, DeviceStatus>) {
        if let Ok(mut map) = self.statuses.write() {
            *map = statuses;
        }
    }

    /// 更新在线状态，返回是否存在该设备。
    pub fn set_liveness(&self, device_id: &str, liveness: Liveness) -> bool {
        match self.statuses.write() {
            Ok(mut map) => match map.get_mut(device_id) {
                Some(status) => {
                    status.liveness = liveness;
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    /// 更新 name/location 字段，返回是否存在该设备。
    pub fn set_field(&self, device_id: &str, field: DeviceField, value: &str) -> bool {
        match self.statuses.write() {
            Ok(mut map) => match map.get_mut(device_id) {
                Some(status) => {
                    match field {
                        DeviceField::Name => status.name = value.to_string(),
                        DeviceField::Location => status.location = value.to_string(),
                    }
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }
}

impl Default for DeviceStateStore {
    fn default() -> Self {
        Self::new()
    }
}
