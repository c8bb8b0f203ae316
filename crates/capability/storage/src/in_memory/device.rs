//! 设备注册表内存实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 设备行读取
//! - name/location 点更新
//! - 名称子串检索

use crate::error::StorageError;
use crate::models::DeviceField;
use crate::traits::DeviceRegistry;
use domain::DeviceRecord;
use std::collections::HashMap;
use std::sync::RwLock;

/// 设备注册表内存实现
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemoryDeviceRegistry {
    devices: RwLock<HashMap<String, DeviceRecord>>,
}

impl InMemoryDeviceRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
        }
    }

    /// 以给定设备行初始化注册表
    pub fn seeded(records: Vec<DeviceRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.device_id.clone(), record))
            .collect();
        Self {
            devices: RwLock::new(map),
        }
    }
}

impl Default for InMemoryDeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DeviceRegistry for InMemoryDeviceRegistry {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, StorageError> {
        let items = self
            .devices
            .read()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        Ok(items)
    }

    async fn update_field(
        &self,
        device_id: &str,
        field: DeviceField,
        value: &str,
    ) -> Result<bool, StorageError> {
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let Some(device) = map.get_mut(device_id) else {
            return Ok(false);
        };
        match field {
            DeviceField::Name => device.name = value.to_string(),
            DeviceField::Location => device.location = value.to_string(),
        }
        Ok(true)
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<String>, StorageError> {
        let needle = fragment.to_lowercase();
        let ids = self
            .devices
            .read()
            .map(|map| {
                map.values()
                    .filter(|item| item.name.to_lowercase().contains(&needle))
                    .map(|item| item.device_id.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids)
    }

    async fn device_names(&self) -> Result<HashMap<String, String>, StorageError> {
        let names = self
            .devices
            .read()
            .map(|map| {
                map.values()
                    .map(|item| (item.device_id.clone(), item.name.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(names)
    }
}
