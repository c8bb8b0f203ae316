use serde::{Deserialize, Serialize};

/// 设备注册表记录（来自 devices 表）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub device_id: String,
    pub name: String,
    pub ip: String,
    pub model: String,
    pub location: String,
    pub device_type: String,
}

/// 设备在线状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Liveness {
    Online,
    Offline,
}

impl Liveness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Liveness::Online => "online",
            Liveness::Offline => "offline",
        }
    }
}

/// 设备当前状态（状态缓存中的一条记录）。
///
/// 初始化时整体写入，心跳检测只改 liveness，手动编辑只改 name/location。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    pub device_id: String,
    pub name: String,
    pub ip: String,
    pub model: String,
    pub location: String,
    pub device_type: String,
    pub liveness: Liveness,
}

impl DeviceStatus {
    /// 从注册表记录构造状态条目。
    pub fn from_record(record: &DeviceRecord, liveness: Liveness) -> Self {
        Self {
            device_id: record.device_id.clone(),
            name: record.name.clone(),
            ip: record.ip.clone(),
            model: record.model.clone(),
            location: record.location.clone(),
            device_type: record.device_type.clone(),
            liveness,
        }
    }
}

/// 通知等级（固定四类）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Error,
    Warning,
    Success,
    Normal,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Error => "error",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Success => "success",
            NotificationLevel::Normal => "normal",
        }
    }

    /// 从存储的字符串还原等级；未知字符串按 normal 处理。
    pub fn parse(value: &str) -> Self {
        match value {
            "error" => NotificationLevel::Error,
            "warning" => NotificationLevel::Warning,
            "success" => NotificationLevel::Success,
            _ => NotificationLevel::Normal,
        }
    }
}
