//! 存储层数据模型
//!
//! 定义通知流相关的数据结构：
//! - NewNotification：待插入的通知事件
//! - NotificationRecord：持久化的通知事件（含已读集合）
//! - NotificationFilter / ReadState：列表与批量标记共用的过滤谓词
//! - LevelCounts：按级别的未读计数视图
//! - DeviceField：注册表允许点更新的字段

use domain::NotificationLevel;
use serde::{Deserialize, Serialize};

/// 待插入的通知事件（id、时间与空已读集合由存储层补齐）。
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub content: String,
    pub level: NotificationLevel,
    pub device_id: Option<String>,
    pub location: Option<String>,
}

/// 持久化的通知事件。
///
/// 已读集合只增不减，同一用户 id 至多出现一次。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: String,
    pub content: String,
    pub level: NotificationLevel,
    pub device_id: Option<String>,
    pub location: Option<String>,
    pub ts_ms: i64,
    pub read_by: Vec<String>,
}

impl NotificationRecord {
    pub fn is_read_by(&self, user_id: &str) -> bool {
        self.read_by.iter().any(|reader| reader == user_id)
    }
}

/// 相对某个用户的已读状态过滤。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadState {
    #[default]
    All,
    Read,
    Unread,
}

/// 通知查询过滤器；`list` 与 `mark_read_where` 共用同一语义。
///
/// 所有条件以 AND 组合；`device_ids = Some(空集)` 表示无匹配而非无过滤。
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    /// 内容子串（不区分大小写）
    pub content: Option<String>,
    /// 关联设备 id 集合
    pub device_ids: Option<Vec<String>>,
    pub level: Option<NotificationLevel>,
    pub read_state: ReadState,
    /// 位置等值匹配
    pub location: Option<String>,
    /// 时间范围（毫秒，闭区间）
    pub from_ts_ms: Option<i64>,
    pub to_ts_ms: Option<i64>,
}

/// 按级别的未读计数。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    pub error: u64,
    pub warning: u64,
    pub success: u64,
    pub normal: u64,
    pub total: u64,
}

impl LevelCounts {
    pub fn bump(&mut self, level: NotificationLevel, count: u64) {
        match level {
            NotificationLevel::Error => self.error += count,
            NotificationLevel::Warning => self.warning += count,
            NotificationLevel::Success => self.success += count,
            NotificationLevel::Normal => self.normal += count,
        }
        self.total += count;
    }
}

/// 注册表允许点更新的字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceField {
    Name,
    Location,
}

impl DeviceField {
    /// 对应的列名（静态字符串，SQL 拼接安全）。
    pub fn column(&self) -> &'static str {
        match self {
            DeviceField::Name => "name",
            DeviceField::Location => "location",
        }
    }

    /// 从调用方传入的字段名解析；不认识的字段返回 None。
    pub fn parse(field: &str) -> Option<Self> {
        match field {
            "name" => Some(DeviceField::Name),
            "location" => Some(DeviceField::Location),
            _ => None,
        }
    }
}
