//! 存储接口 Trait 定义
//!
//! 定义两类资源的异步接口：
//! - DeviceRegistry：设备注册表（行读取 + 字段点更新 + 名称检索）
//! - NotificationStore：通知事件流（追加写 + 幂等已读标记 + 过滤查询 + 聚合）
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发
//! - `list` 与 `mark_read_where` 使用同一过滤谓词，语义保持一致

use crate::error::StorageError;
use crate::models::{
    DeviceField, LevelCounts, NewNotification, NotificationFilter, NotificationRecord,
};
use async_trait::async_trait;
use domain::DeviceRecord;
use std::collections::HashMap;

/// 设备注册表接口
///
/// 注册表的 CRUD 归外围协作方；本接口只覆盖监控与通知所需的读取、
/// name/location 点更新与名称检索。
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    /// 列出全部注册设备
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, StorageError>;

    /// 点更新单个字段，返回是否有行受影响
    async fn update_field(
        &self,
        device_id: &str,
        field: DeviceField,
        value: &str,
    ) -> Result<bool, StorageError>;

    /// 名称子串检索（不区分大小写），返回匹配的设备 id 集合
    async fn search_by_name(&self, fragment: &str) -> Result<Vec<String>, StorageError>;

    /// 设备 id → 名称映射（通知视图解析用）
    async fn device_names(&self) -> Result<HashMap<String, String>, StorageError>;
}

/// 通知事件流接口
///
/// 事件只追加；已读集合只增不减。
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// 追加一条事件，返回生成的事件 id（已读集合初始化为空）
    async fn insert(&self, event: NewNotification) -> Result<String, StorageError>;

    /// 幂等已读标记：仅当用户不在已读集合时加入，返回是否发生变更
    async fn mark_read(&self, event_id: &str, user_id: &str) -> Result<bool, StorageError>;

    /// 按过滤谓词批量标记已读（限定当前未读），返回触及的事件数
    async fn mark_read_where(
        &self,
        filter: &NotificationFilter,
        user_id: &str,
    ) -> Result<u64, StorageError>;

    /// 过滤 + 分页查询，时间降序，返回 (本页记录, 匹配总数)
    async fn list(
        &self,
        filter: &NotificationFilter,
        user_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<NotificationRecord>, u64), StorageError>;

    /// 按级别统计未读（无未读时返回全零计数）
    async fn unread_by_level(&self, user_id: &str) -> Result<LevelCounts, StorageError>;

    /// 按位置统计未读（位置为空的事件不参与分组）
    async fn unread_by_location(
        &self,
        user_id: &str,
    ) -> Result<HashMap<String, LevelCounts>, StorageError>;
}
