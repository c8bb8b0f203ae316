//! 通知查询服务实现。

use domain::NotificationLevel;
use nms_storage::{
    DeviceRegistry, LevelCounts, NewNotification, NotificationFilter, NotificationStore, ReadState,
    StorageError,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 通知服务错误
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// 调用方视角的查询条件（设备按名称子串给出）。
#[derive(Debug, Clone, Default)]
pub struct NotificationQuery {
    pub content: Option<String>,
    pub device_name: Option<String>,
    pub level: Option<NotificationLevel>,
    pub read_state: ReadState,
    pub location: Option<String>,
    pub from_ts_ms: Option<i64>,
    pub to_ts_ms: Option<i64>,
}

/// 对外的通知视图：派生 is_read，设备 id 解析为名称。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: String,
    pub content: String,
    pub level: NotificationLevel,
    pub device_name: Option<String>,
    pub location: Option<String>,
    pub ts_ms: i64,
    pub is_read: bool,
}

/// 通知查询服务
pub struct NotificationService {
    registry: Arc<dyn DeviceRegistry>,
    store: Arc<dyn NotificationStore>,
}

impl NotificationService {
    pub fn new(registry: Arc<dyn DeviceRegistry>, store: Arc<dyn NotificationStore>) -> Self {
        Self { registry, store }
    }

    /// 追加一条事件。
    pub async fn record(&self, event: NewNotification) -> Result<String, NotifyError> {
        Ok(self.store.insert(event).await?)
    }

    /// 过滤 + 分页查询；返回 (视图列表, 匹配总数)。
    pub async fn list(
        &self,
        query: &NotificationQuery,
        user_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<NotificationView>, u64), NotifyError> {
        let Some(filter) = self.resolve_filter(query).await? else {
            // 设备名没有任何匹配：结果为空，不查存储
            return Ok((Vec::new(), 0));
        };
        let (records, total) = self.store.list(&filter, user_id, offset, limit).await?;
        let names = self.registry.device_names().await?;
        let views = records
            .into_iter()
            .map(|record| NotificationView {
                is_read: record.is_read_by(user_id),
                device_name: record
                    .device_id
                    .as_ref()
                    .and_then(|id| names.get(id).cloned()),
                id: record.id,
                content: record.content,
                level: record.level,
                location: record.location,
                ts_ms: record.ts_ms,
            })
            .collect();
        Ok((views, total))
    }

    /// 单条已读标记；返回是否发生变更。
    pub async fn mark_read(&self, event_id: &str, user_id: &str) -> Result<bool, NotifyError> {
        Ok(self.store.mark_read(event_id, user_id).await?)
    }

    /// 按条件批量标记已读；返回触及的事件数。
    pub async fn mark_read_where(
        &self,
        query: &NotificationQuery,
        user_id: &str,
    ) -> Result<u64, NotifyError> {
        let Some(filter) = self.resolve_filter(query).await? else {
            return Ok(0);
        };
        Ok(self.store.mark_read_where(&filter, user_id).await?)
    }

    pub async fn unread_by_level(&self, user_id: &str) -> Result<LevelCounts, NotifyError> {
        Ok(self.store.unread_by_level(user_id).await?)
    }

    pub async fn unread_by_location(
        &self,
        user_id: &str,
    ) -> Result<HashMap<String, LevelCounts>, NotifyError> {
        Ok(self.store.unread_by_location(user_id).await?)
    }

    /// 把设备名子串解析为 id 集合；零匹配返回 None 表示空结果。
    async fn resolve_filter(
        &self,
        query: &NotificationQuery,
    ) -> Result<Option<NotificationFilter>, NotifyError> {
        let device_ids = match query.device_name {
            Some(ref fragment) => {
                let ids = self.registry.search_by_name(fragment).await?;
                if ids.is_empty() {
                    debug!(fragment = %fragment, "device name matched nothing");
                    return Ok(None);
                }
                Some(ids)
            }
            None => None,
        };
        Ok(Some(NotificationFilter {
            content: query.content.clone(),
            device_ids,
            level: query.level,
            read_state: query.read_state,
            location: query.location.clone(),
            from_ts_ms: query.from_ts_ms,
            to_ts_ms: query.to_ts_ms,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::DeviceRecord;
    use nms_storage::{InMemoryDeviceRegistry, InMemoryNotificationStore};

    fn device(id: &str, name: &str) -> DeviceRecord {
        DeviceRecord {
            device_id: id.to_string(),
            name: name.to_string(),
            ip: "10.0.0.1".to_string(),
            model: "S5700".to_string(),
            location: "HQ".to_string(),
            device_type: "switch".to_string(),
        }
    }

    fn service_with(devices: Vec<DeviceRecord>) -> NotificationService {
        NotificationService::new(
            Arc::new(InMemoryDeviceRegistry::seeded(devices)),
            Arc::new(InMemoryNotificationStore::new()),
        )
    }

    #[tokio::test]
    async fn views_resolve_device_name_and_read_flag() {
        let service = service_with(vec![device("dev-1", "core-sw1")]);
        let id = service
            .record(NewNotification {
                content: "core-sw1 offline".to_string(),
                level: NotificationLevel::Error,
                device_id: Some("dev-1".to_string()),
                location: Some("HQ".to_string()),
            })
            .await
            .unwrap();
        service.mark_read(&id, "user-1").await.unwrap();

        let (views, total) = service
            .list(&NotificationQuery::default(), "user-1", 0, 10)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(views[0].device_name.as_deref(), Some("core-sw1"));
        assert!(views[0].is_read);

        let (views, _) = service
            .list(&NotificationQuery::default(), "user-2", 0, 10)
            .await
            .unwrap();
        assert!(!views[0].is_read);
    }

    #[tokio::test]
    async fn unmatched_device_name_yields_empty_result() {
        let service = service_with(vec![device("dev-1", "core-sw1")]);
        service
            .record(NewNotification {
                content: "alarm".to_string(),
                level: NotificationLevel::Warning,
                device_id: Some("dev-1".to_string()),
                location: None,
            })
            .await
            .unwrap();

        let query = NotificationQuery {
            device_name: Some("no-such-device".to_string()),
            ..Default::default()
        };
        let (views, total) = service.list(&query, "user-1", 0, 10).await.unwrap();
        assert!(views.is_empty());
        assert_eq!(total, 0);
        assert_eq!(service.mark_read_where(&query, "user-1").await.unwrap(), 0);

        // 名称子串命中时正常过滤
        let query = NotificationQuery {
            device_name: Some("core".to_string()),
            ..Default::default()
        };
        let (_, total) = service.list(&query, "user-1", 0, 10).await.unwrap();
        assert_eq!(total, 1);
    }
}
