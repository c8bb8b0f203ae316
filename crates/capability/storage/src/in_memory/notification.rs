//! 通知事件流内存实现
//!
//! 仅用于本地演示和测试。
//!
//! 过滤、排序与分页语义与 Postgres 实现保持一致：
//! 时间降序（同一毫秒按写入顺序降序，对应 Postgres 的 seq 列），
//! offset + limit 分页。

use crate::error::StorageError;
use crate::models::{
    LevelCounts, NewNotification, NotificationFilter, NotificationRecord, ReadState,
};
use crate::traits::NotificationStore;
use domain::now_epoch_ms;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// 通知事件流内存实现
pub struct InMemoryNotificationStore {
    events: RwLock<Vec<NotificationRecord>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryNotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

/// 过滤谓词；`list` 与 `mark_read_where` 共用。
fn matches(record: &NotificationRecord, filter: &NotificationFilter, user_id: &str) -> bool {
    if let Some(ref content) = filter.content {
        if !record
            .content
            .to_lowercase()
            .contains(&content.to_lowercase())
        {
            return false;
        }
    }
    if let Some(ref device_ids) = filter.device_ids {
        // Some(空集) 表示无匹配而非无过滤
        match record.device_id {
            Some(ref id) if device_ids.contains(id) => {}
            _ => return false,
        }
    }
    if let Some(level) = filter.level {
        if record.level != level {
            return false;
        }
    }
    match filter.read_state {
        ReadState::All => {}
        ReadState::Read => {
            if !record.is_read_by(user_id) {
                return false;
            }
        }
        ReadState::Unread => {
            if record.is_read_by(user_id) {
                return false;
            }
        }
    }
    if let Some(ref location) = filter.location {
        if record.location.as_deref() != Some(location.as_str()) {
            return false;
        }
    }
    if let Some(from) = filter.from_ts_ms {
        if record.ts_ms < from {
            return false;
        }
    }
    if let Some(to) = filter.to_ts_ms {
        if record.ts_ms > to {
            return false;
        }
    }
    true
}

#[async_trait::async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn insert(&self, event: NewNotification) -> Result<String, StorageError> {
        let id = Uuid::new_v4().to_string();
        let record = NotificationRecord {
            id: id.clone(),
            content: event.content,
            level: event.level,
            device_id: event.device_id,
            location: event.location,
            ts_ms: now_epoch_ms(),
            read_by: Vec::new(),
        };
        self.events
            .write()
            .map_err(|_| StorageError::new("lock failed"))?
            .push(record);
        Ok(id)
    }

    async fn mark_read(&self, event_id: &str, user_id: &str) -> Result<bool, StorageError> {
        let mut events = self
            .events
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let Some(record) = events.iter_mut().find(|record| record.id == event_id) else {
            return Ok(false);
        };
        if record.is_read_by(user_id) {
            return Ok(false);
        }
        record.read_by.push(user_id.to_string());
        Ok(true)
    }

    async fn mark_read_where(
        &self,
        filter: &NotificationFilter,
        user_id: &str,
    ) -> Result<u64, StorageError> {
        let mut events = self
            .events
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut touched = 0;
        for record in events.iter_mut() {
            if record.is_read_by(user_id) {
                continue;
            }
            if matches(record, filter, user_id) {
                record.read_by.push(user_id.to_string());
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn list(
        &self,
        filter: &NotificationFilter,
        user_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<NotificationRecord>, u64), StorageError> {
        let events = self
            .events
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        // Vec 本身就是写入顺序，下标充当 Postgres 的 seq 列
        let mut matched: Vec<(usize, NotificationRecord)> = events
            .iter()
            .enumerate()
            .filter(|(_, record)| matches(record, filter, user_id))
            .map(|(seq, record)| (seq, record.clone()))
            .collect();
        matched.sort_by(|a, b| b.1.ts_ms.cmp(&a.1.ts_ms).then_with(|| b.0.cmp(&a.0)));
        let total = matched.len() as u64;
        let page = matched
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|(_, record)| record)
            .collect();
        Ok((page, total))
    }

    async fn unread_by_level(&self, user_id: &str) -> Result<LevelCounts, StorageError> {
        let events = self
            .events
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut counts = LevelCounts::default();
        for record in events.iter() {
            if !record.is_read_by(user_id) {
                counts.bump(record.level, 1);
            }
        }
        Ok(counts)
    }

    async fn unread_by_location(
        &self,
        user_id: &str,
    ) -> Result<HashMap<String, LevelCounts>, StorageError> {
        let events = self
            .events
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut grouped: HashMap<String, LevelCounts> = HashMap::new();
        for record in events.iter() {
            if record.is_read_by(user_id) {
                continue;
            }
            // 位置为空的事件不参与分组
            let Some(ref location) = record.location else {
                continue;
            };
            grouped
                .entry(location.clone())
                .or_default()
                .bump(record.level, 1);
        }
        Ok(grouped)
    }
}
