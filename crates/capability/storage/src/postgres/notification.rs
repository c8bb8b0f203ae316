//! Postgres 通知事件流实现
//!
//! 表结构：notifications(seq bigserial, id, content, level, device_id,
//! location, ts_ms, read_by TEXT[] 默认空数组)。
//!
//! 设计要点：
//! - 已读标记用 `NOT (read_by @> ...)` 守卫的 `array_append`，免比较幂等
//! - 过滤条件统一由 `push_filter` 追加，`list` 与 `mark_read_where` 共用
//! - 列表时间降序；同一毫秒内按写入序列（seq）降序，排序与分页才是
//!   确定性的（id 是随机 UUID，不能作时间平局裁决）

use crate::error::StorageError;
use crate::models::{
    LevelCounts, NewNotification, NotificationFilter, NotificationRecord, ReadState,
};
use crate::traits::NotificationStore;
use domain::{now_epoch_ms, NotificationLevel};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::collections::HashMap;
use uuid::Uuid;

pub struct PgNotificationStore {
    pub pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

/// 把过滤谓词追加到查询构造器（各条件以 AND 组合）。
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &NotificationFilter, user_id: &str) {
    if let Some(ref content) = filter.content {
        builder
            .push(" and content ilike '%' || ")
            .push_bind(content.clone())
            .push(" || '%'");
    }
    if let Some(ref device_ids) = filter.device_ids {
        // Some(空集) 自然匹配不到任何行
        builder
            .push(" and device_id = any(")
            .push_bind(device_ids.clone())
            .push(")");
    }
    if let Some(level) = filter.level {
        builder
            .push(" and level = ")
            .push_bind(level.as_str().to_string());
    }
    match filter.read_state {
        ReadState::All => {}
        ReadState::Read => {
            builder
                .push(" and read_by @> array[")
                .push_bind(user_id.to_string())
                .push("]::text[]");
        }
        ReadState::Unread => {
            builder
                .push(" and not (read_by @> array[")
                .push_bind(user_id.to_string())
                .push("]::text[])");
        }
    }
    if let Some(ref location) = filter.location {
        builder.push(" and location = ").push_bind(location.clone());
    }
    if let Some(from) = filter.from_ts_ms {
        builder.push(" and ts_ms >= ").push_bind(from);
    }
    if let Some(to) = filter.to_ts_ms {
        builder.push(" and ts_ms <= ").push_bind(to);
    }
}

fn record_from_row(row: &sqlx::postgres::PgRow) -> Result<NotificationRecord, StorageError> {
    let level: String = row.try_get("level")?;
    Ok(NotificationRecord {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        level: NotificationLevel::parse(&level),
        device_id: row.try_get("device_id")?,
        location: row.try_get("location")?,
        ts_ms: row.try_get("ts_ms")?,
        read_by: row.try_get("read_by")?,
    })
}

#[async_trait::async_trait]
impl NotificationStore for PgNotificationStore {
    async fn insert(&self, event: NewNotification) -> Result<String, StorageError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "insert into notifications (id, content, level, device_id, location, ts_ms, read_by) \
             values ($1, $2, $3, $4, $5, $6, '{}')",
        )
        .bind(&id)
        .bind(&event.content)
        .bind(event.level.as_str())
        .bind(&event.device_id)
        .bind(&event.location)
        .bind(now_epoch_ms())
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn mark_read(&self, event_id: &str, user_id: &str) -> Result<bool, StorageError> {
        // 守卫条件保证同一用户并发重复标记也只追加一次
        let result = sqlx::query(
            "update notifications set read_by = array_append(read_by, $1) \
             where id = $2 and not (read_by @> array[$1]::text[])",
        )
        .bind(user_id)
        .bind(event_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_read_where(
        &self,
        filter: &NotificationFilter,
        user_id: &str,
    ) -> Result<u64, StorageError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "update notifications set read_by = array_append(read_by, ",
        );
        builder.push_bind(user_id.to_string());
        builder.push(") where not (read_by @> array[");
        builder.push_bind(user_id.to_string());
        builder.push("]::text[])");
        push_filter(&mut builder, filter, user_id);
        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn list(
        &self,
        filter: &NotificationFilter,
        user_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<NotificationRecord>, u64), StorageError> {
        let mut count_builder =
            QueryBuilder::<Postgres>::new("select count(*) as total from notifications where true");
        push_filter(&mut count_builder, filter, user_id);
        let total: i64 = count_builder
            .build()
            .fetch_one(&self.pool)
            .await?
            .try_get("total")?;

        let mut page_builder = QueryBuilder::<Postgres>::new(
            "select id, content, level, device_id, location, ts_ms, read_by \
             from notifications where true",
        );
        push_filter(&mut page_builder, filter, user_id);
        page_builder.push(" order by ts_ms desc, seq desc");
        page_builder.push(" offset ").push_bind(offset as i64);
        page_builder.push(" limit ").push_bind(limit as i64);
        let rows = page_builder.build().fetch_all(&self.pool).await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(record_from_row(&row)?);
        }
        Ok((records, total.max(0) as u64))
    }

    async fn unread_by_level(&self, user_id: &str) -> Result<LevelCounts, StorageError> {
        let rows = sqlx::query(
            "select level, count(*) as total from notifications \
             where not (read_by @> array[$1]::text[]) group by level",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        let mut counts = LevelCounts::default();
        for row in rows {
            let level: String = row.try_get("level")?;
            let total: i64 = row.try_get("total")?;
            counts.bump(NotificationLevel::parse(&level), total.max(0) as u64);
        }
        Ok(counts)
    }

    async fn unread_by_location(
        &self,
        user_id: &str,
    ) -> Result<HashMap<String, LevelCounts>, StorageError> {
        let rows = sqlx::query(
            "select location, level, count(*) as total from notifications \
             where not (read_by @> array[$1]::text[]) and location is not null \
             group by location, level",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        let mut grouped: HashMap<String, LevelCounts> = HashMap::new();
        for row in rows {
            let location: String = row.try_get("location")?;
            let level: String = row.try_get("level")?;
            let total: i64 = row.try_get("total")?;
            grouped
                .entry(location)
                .or_default()
                .bump(NotificationLevel::parse(&level), total.max(0) as u64);
        }
        Ok(grouped)
    }
}
