//! Postgres 设备注册表实现
//!
//! 通过参数化 SQL 实现设备行读取、name/location 点更新与名称检索。
//!
//! 设计要点：
//! - 点更新的列名来自 `DeviceField::column()` 静态字符串，值走参数绑定
//! - 名称检索使用 ILIKE 做不区分大小写的子串匹配

use crate::error::StorageError;
use crate::models::DeviceField;
use crate::traits::DeviceRegistry;
use domain::DeviceRecord;
use sqlx::{PgPool, Row};
use std::collections::HashMap;

pub struct PgDeviceRegistry {
    pub pool: PgPool,
}

impl PgDeviceRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl DeviceRegistry for PgDeviceRegistry {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, StorageError> {
        let rows = sqlx::query(
            "select device_id, name, ip, model, location, device_type from devices",
        )
        .fetch_all(&self.pool)
        .await?;
        let mut devices = Vec::with_capacity(rows.len());
        for row in rows {
            devices.push(DeviceRecord {
                device_id: row.try_get("device_id")?,
                name: row.try_get("name")?,
                ip: row.try_get("ip")?,
                model: row.try_get("model")?,
                location: row.try_get("location")?,
                device_type: row.try_get("device_type")?,
            });
        }
        Ok(devices)
    }

    async fn update_field(
        &self,
        device_id: &str,
        field: DeviceField,
        value: &str,
    ) -> Result<bool, StorageError> {
        let sql = format!(
            "update devices set {} = $1 where device_id = $2",
            field.column()
        );
        let result = sqlx::query(&sql)
            .bind(value)
            .bind(device_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query(
            "select device_id from devices where name ilike '%' || $1 || '%'",
        )
        .bind(fragment)
        .fetch_all(&self.pool)
        .await?;
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(row.try_get("device_id")?);
        }
        Ok(ids)
    }

    async fn device_names(&self) -> Result<HashMap<String, String>, StorageError> {
        let rows = sqlx::query("select device_id, name from devices")
            .fetch_all(&self.pool)
            .await?;
        let mut names = HashMap::with_capacity(rows.len());
        for row in rows {
            names.insert(row.try_get("device_id")?, row.try_get("name")?);
        }
        Ok(names)
    }
}
