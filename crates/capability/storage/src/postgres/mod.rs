//! # PostgreSQL 存储实现模块
//!
//! 本模块提供所有存储接口的 PostgreSQL 实现，用于生产环境。
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有 SQL 查询使用参数绑定，防止 SQL 注入攻击
//! 2. **幂等已读标记**：`array_append` 配合 `NOT (read_by @> ...)` 守卫，
//!    并发重复标记不产生重复 id，也无需先读后比较
//! 3. **过滤语义一致**：`list` 与 `mark_read_where` 共用同一套动态过滤子句
//! 4. **连接池管理**：使用连接池复用数据库连接（`connection.rs`，最大 8）
//!
//! ## 包含的实现
//!
//! - **DeviceRegistry** (`device.rs`)：设备行读取、点更新与名称检索
//! - **NotificationStore** (`notification.rs`)：通知流追加、标记、查询与聚合
//!
//! ## 数据库模式要求
//!
//! - `devices`：设备表（device_id, name, ip, model, location, device_type）
//! - `notifications`：通知表（seq BIGSERIAL 写入序列, id, content, level,
//!   device_id, location, ts_ms, read_by TEXT[] 默认空数组）
//!
//! ### 索引
//! - `idx_notifications_ts`：(ts_ms desc) 列表查询
//! - `idx_notifications_read_by`：GIN(read_by) 未读聚合
//!
//! ## 错误处理
//!
//! 所有存储操作返回 `Result<T, StorageError>`；`sqlx::Error` 自动转换。

// 导出各个 PostgreSQL 存储实现
pub mod device;
pub mod notification;

// 导出到 crate 根目录，方便外部引用
pub use device::*;
pub use notification::*;
