//! # NMS Storage 模块
//!
//! 本模块提供统一的数据存储抽象层，支持多种存储后端实现。
//!
//! ## 架构设计
//!
//! 该模块采用分层架构，遵循以下原则：
//!
//! 1. **接口抽象层** (`traits.rs`)：设备注册表与通知存储的异步 Trait 接口
//! 2. **数据模型层** (`models.rs`)：通知事件、过滤器与聚合视图的数据结构
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **连接管理层** (`connection.rs`)：数据库连接池管理
//! 5. **实现层**：
//!    - `in_memory/`：内存存储实现（用于测试和演示）
//!    - `postgres/`：PostgreSQL 存储实现（生产环境使用）
//!
//! ## 核心特性
//!
//! - **追加写通知流**：事件只追加，已读集合只增不减
//! - **幂等已读标记**：Postgres 侧以 `read_by @>` 守卫的 `array_append`
//!   实现免比较幂等，并发重复标记不产生重复 id
//! - **派生聚合**：未读计数按查询实时推导，从不缓存
//! - **异步支持**：基于 Tokio 的异步 I/O
//!
//! ## 模块说明
//!
//! - [`models`]：通知事件、过滤器、已读状态、按级别计数
//! - [`traits`]：`DeviceRegistry` 与 `NotificationStore` 接口
//! - [`error`]：存储错误类型定义
//! - [`connection`]：PostgreSQL 连接池管理（最大连接数 8）
//! - [`in_memory`]：`RwLock<HashMap>` 内存实现
//! - [`postgres`]：sqlx 参数化查询实现
//!
//! ## 设计约束
//!
//! - **禁止直接 SQL**：Handler 层禁止直接写 SQL，统一通过 storage 层
//! - **过滤语义一致**：`list` 与 `mark_read_where` 共用同一套过滤谓词
//! - **零未读不报错**：用户无未读事件时聚合返回全零计数

// 模块导出：将子模块的内容导出到 crate 根目录
pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod traits;

// 导出常用类型到 crate 根目录，方便外部引用
pub use connection::*;
pub use error::*;
pub use models::*;
pub use traits::*;

// 导出内存存储实现类型
pub use in_memory::{InMemoryDeviceRegistry, InMemoryNotificationStore};

// 导出 PostgreSQL 存储实现类型
pub use postgres::{PgDeviceRegistry, PgNotificationStore};
