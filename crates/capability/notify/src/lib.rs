//! # 通知服务模块
//!
//! 存储层之上的查询门面：
//! - 把调用方的设备名子串解析为设备 id 集合（零匹配 ⇒ 空结果而非不过滤）
//! - 把持久化记录投影为对外视图（暴露派生的 is_read 与解析后的设备名，
//!   不暴露原始已读集合）
//! - 转发未读聚合
//!
//! Handler 层只依赖本模块，不直接触碰存储接口。

mod service;

pub use service::{NotificationQuery, NotificationService, NotificationView, NotifyError};
