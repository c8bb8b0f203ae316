//! # 设备监控模块
//!
//! 维护权威的设备状态缓存，并驱动整个采集闭环：
//!
//! ```text
//! DeviceMonitor ──► SnmpClient（探测 / 名称位置采集）
//!       │
//!       ├──► DeviceStateStore（唯一写入方）
//!       ├──► NotificationStore（状态翻转的持久事件）
//!       └──► Broadcaster（实时推送）
//! ```
//!
//! ## 核心语义
//!
//! - **初始化**：注册表全量装载，逐台并发探测；在线设备做名称/位置
//!   漂移校正（广播新旧值并回写注册表），离线设备按注册表值兜底
//! - **心跳扫描**：固定间隔重探测；只有在线状态发生翻转才写状态、
//!   广播并落一条持久通知，稳态不产生任何 I/O
//! - **手动编辑**：仅允许 name/location，先持久化后改内存；
//!   注册表写失败时内存不变并向调用方报错
//! - **故障隔离**：单台设备的探测/采集失败只影响它自己

mod error;
mod monitor;
mod status;

pub use error::MonitorError;
pub use monitor::{DeviceMonitor, MonitorConfig};
pub use status::DeviceStateStore;
