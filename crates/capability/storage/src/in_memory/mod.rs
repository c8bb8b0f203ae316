//! 内存存储实现模块
//!
//! 仅用于本地演示和测试。
//!
//! 包含以下实现：
//! - DeviceRegistry: InMemoryDeviceRegistry
//! - NotificationStore: InMemoryNotificationStore

pub mod device;
pub mod notification;

pub use device::*;
pub use notification::*;
