//! 监控模块错误类型定义

use nms_snmp::SnmpError;
use nms_storage::StorageError;

/// 监控错误
///
/// 只在面向调用方的操作（初始化、手动编辑）上出现；
/// 扫描过程中的单设备故障只记录日志，不会以错误形式向外传播。
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// 注册表读写失败
    #[error("registry error: {0}")]
    Registry(#[from] StorageError),

    /// SNMP 操作失败
    #[error("snmp error: {0}")]
    Snmp(#[from] SnmpError),
}
