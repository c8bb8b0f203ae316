//! SNMP 错误类型定义

/// SNMP 采集错误
#[derive(Debug, thiserror::Error)]
pub enum SnmpError {
    /// OID 格式错误（描述符本身有误，对该次调用致命）
    #[error("malformed oid: {0}")]
    MalformedOid(String),

    /// 传输错误（设备不可达或超时，驱动离线判定）
    #[error("transport error: {0}")]
    Transport(String),

    /// 设备应答但未返回任何值
    #[error("empty response for oid {0}")]
    EmptyResponse(String),

    /// 批量读中某个 key 失败（读请求整体 fail-fast）
    #[error("request failed for key {key} (oid {oid}): {reason}")]
    Key {
        key: String,
        oid: String,
        reason: String,
    },

    /// 解码结果与预期形状不符（表投影缺少锚定列等）
    #[error("unexpected result shape: {0}")]
    Shape(String),
}
