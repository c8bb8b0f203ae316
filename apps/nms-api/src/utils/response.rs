//! HTTP 响应辅助函数
//!
//! 所有接口返回统一的 `{ type, msg, data }` 信封：
//! - type：success / error
//! - msg：面向人的结果描述
//! - data：载荷，无载荷时省略
//!
//! 错误响应构造函数：auth_error, bad_request_error, snmp_error,
//! monitor_error, notify_error

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nms_monitor::MonitorError;
use nms_notify::NotifyError;
use nms_snmp::SnmpError;
use serde::Serialize;

/// 统一响应信封。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(msg: impl Into<String>, data: T) -> Self {
        Self {
            kind: "success",
            msg: msg.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            kind: "error",
            msg: msg.into(),
            data: None,
        }
    }
}

/// 成功响应（带载荷）
pub fn success<T: Serialize>(msg: impl Into<String>, data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(msg, data))).into_response()
}

/// 成功响应（无载荷）
pub fn success_message(msg: impl Into<String>) -> Response {
    let response = ApiResponse::<()> {
        kind: "success",
        msg: msg.into(),
        data: None,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// 认证错误响应
pub fn auth_error() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::error("unauthorized")),
    )
        .into_response()
}

/// 错误请求响应
pub fn bad_request_error(msg: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))).into_response()
}

/// 内部错误响应
pub fn internal_error(msg: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(msg)),
    )
        .into_response()
}

/// SNMP 采集/写入错误响应
pub fn snmp_error(err: SnmpError) -> Response {
    internal_error(format!("device request failed: {}", err))
}

/// 监控器错误响应
pub fn monitor_error(err: MonitorError) -> Response {
    internal_error(format!("monitor operation failed: {}", err))
}

/// 通知服务错误响应
pub fn notify_error(err: NotifyError) -> Response {
    internal_error(format!("notification query failed: {}", err))
}
