//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 设备状态：/devices/status, /devices/init
//! - 设备数据：/devices/{id}/system|interfaces|hardware|routes|arp
//! - 设备信息写入：/devices/sys-info
//! - 通知：/notifications/*

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/devices/status", get(list_status))
        .route("/devices/init", post(init_devices))
        .route("/devices/sys-info", post(edit_sys_info))
        .route("/devices/:device_id/system", get(get_system))
        .route("/devices/:device_id/interfaces", get(get_interfaces))
        .route("/devices/:device_id/hardware", get(get_hardware))
        .route("/devices/:device_id/routes", get(get_routes))
        .route("/devices/:device_id/arp", get(get_arp))
        .route("/notifications", get(list_notifications))
        .route("/notifications/read", post(mark_read))
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/unread-by-level", get(unread_by_level))
        .route("/notifications/unread-by-location", get(unread_by_location))
}
