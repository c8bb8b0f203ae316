//! 设备状态与设备数据 handlers
//!
//! - GET  /devices/status          全量状态快照
//! - POST /devices/init            重新初始化监控器
//! - GET  /devices/{id}/system     系统信息（在线设备）
//! - GET  /devices/{id}/interfaces 接口表（在线设备）
//! - GET  /devices/{id}/hardware   硬件清单（在线设备）
//! - GET  /devices/{id}/routes     路由表（在线设备）
//! - GET  /devices/{id}/arp        ARP 表（在线设备）
//! - POST /devices/sys-info        写设备基础信息（name/location/contact）
//!
//! 设备数据读取的前置条件：设备在状态缓存中存在且在线；
//! 不满足时返回 400，不向设备发起请求。

use crate::AppState;
use crate::middleware::require_user;
use crate::utils::response::{
    bad_request_error, monitor_error, snmp_error, success, success_message,
};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
};
use domain::{DeviceStatus, Liveness};
use nms_snmp::{SystemInfo, WriteDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

/// 可通过 sys-info 接口写入的预设 OID。
const SYS_CONTACT_OID: &str = "1.3.6.1.2.1.1.4.0";
const SYS_NAME_OID: &str = "1.3.6.1.2.1.1.5.0";
const SYS_LOCATION_OID: &str = "1.3.6.1.2.1.1.6.0";

#[derive(Deserialize)]
pub struct DevicePath {
    pub(crate) device_id: String,
}

/// 获取全量设备状态快照。
pub async fn list_status(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let mut devices: Vec<DeviceStatus> = state.state_store.snapshot().into_values().collect();
    devices.sort_by(|a, b| a.device_id.cmp(&b.device_id));
    success(
        "device status fetched",
        json!({ "devicesList": devices }),
    )
}

/// 重新初始化监控器：全量装载注册表并重新探测。
pub async fn init_devices(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    match state.monitor.initialize().await {
        Ok(()) => {
            info!("device monitor reinitialized on request");
            success_message("devices initialized")
        }
        Err(err) => monitor_error(err),
    }
}

#[derive(Serialize)]
struct SystemPayload {
    #[serde(flatten)]
    info: SystemInfo,
    ip: String,
}

/// 获取设备系统信息。
pub async fn get_system(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let status = match require_online(&state, &path.device_id) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let bundle = match state
        .snmp
        .fetch(&status.ip, nms_snmp::system_info_descriptors())
        .await
    {
        Ok(bundle) => bundle,
        Err(err) => return snmp_error(err),
    };
    match nms_snmp::system_info(&bundle) {
        Ok(info) => success(
            "device information fetched",
            SystemPayload {
                info,
                ip: status.ip,
            },
        ),
        Err(err) => snmp_error(err),
    }
}

/// 获取设备接口表。
pub async fn get_interfaces(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let status = match require_online(&state, &path.device_id) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let bundle = match state
        .snmp
        .fetch(&status.ip, nms_snmp::interface_descriptors())
        .await
    {
        Ok(bundle) => bundle,
        Err(err) => return snmp_error(err),
    };
    match nms_snmp::interface_table(&bundle) {
        Ok(entries) => success("interface table fetched", json!({ "interfaces": entries })),
        Err(err) => snmp_error(err),
    }
}

/// 获取设备硬件清单。
pub async fn get_hardware(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let status = match require_online(&state, &path.device_id) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let bundle = match state
        .snmp
        .fetch(&status.ip, nms_snmp::hardware_descriptors())
        .await
    {
        Ok(bundle) => bundle,
        Err(err) => return snmp_error(err),
    };
    match nms_snmp::hardware_table(&bundle) {
        Ok(entries) => success("hardware inventory fetched", json!({ "hardware": entries })),
        Err(err) => snmp_error(err),
    }
}

/// 获取设备路由表。
pub async fn get_routes(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let status = match require_online(&state, &path.device_id) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let bundle = match state
        .snmp
        .fetch(&status.ip, nms_snmp::route_descriptors())
        .await
    {
        Ok(bundle) => bundle,
        Err(err) => return snmp_error(err),
    };
    match nms_snmp::route_table(&bundle) {
        Ok(entries) => success("route table fetched", json!({ "routes": entries })),
        Err(err) => snmp_error(err),
    }
}

/// 获取设备 ARP 表。
pub async fn get_arp(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let status = match require_online(&state, &path.device_id) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let bundle = match state.snmp.fetch(&status.ip, nms_snmp::arp_descriptors()).await {
        Ok(bundle) => bundle,
        Err(err) => return snmp_error(err),
    };
    match nms_snmp::arp_table(&bundle) {
        Ok(entries) => success("arp table fetched", json!({ "arp": entries })),
        Err(err) => snmp_error(err),
    }
}

#[derive(Deserialize)]
pub struct SysInfoEdit {
    pub id: String,
    pub key: String,
    pub value: String,
}

/// 写设备基础信息：先下发 SNMP set，成功后同步状态缓存与注册表。
///
/// 仅接受预设键 name/location/contact；contact 不进状态缓存。
pub async fn edit_sys_info(
    State(state): State<AppState>,
    headers: HeaderMap,
    axum::Json(edit): axum::Json<SysInfoEdit>,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let status = match require_online(&state, &edit.id) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let oid = match edit.key.as_str() {
        "name" => SYS_NAME_OID,
        "location" => SYS_LOCATION_OID,
        "contact" => SYS_CONTACT_OID,
        _ => return bad_request_error("invalid device info key"),
    };

    let write = WriteDescriptor::text(oid, &edit.key, &edit.value);
    if let Err(err) = state.snmp.write_single(&status.ip, write).await {
        return snmp_error(err);
    }
    // name/location 同时维护在注册表与状态缓存，写设备成功后跟进
    if matches!(edit.key.as_str(), "name" | "location") {
        if let Err(err) = state
            .monitor
            .update_manually(&edit.id, &edit.key, &edit.value)
            .await
        {
            return monitor_error(err);
        }
    }
    success_message("device information updated")
}

/// 设备数据读取的共用前置检查。
fn require_online(state: &AppState, device_id: &str) -> Result<DeviceStatus, Response> {
    let Some(status) = state.state_store.get(device_id) else {
        return Err(bad_request_error("device not found"));
    };
    if status.liveness != Liveness::Online {
        return Err(bad_request_error("device is offline"));
    }
    Ok(status)
}
