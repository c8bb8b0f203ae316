//! 通知查询与已读标记 handlers
//!
//! - GET  /notifications                     过滤 + 分页查询
//! - POST /notifications/read                单条标记已读
//! - POST /notifications/read-all            按条件批量标记已读
//! - GET  /notifications/unread-by-level     未读计数（按级别）
//! - GET  /notifications/unread-by-location  未读计数（按位置）
//!
//! 已读状态相对调用者：user 取自 Bearer token 的 subject。

use crate::AppState;
use crate::middleware::require_user;
use crate::utils::response::{notify_error, success};
use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
};
use domain::NotificationLevel;
use nms_notify::NotificationQuery;
use nms_storage::ReadState;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_PAGE_SIZE: u64 = 10;

/// 查询参数；GET 走 query string，read-all 走 JSON 体，字段一致。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationParams {
    pub content: Option<String>,
    pub device_name: Option<String>,
    pub level: Option<String>,
    pub read_state: Option<String>,
    pub location: Option<String>,
    pub from_ts_ms: Option<i64>,
    pub to_ts_ms: Option<i64>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl NotificationParams {
    fn to_query(&self) -> NotificationQuery {
        NotificationQuery {
            content: self.content.clone(),
            device_name: self.device_name.clone(),
            level: self.level.as_deref().map(NotificationLevel::parse),
            read_state: match self.read_state.as_deref() {
                Some("read") => ReadState::Read,
                Some("unread") => ReadState::Unread,
                _ => ReadState::All,
            },
            location: self.location.clone(),
            from_ts_ms: self.from_ts_ms,
            to_ts_ms: self.to_ts_ms,
        }
    }
}

/// 过滤 + 分页查询通知。
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(params): Query<NotificationParams>,
    headers: HeaderMap,
) -> Response {
    let user_id = match require_user(&state, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let offset = (page - 1) * page_size;
    match state
        .notifications
        .list(&params.to_query(), &user_id, offset, page_size)
        .await
    {
        Ok((notifications, total)) => success(
            "notifications fetched",
            json!({ "notifications": notifications, "total": total }),
        ),
        Err(err) => notify_error(err),
    }
}

#[derive(Deserialize)]
pub struct MarkReadBody {
    pub id: String,
}

/// 单条标记已读；重复标记是无副作用的成功。
pub async fn mark_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<MarkReadBody>,
) -> Response {
    let user_id = match require_user(&state, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    match state.notifications.mark_read(&body.id, &user_id).await {
        Ok(changed) => success("marked as read", json!({ "changed": changed })),
        Err(err) => notify_error(err),
    }
}

/// 按当前过滤条件批量标记已读，返回触及的条数。
pub async fn mark_all_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(params): Json<NotificationParams>,
) -> Response {
    let user_id = match require_user(&state, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    match state
        .notifications
        .mark_read_where(&params.to_query(), &user_id)
        .await
    {
        Ok(updated) => success(
            format!("{} notifications marked as read", updated),
            json!({ "updated": updated }),
        ),
        Err(err) => notify_error(err),
    }
}

/// 当前用户未读计数（按级别，含总数）。
pub async fn unread_by_level(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let user_id = match require_user(&state, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    match state.notifications.unread_by_level(&user_id).await {
        Ok(counts) => success("unread counts fetched", counts),
        Err(err) => notify_error(err),
    }
}

/// 当前用户未读计数（按位置分组；无位置的事件不计入）。
pub async fn unread_by_location(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let user_id = match require_user(&state, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    match state.notifications.unread_by_location(&user_id).await {
        Ok(counts) => success("unread counts fetched", counts),
        Err(err) => notify_error(err),
    }
}
