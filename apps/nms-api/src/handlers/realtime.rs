//! 实时通知 WebSocket handler
//!
//! - GET /ws/notification?clientId=<jwt>
//!
//! 准入：clientId 是一枚 JWT，升级前校验签名与有效期；缺失或校验
//! 失败直接拒绝，不进入订阅注册表。通过后以该 token 为订阅键注册，
//! 同一 token 重连会替换旧连接。

use crate::AppState;
use crate::utils::response::auth_error;
use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsParams {
    pub client_id: Option<String>,
}

/// WebSocket 升级入口。
pub async fn notification_socket(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(client_id) = params.client_id else {
        warn!("websocket rejected: missing clientId");
        return auth_error();
    };
    if let Err(err) = state.verifier.verify(&client_id) {
        warn!(error = %err, "websocket rejected: clientId verification failed");
        return auth_error();
    }
    ws.on_upgrade(move |socket| subscriber_loop(state, client_id, socket))
}

/// 订阅循环：转发广播消息直到连接关闭或被新连接替换。
async fn subscriber_loop(state: AppState, client_id: String, mut socket: WebSocket) {
    let mut receiver = state.broadcaster.register(&client_id).await;
    info!("websocket subscriber connected");

    // 同一 clientId 重连会替换注册表里的发送端；此时本连接的接收端
    // 收到 None，不能再注销（会把新连接一并摘掉）
    let mut replaced = false;
    loop {
        tokio::select! {
            outbound = receiver.recv() => {
                match outbound {
                    Some(message) => {
                        if socket.send(Message::Text(message)).await.is_err() {
                            break;
                        }
                    }
                    None => {
                        replaced = true;
                        break;
                    }
                }
            }
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(message)) => {
                        debug!(?message, "inbound websocket message ignored");
                    }
                }
            }
        }
    }

    if !replaced {
        state.broadcaster.unregister(&client_id).await;
    }
    info!("websocket subscriber disconnected");
}
