//! # 实时推送模块
//!
//! 维护当前在线订阅者的发送端注册表，支持全量广播与定向单发。
//!
//! ## 设计要点
//!
//! - 注册表为 `RwLock<HashMap<clientId, UnboundedSender>>`，连接/断开
//!   与广播可以并发发生
//! - 发送失败（接收端已关闭）按跳过处理，不是错误；广播返回实际送达数
//! - 同一 clientId 重复注册时旧发送端被替换（旧连接随之失效）

use std::collections::HashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::RwLock;
use tracing::debug;

/// 在线订阅者注册表。
pub struct Broadcaster {
    clients: RwLock<HashMap<String, UnboundedSender<String>>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// 注册订阅者，返回其消息接收端。
    ///
    /// 同一 clientId 再次注册会替换旧发送端。
    pub async fn register(&self, client_id: &str) -> UnboundedReceiver<String> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let replaced = self
            .clients
            .write()
            .await
            .insert(client_id.to_string(), sender);
        if replaced.is_some() {
            debug!(client_id = %client_id, "existing subscriber replaced");
        }
        receiver
    }

    /// 注销订阅者。
    pub async fn unregister(&self, client_id: &str) {
        self.clients.write().await.remove(client_id);
    }

    /// 当前在线订阅者数量。
    pub async fn subscriber_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// 定向单发；目标不在线或通道已关闭时返回 false。
    pub async fn send_to_client(&self, client_id: &str, message: &str) -> bool {
        let clients = self.clients.read().await;
        match clients.get(client_id) {
            Some(sender) => match sender.send(message.to_string()) {
                Ok(()) => true,
                Err(_) => {
                    debug!(client_id = %client_id, "subscriber channel closed");
                    false
                }
            },
            None => {
                debug!(client_id = %client_id, "subscriber not connected");
                false
            }
        }
    }

    /// 全量广播，返回实际送达数；已关闭的通道按跳过处理。
    pub async fn broadcast(&self, message: &str) -> usize {
        let clients = self.clients.read().await;
        let mut delivered = 0;
        for (client_id, sender) in clients.iter() {
            if sender.send(message.to_string()).is_ok() {
                nms_telemetry::record_broadcast_sent();
                delivered += 1;
            } else {
                nms_telemetry::record_broadcast_skipped();
                debug!(client_id = %client_id, "broadcast skipped closed channel");
            }
        }
        delivered
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn broadcast_reaches_all_subscribers() {
        let broadcaster = Broadcaster::new();
        let mut first = broadcaster.register("client-1").await;
        let mut second = broadcaster.register("client-2").await;

        assert_eq!(broadcaster.broadcast("status changed").await, 2);
        assert_eq!(first.recv().await.as_deref(), Some("status changed"));
        assert_eq!(second.recv().await.as_deref(), Some("status changed"));
    }

    #[tokio::test]
    async fn closed_channel_is_skipped_not_an_error() {
        let broadcaster = Broadcaster::new();
        let receiver = broadcaster.register("client-1").await;
        let mut kept = broadcaster.register("client-2").await;
        drop(receiver);

        assert_eq!(broadcaster.broadcast("ping").await, 1);
        assert_eq!(kept.recv().await.as_deref(), Some("ping"));
        assert!(!broadcaster.send_to_client("client-1", "direct").await);
    }

    #[tokio::test]
    async fn targeted_send_and_unregister() {
        let broadcaster = Broadcaster::new();
        let mut receiver = broadcaster.register("client-1").await;

        assert!(broadcaster.send_to_client("client-1", "hello").await);
        assert_eq!(receiver.recv().await.as_deref(), Some("hello"));
        assert!(!broadcaster.send_to_client("client-9", "hello").await);

        broadcaster.unregister("client-1").await;
        assert_eq!(broadcaster.subscriber_count().await, 0);
        assert!(!broadcaster.send_to_client("client-1", "gone").await);
    }

    #[tokio::test]
    async fn re_register_replaces_old_sender() {
        let broadcaster = Broadcaster::new();
        let mut stale = broadcaster.register("client-1").await;
        let mut fresh = broadcaster.register("client-1").await;

        assert_eq!(broadcaster.subscriber_count().await, 1);
        assert_eq!(broadcaster.broadcast("after replace").await, 1);
        assert_eq!(fresh.recv().await.as_deref(), Some("after replace"));
        // 旧接收端已与注册表断开
        assert!(stale.try_recv().is_err());
    }
}
