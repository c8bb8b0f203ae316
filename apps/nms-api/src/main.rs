//! HTTP/WebSocket API 服务入口。
//!
//! 组装顺序：配置 → 日志 → Postgres 存储 → SNMP 客户端 → 状态缓存 /
//! 广播器 / 监控器 → 路由。监控器在独立任务中运行，HTTP 侧只读
//! 状态缓存，写路径统一经过监控器。

mod handlers;
mod middleware;
mod routes;
mod utils;

use axum::{Json, Router, middleware as axum_middleware, response::IntoResponse, routing::get};
use nms_auth::JwtVerifier;
use nms_broadcast::Broadcaster;
use nms_config::AppConfig;
use nms_monitor::{DeviceMonitor, DeviceStateStore, MonitorConfig};
use nms_notify::NotificationService;
use nms_snmp::{Snmp2cTransport, SnmpClient, SnmpConfig};
use nms_storage::{PgDeviceRegistry, PgNotificationStore, connect_pool};
use nms_telemetry::init_tracing;
use std::sync::Arc;
use tracing::{error, info};

/// Handler 共享的应用状态。
#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<DeviceMonitor>,
    pub state_store: Arc<DeviceStateStore>,
    pub notifications: Arc<NotificationService>,
    pub broadcaster: Arc<Broadcaster>,
    pub verifier: Arc<JwtVerifier>,
    pub snmp: Arc<SnmpClient>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    // Postgres 设备注册表与通知存储
    let pool = connect_pool(&config.database_url).await?;
    let registry = Arc::new(PgDeviceRegistry::new(pool.clone()));
    let store = Arc::new(PgNotificationStore::new(pool));

    // SNMP 客户端（社区名/端口/超时为进程级配置）
    let transport = Arc::new(Snmp2cTransport::new(SnmpConfig {
        community: config.snmp_community.clone(),
        port: config.snmp_port,
        timeout_ms: config.snmp_timeout_ms,
    }));
    let snmp = Arc::new(SnmpClient::new(transport));

    let state_store = Arc::new(DeviceStateStore::new());
    let broadcaster = Arc::new(Broadcaster::new());
    let notifications = Arc::new(NotificationService::new(registry.clone(), store.clone()));
    let monitor = Arc::new(DeviceMonitor::new(
        Arc::clone(&snmp),
        registry,
        store,
        Arc::clone(&broadcaster),
        Arc::clone(&state_store),
        MonitorConfig {
            heartbeat_ms: config.heartbeat_ms,
        },
    ));

    // 监控循环：初始化失败（注册表不可达）只记录日志，HTTP 服务继续运行
    let runner = Arc::clone(&monitor);
    tokio::spawn(async move {
        if let Err(err) = runner.run().await {
            error!(error = %err, "device monitor terminated");
        }
    });

    let state = AppState {
        monitor,
        state_store,
        notifications,
        broadcaster,
        verifier: Arc::new(JwtVerifier::new(config.jwt_secret.clone())),
        snmp,
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/ws/notification", get(handlers::notification_socket))
        .merge(routes::create_api_router())
        .with_state(state)
        // 注入 request_id/trace_id
        .layer(axum_middleware::from_fn(middleware::request_context));

    info!(addr = %config.http_addr, "starting api server");
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
