//! 追踪与请求 ID 生成。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub probes_total: u64,
    pub probe_failures: u64,
    pub transitions_online: u64,
    pub transitions_offline: u64,
    pub drift_reconciliations: u64,
    pub notifications_written: u64,
    pub broadcasts_sent: u64,
    pub broadcasts_skipped: u64,
}

/// 基础指标。
pub struct TelemetryMetrics {
    probes_total: AtomicU64,
    probe_failures: AtomicU64,
    transitions_online: AtomicU64,
    transitions_offline: AtomicU64,
    drift_reconciliations: AtomicU64,
    notifications_written: AtomicU64,
    broadcasts_sent: AtomicU64,
    broadcasts_skipped: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            probes_total: AtomicU64::new(0),
            probe_failures: AtomicU64::new(0),
            transitions_online: AtomicU64::new(0),
            transitions_offline: AtomicU64::new(0),
            drift_reconciliations: AtomicU64::new(0),
            notifications_written: AtomicU64::new(0),
            broadcasts_sent: AtomicU64::new(0),
            broadcasts_skipped: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            probes_total: self.probes_total.load(Ordering::Relaxed),
            probe_failures: self.probe_failures.load(Ordering::Relaxed),
            transitions_online: self.transitions_online.load(Ordering::Relaxed),
            transitions_offline: self.transitions_offline.load(Ordering::Relaxed),
            drift_reconciliations: self.drift_reconciliations.load(Ordering::Relaxed),
            notifications_written: self.notifications_written.load(Ordering::Relaxed),
            broadcasts_sent: self.broadcasts_sent.load(Ordering::Relaxed),
            broadcasts_skipped: self.broadcasts_skipped.load(Ordering::Relaxed),
        }
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录一次在线探测。
pub fn record_probe() {
    metrics().probes_total.fetch_add(1, Ordering::Relaxed);
}

/// 记录一次探测失败（设备未应答）。
pub fn record_probe_failure() {
    metrics().probe_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录一次离线→在线翻转。
pub fn record_transition_online() {
    metrics().transitions_online.fetch_add(1, Ordering::Relaxed);
}

/// 记录一次在线→离线翻转。
pub fn record_transition_offline() {
    metrics()
        .transitions_offline
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录一次元数据漂移校正。
pub fn record_drift_reconciliation() {
    metrics()
        .drift_reconciliations
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录一次通知落库。
pub fn record_notification_written() {
    metrics()
        .notifications_written
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录一次广播送达。
pub fn record_broadcast_sent() {
    metrics().broadcasts_sent.fetch_add(1, Ordering::Relaxed);
}

/// 记录一次广播跳过（通道已关闭）。
pub fn record_broadcast_skipped() {
    metrics().broadcasts_skipped.fetch_add(1, Ordering::Relaxed);
}
